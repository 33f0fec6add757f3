use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::FormatError;
use crate::value::{ValueKind, is_truthy, render};

/// Caller-supplied token producer used by [`crate::fmt::custom`].
pub type CustomFn = Arc<dyn Fn(&Value) -> Vec<String> + Send + Sync>;

#[derive(Clone)]
pub(crate) enum Shape {
    FlagIfTrue(String),
    FlagIfFalse(String),
    Toggle {
        on: Vec<String>,
        off: Vec<String>,
    },
    Joined(String),
    Split(String),
    Equals(String),
    Literal,
    List {
        min: usize,
        max: Option<usize>,
    },
    Lookup {
        table: BTreeMap<String, String>,
        default: Option<String>,
    },
    TypedDefault {
        kind: ValueKind,
        flag: Option<String>,
    },
    Fixed(Vec<String>),
    Each(Box<Formatter>),
    Custom(CustomFn),
}

/// A pure mapping from one parameter value to command-line tokens.
///
/// Every formatter carries an `always_renders` capability fixed when it is
/// built. The invocation context skips formatters for absent (`null`) values
/// unless this capability is set.
#[derive(Clone)]
pub struct Formatter {
    shape: Shape,
    always_renders: bool,
}

impl Formatter {
    pub(crate) fn new(shape: Shape) -> Self {
        Self {
            shape,
            always_renders: false,
        }
    }

    pub(crate) fn rendering_always(shape: Shape) -> Self {
        Self {
            shape,
            always_renders: true,
        }
    }

    /// Whether this formatter runs even when the value is absent.
    #[must_use]
    pub const fn always_renders(&self) -> bool {
        self.always_renders
    }

    /// Make this formatter run on absent values regardless of the context's
    /// null-handling policy.
    #[must_use]
    pub fn render_absent(mut self) -> Self {
        self.always_renders = true;
        self
    }

    /// Catalogue name of this formatter, as used in configuration files.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match &self.shape {
            Shape::FlagIfTrue(_) => "flag-if-true",
            Shape::FlagIfFalse(_) => "flag-if-false",
            Shape::Toggle { .. } => "toggle",
            Shape::Joined(_) => "joined",
            Shape::Split(_) => "split",
            Shape::Equals(_) => "equals",
            Shape::Literal => "literal",
            Shape::List { .. } => "list",
            Shape::Lookup { .. } => "lookup",
            Shape::TypedDefault { .. } => "typed-default",
            Shape::Fixed(_) => "fixed",
            Shape::Each(_) => "each",
            Shape::Custom(_) => "custom",
        }
    }

    /// Check construction arguments.
    ///
    /// # Errors
    /// Returns [`FormatError::InvalidFormatter`] when a required argument is
    /// missing or empty.
    pub fn validate(&self) -> Result<(), FormatError> {
        let kind = self.kind();
        let require = |flag: &str, what: &str| {
            if flag.is_empty() {
                Err(FormatError::invalid(kind, format!("{what} must not be empty")))
            } else {
                Ok(())
            }
        };

        match &self.shape {
            Shape::FlagIfTrue(flag) | Shape::FlagIfFalse(flag) => require(flag, "flag"),
            Shape::Joined(prefix) | Shape::Split(prefix) | Shape::Equals(prefix) => {
                require(prefix, "prefix")
            }
            Shape::Toggle { on, off } => {
                if on.is_empty() && off.is_empty() {
                    Err(FormatError::invalid(kind, "needs tokens for at least one state"))
                } else {
                    Ok(())
                }
            }
            Shape::List { min, max } => match max {
                Some(max) if max < min => Err(FormatError::invalid(
                    kind,
                    format!("min_len {min} exceeds max_len {max}"),
                )),
                _ => Ok(()),
            },
            Shape::Lookup { table, .. } => {
                if table.is_empty() {
                    Err(FormatError::invalid(kind, "table must not be empty"))
                } else {
                    Ok(())
                }
            }
            Shape::TypedDefault { kind: value_kind, flag } => match (value_kind, flag) {
                (ValueKind::Bool | ValueKind::Other, None) => Err(FormatError::invalid(
                    kind,
                    format!("kind '{value_kind}' requires a flag"),
                )),
                (ValueKind::Bool | ValueKind::Other, Some(flag)) => require(flag, "flag"),
                _ => Ok(()),
            },
            Shape::Fixed(tokens) => {
                if tokens.is_empty() {
                    Err(FormatError::invalid(kind, "needs at least one token"))
                } else {
                    Ok(())
                }
            }
            Shape::Each(inner) => inner.validate(),
            Shape::Literal | Shape::Custom(_) => Ok(()),
        }
    }

    /// Apply the formatter to a value.
    ///
    /// # Errors
    /// Returns an error for lookup misses, list length violations, and
    /// non-list values given to `each`.
    pub fn format(&self, value: &Value) -> Result<Vec<String>, FormatError> {
        let tokens = match &self.shape {
            Shape::FlagIfTrue(flag) => {
                if is_truthy(value) {
                    vec![flag.clone()]
                } else {
                    Vec::new()
                }
            }
            Shape::FlagIfFalse(flag) => {
                if is_truthy(value) {
                    Vec::new()
                } else {
                    vec![flag.clone()]
                }
            }
            Shape::Toggle { on, off } => {
                if is_truthy(value) {
                    on.clone()
                } else {
                    off.clone()
                }
            }
            Shape::Joined(prefix) => vec![format!("{prefix}{}", render(value))],
            Shape::Split(prefix) => vec![prefix.clone(), render(value)],
            Shape::Equals(prefix) => vec![format!("{prefix}={}", render(value))],
            Shape::Literal => vec![render(value)],
            Shape::List { min, max } => {
                let tokens: Vec<String> = match value {
                    Value::Array(items) => items.iter().map(render).collect(),
                    scalar => vec![render(scalar)],
                };
                let len = tokens.len();
                if len < *min || max.is_some_and(|max| len > max) {
                    return Err(FormatError::ListLength {
                        len,
                        min: *min,
                        max: max.unwrap_or(usize::MAX),
                    });
                }
                tokens
            }
            Shape::Lookup { table, default } => {
                let key = render(value);
                match table.get(&key).or(default.as_ref()) {
                    Some(mapped) => vec![mapped.clone()],
                    None => {
                        return Err(FormatError::LookupMiss {
                            value: key,
                            keys: table.keys().cloned().collect::<Vec<_>>().join(", "),
                        });
                    }
                }
            }
            Shape::TypedDefault { kind, flag } => match kind {
                ValueKind::List => match value {
                    Value::Array(items) => {
                        items.iter().map(|item| format!("--{}", render(item))).collect()
                    }
                    scalar => vec![format!("--{}", render(scalar))],
                },
                ValueKind::Bool => {
                    if is_truthy(value) {
                        flag.iter().cloned().collect()
                    } else {
                        Vec::new()
                    }
                }
                ValueKind::Map => match value {
                    Value::Object(entries) => entries
                        .iter()
                        .map(|(k, v)| format!("--{k}={}", render(v)))
                        .collect(),
                    _ => Vec::new(),
                },
                ValueKind::Other => flag
                    .iter()
                    .cloned()
                    .chain(std::iter::once(render(value)))
                    .collect(),
            },
            Shape::Fixed(tokens) => tokens.clone(),
            Shape::Each(inner) => match value {
                Value::Array(items) => {
                    let mut tokens = Vec::new();
                    for item in items {
                        tokens.extend(inner.format(item)?);
                    }
                    tokens
                }
                other => {
                    return Err(FormatError::NotASequence {
                        value: render(other),
                    });
                }
            },
            Shape::Custom(f) => (**f)(value),
        };
        Ok(tokens)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Formatter");
        dbg.field("kind", &self.kind());
        match &self.shape {
            Shape::FlagIfTrue(flag) | Shape::FlagIfFalse(flag) => dbg.field("flag", flag),
            Shape::Joined(prefix) | Shape::Split(prefix) | Shape::Equals(prefix) => {
                dbg.field("prefix", prefix)
            }
            Shape::Toggle { on, off } => dbg.field("on", on).field("off", off),
            Shape::List { min, max } => dbg.field("min", min).field("max", max),
            Shape::Lookup { table, default } => {
                dbg.field("table", table).field("default", default)
            }
            Shape::TypedDefault { kind, flag } => dbg.field("value_kind", kind).field("flag", flag),
            Shape::Fixed(tokens) => dbg.field("tokens", tokens),
            Shape::Each(inner) => dbg.field("inner", inner),
            Shape::Literal | Shape::Custom(_) => &mut dbg,
        };
        dbg.field("always_renders", &self.always_renders).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fmt;
    use proptest::prelude::*;

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z0-9=/_-]{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                proptest::collection::vec(("[a-z]{1,6}", inner), 0..4)
                    .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    fn catalogue() -> Vec<Formatter> {
        vec![
            fmt::flag_if_true("-f"),
            fmt::flag_if_false("--no-f"),
            fmt::toggle(["--on"], ["--off"]),
            fmt::joined("-O"),
            fmt::split("-o"),
            fmt::equals("--answer"),
            fmt::literal(),
            fmt::list(),
            fmt::lookup_or([("a", "1")], "0"),
            fmt::typed_default(ValueKind::List, None),
            fmt::typed_default(ValueKind::Bool, Some("-b")),
            fmt::typed_default(ValueKind::Map, None),
            fmt::typed_default(ValueKind::Other, Some("--x")),
            fmt::fixed(["--always"]),
        ]
    }

    proptest! {
        #[test]
        fn prop_formatters_are_pure(value in arb_value()) {
            for formatter in catalogue() {
                let first = formatter.format(&value);
                let second = formatter.format(&value);
                prop_assert_eq!(first, second, "{:?} is not deterministic", formatter);
            }
        }

        #[test]
        fn prop_fixed_never_depends_on_value(value in arb_value()) {
            let f = fmt::fixed(["--always-here", "--forever"]);
            prop_assert_eq!(
                f.format(&value).unwrap(),
                vec!["--always-here".to_string(), "--forever".to_string()]
            );
        }
    }

    #[test]
    fn test_debug_names_kind_and_capability() {
        let dbg = format!("{:?}", fmt::fixed(["-P"]));
        assert!(dbg.contains("fixed"));
        assert!(dbg.contains("always_renders: true"));
    }
}
