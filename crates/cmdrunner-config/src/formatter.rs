//! Declarative formatter definitions.

use std::collections::BTreeMap;

use cmdrunner_format::{Formatter, ValueKind, fmt, render};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of `[runners.NAME.args]`.
///
/// ```toml
/// force = { format = "flag-if-true", flag = "-f" }
/// props = { format = "each", inner = { format = "split", prefix = "-o" } }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArgDef {
    #[serde(flatten)]
    pub spec: FormatterSpec,

    /// Render even when the parameter is absent.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub render_absent: bool,
}

impl ArgDef {
    #[must_use]
    pub fn into_formatter(self) -> Formatter {
        let formatter = self.spec.into_formatter();
        if self.render_absent {
            formatter.render_absent()
        } else {
            formatter
        }
    }
}

impl From<FormatterSpec> for ArgDef {
    fn from(spec: FormatterSpec) -> Self {
        Self {
            spec,
            render_absent: false,
        }
    }
}

/// Serializable mirror of the formatter catalogue. Custom formatters exist
/// only in code and have no counterpart here.
///
/// Keys a format does not take are rejected, `render_absent` excepted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "format", rename_all = "kebab-case", deny_unknown_fields)]
pub enum FormatterSpec {
    FlagIfTrue {
        flag: String,
    },
    FlagIfFalse {
        flag: String,
    },
    Toggle {
        #[serde(default)]
        on: Vec<String>,
        #[serde(default)]
        off: Vec<String>,
    },
    Joined {
        prefix: String,
    },
    Split {
        prefix: String,
    },
    Equals {
        prefix: String,
    },
    // Struct form: a unit variant would accept stray keys.
    Literal {},
    List {
        #[serde(default)]
        min_len: usize,
        #[serde(default)]
        max_len: Option<usize>,
    },
    Lookup {
        table: BTreeMap<String, Value>,
        #[serde(default)]
        default: Option<Value>,
    },
    TypedDefault {
        kind: ValueKind,
        #[serde(default)]
        flag: Option<String>,
    },
    Fixed {
        tokens: Vec<String>,
    },
    Each {
        inner: Box<FormatterSpec>,
    },
}

impl FormatterSpec {
    /// Build the formatter. Argument validation happens when the runner is
    /// built, so an empty flag here still yields a formatter.
    #[must_use]
    pub fn into_formatter(self) -> Formatter {
        match self {
            Self::FlagIfTrue { flag } => fmt::flag_if_true(flag),
            Self::FlagIfFalse { flag } => fmt::flag_if_false(flag),
            Self::Toggle { on, off } => fmt::toggle(on, off),
            Self::Joined { prefix } => fmt::joined(prefix),
            Self::Split { prefix } => fmt::split(prefix),
            Self::Equals { prefix } => fmt::equals(prefix),
            Self::Literal {} => fmt::literal(),
            Self::List { min_len: 0, max_len: None } => fmt::list(),
            Self::List { min_len, max_len } => fmt::list_bounded(min_len, max_len),
            Self::Lookup { table, default } => {
                let table = table.into_iter().map(|(k, v)| (k, render(&v)));
                match default {
                    Some(default) => fmt::lookup_or(table, render(&default)),
                    None => fmt::lookup(table),
                }
            }
            Self::TypedDefault { kind, flag } => fmt::typed_default(kind, flag.as_deref()),
            Self::Fixed { tokens } => fmt::fixed(tokens),
            Self::Each { inner } => fmt::each(inner.into_formatter()),
        }
    }
}
