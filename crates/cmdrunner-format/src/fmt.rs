//! Formatter factories.
//!
//! Each factory is called once while a runner is being configured and returns
//! a reusable [`Formatter`]. Construction arguments are checked by
//! [`Formatter::validate`] when the runner is built.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::formatter::{Formatter, Shape};
use crate::value::ValueKind;

fn strings<I, S>(tokens: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tokens.into_iter().map(Into::into).collect()
}

/// Truthy value renders `[flag]`, anything else renders nothing.
#[must_use]
pub fn flag_if_true(flag: impl Into<String>) -> Formatter {
    Formatter::new(Shape::FlagIfTrue(flag.into()))
}

/// Negated switch: falsy or absent value renders `[flag]`.
#[must_use]
pub fn flag_if_false(flag: impl Into<String>) -> Formatter {
    Formatter::new(Shape::FlagIfFalse(flag.into()))
}

/// Truthy value renders `on`, anything else renders `off`.
#[must_use]
pub fn toggle<I, J, S, T>(on: I, off: J) -> Formatter
where
    I: IntoIterator<Item = S>,
    J: IntoIterator<Item = T>,
    S: Into<String>,
    T: Into<String>,
{
    Formatter::new(Shape::Toggle {
        on: strings(on),
        off: strings(off),
    })
}

/// One token, `prefix` immediately followed by the value (`-Ofoo`).
#[must_use]
pub fn joined(prefix: impl Into<String>) -> Formatter {
    Formatter::new(Shape::Joined(prefix.into()))
}

/// Two tokens, `prefix` then the value (`-o foo`).
#[must_use]
pub fn split(prefix: impl Into<String>) -> Formatter {
    Formatter::new(Shape::Split(prefix.into()))
}

/// One token, `prefix=value`.
#[must_use]
pub fn equals(prefix: impl Into<String>) -> Formatter {
    Formatter::new(Shape::Equals(prefix.into()))
}

/// The value itself as a single token.
#[must_use]
pub fn literal() -> Formatter {
    Formatter::new(Shape::Literal)
}

/// One token per list element; a scalar becomes a single token.
#[must_use]
pub fn list() -> Formatter {
    Formatter::new(Shape::List { min: 0, max: None })
}

/// Like [`list`], failing at call time when the element count is outside
/// `min..=max`.
#[must_use]
pub fn list_bounded(min: usize, max: Option<usize>) -> Formatter {
    Formatter::new(Shape::List { min, max })
}

/// Maps the rendered value through `table`; a miss fails at call time.
#[must_use]
pub fn lookup<I, K, V>(table: I) -> Formatter
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    Formatter::new(Shape::Lookup {
        table: build_table(table),
        default: None,
    })
}

/// Like [`lookup`], rendering `default` on a miss.
#[must_use]
pub fn lookup_or<I, K, V>(table: I, default: impl Display) -> Formatter
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    Formatter::new(Shape::Lookup {
        table: build_table(table),
        default: Some(default.to_string()),
    })
}

fn build_table<I, K, V>(table: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Display,
{
    table
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect()
}

/// Renders according to a declared kind:
///
/// - `List`: `"--{elem}"` per element
/// - `Bool`: `[flag]` when truthy, nothing otherwise
/// - `Map`: `"--{key}={value}"` per entry, in insertion order
/// - `Other`: `[flag, value]`
#[must_use]
pub fn typed_default(kind: ValueKind, flag: Option<&str>) -> Formatter {
    Formatter::new(Shape::TypedDefault {
        kind,
        flag: flag.map(str::to_string),
    })
}

/// Always renders `tokens`, whatever the value, including an absent one.
#[must_use]
pub fn fixed<I, S>(tokens: I) -> Formatter
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Formatter::rendering_always(Shape::Fixed(strings(tokens)))
}

/// Applies `inner` to every element of a list value and concatenates.
#[must_use]
pub fn each(inner: Formatter) -> Formatter {
    Formatter::new(Shape::Each(Box::new(inner)))
}

/// Wraps a caller-supplied pure function.
#[must_use]
pub fn custom<F>(f: F) -> Formatter
where
    F: Fn(&Value) -> Vec<String> + Send + Sync + 'static,
{
    Formatter::new(Shape::Custom(Arc::new(f)))
}
