//! Parameter stores and token order.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read access to the caller's already-validated parameter values.
pub trait ParamSource {
    fn get(&self, name: &str) -> Option<&Value>;
}

impl ParamSource for serde_json::Map<String, Value> {
    fn get(&self, name: &str) -> Option<&Value> {
        serde_json::Map::get(self, name)
    }
}

impl<S: BuildHasher> ParamSource for HashMap<String, Value, S> {
    fn get(&self, name: &str) -> Option<&Value> {
        HashMap::get(self, name)
    }
}

impl ParamSource for BTreeMap<String, Value> {
    fn get(&self, name: &str) -> Option<&Value> {
        BTreeMap::get(self, name)
    }
}

/// A JSON object acts as a store; any other value holds no parameters.
impl ParamSource for Value {
    fn get(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

/// The names whose tokens make up one call, in order.
///
/// A name may appear more than once; its formatter is then applied once per
/// occurrence, which is how repeatable flags are expressed.
///
/// ```rust
/// use cmdrunner_engine::ArgsOrder;
///
/// let order = ArgsOrder::from("subcommand  scripted name");
/// assert_eq!(order.names(), ["subcommand", "scripted", "name"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgsOrder(Vec<String>);

impl ArgsOrder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a whitespace-separated list of names.
    #[must_use]
    pub fn parse(names: &str) -> Self {
        names.split_whitespace().collect()
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ArgsOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl<S: Into<String>> FromIterator<S> for ArgsOrder {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for ArgsOrder {
    fn from(names: &str) -> Self {
        Self::parse(names)
    }
}

impl From<String> for ArgsOrder {
    fn from(names: String) -> Self {
        Self::parse(&names)
    }
}

impl From<Vec<String>> for ArgsOrder {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

impl From<&[&str]> for ArgsOrder {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().collect()
    }
}

impl<const N: usize> From<[&str; N]> for ArgsOrder {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ArgsOrder {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
