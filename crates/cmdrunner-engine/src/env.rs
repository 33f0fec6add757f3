//! Child process environment.
//!
//! Layers, lowest precedence first: the inherited environment, the forced
//! locale pair, the runner's configured overrides, the per-call overrides.

use std::collections::BTreeMap;

/// Locale token forced on children unless the runner disables it.
pub const DEFAULT_FORCE_LANG: &str = "C";

const LANGUAGE_VAR: &str = "LANGUAGE";
const LC_ALL_VAR: &str = "LC_ALL";

/// An ordered set of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Snapshot of the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    #[must_use]
    pub fn from_system() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::default().overlay(vars)
    }

    /// Set `LANGUAGE` and `LC_ALL` to `lang`; `None` leaves both untouched.
    #[must_use]
    pub fn force_locale(self, lang: Option<&str>) -> Self {
        match lang {
            Some(lang) => self.overlay([(LANGUAGE_VAR, lang), (LC_ALL_VAR, lang)]),
            None => self,
        }
    }

    /// Apply `vars` on top of the current layers.
    #[must_use]
    pub fn overlay<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }

    #[must_use]
    pub fn into_vars(self) -> BTreeMap<String, String> {
        self.vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_precedence() {
        let env = Environment::from_vars([("LC_ALL", "en_US.UTF-8"), ("HOME", "/root")])
            .force_locale(Some("C"))
            .overlay([("ZPOOL_VDEV_NAME_PATH", "1"), ("HOME", "/home/op")])
            .overlay([("ZPOOL_VDEV_NAME_PATH", "0")]);

        assert_eq!(env.get("LC_ALL"), Some("C"));
        assert_eq!(env.get("LANGUAGE"), Some("C"));
        assert_eq!(env.get("HOME"), Some("/home/op"));
        assert_eq!(env.get("ZPOOL_VDEV_NAME_PATH"), Some("0"));
    }

    #[test]
    fn test_configured_override_beats_forced_locale() {
        let env = Environment::default()
            .force_locale(Some("C"))
            .overlay([("LC_ALL", "C.UTF-8")]);
        assert_eq!(env.get("LC_ALL"), Some("C.UTF-8"));
        assert_eq!(env.get("LANGUAGE"), Some("C"));
    }

    #[test]
    fn test_disabled_locale_keeps_inherited() {
        let env = Environment::from_vars([("LC_ALL", "de_DE.UTF-8")]).force_locale(None);
        assert_eq!(env.get("LC_ALL"), Some("de_DE.UTF-8"));
        assert_eq!(env.get("LANGUAGE"), None);
    }

    #[test]
    fn test_from_system_contains_path() {
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(Environment::from_system().get("PATH"), Some(path.as_str()));
        }
    }
}
