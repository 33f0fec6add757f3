//! TOML data model.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use cmdrunner_engine::{ArgsOrder, CmdRunner, CmdRunnerBuilder, DEFAULT_FORCE_LANG};
use serde::{Deserialize, Deserializer, Serialize};

use crate::discovery::ConfigSource;
use crate::error::ConfigError;
use crate::formatter::ArgDef;

/// All runners declared in one configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub runners: BTreeMap<String, RunnerDef>,

    #[serde(skip)]
    source: ConfigSource,
}

/// `[runners.NAME]`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerDef {
    pub command: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command_args: Vec<String>,

    /// Either `"a b c"` or `["a", "b", "c"]`.
    #[serde(default, deserialize_with = "order_from_words_or_list")]
    pub default_order: ArgsOrder,

    #[serde(default = "default_check_rc")]
    pub check_rc: bool,

    #[serde(default)]
    pub force_lang: ForceLang,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path_prefix: Vec<PathBuf>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub args: BTreeMap<String, ArgDef>,
}

fn default_check_rc() -> bool {
    true
}

fn order_from_words_or_list<'de, D>(deserializer: D) -> Result<ArgsOrder, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Words(String),
        List(Vec<String>),
    }

    Ok(match Repr::deserialize(deserializer)? {
        Repr::Words(words) => ArgsOrder::parse(&words),
        Repr::List(names) => ArgsOrder::from(names),
    })
}

/// `force_lang = "C.UTF-8"`, `force_lang = true` (the default locale) or
/// `force_lang = false` (leave the inherited locale alone).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ForceLang {
    Enabled(bool),
    Locale(String),
}

impl Default for ForceLang {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl ForceLang {
    #[must_use]
    pub fn as_locale(&self) -> Option<&str> {
        match self {
            Self::Enabled(true) => Some(DEFAULT_FORCE_LANG),
            Self::Enabled(false) => None,
            Self::Locale(lang) => Some(lang),
        }
    }
}

impl RunnerDef {
    /// A builder carrying everything this definition declares. Callers may
    /// still attach an executor or resolver before building.
    #[must_use]
    pub fn builder(&self) -> CmdRunnerBuilder {
        CmdRunner::builder(self.command.clone())
            .command_args(self.command_args.iter().cloned())
            .default_order(self.default_order.clone())
            .check_rc(self.check_rc)
            .force_lang(self.force_lang.as_locale())
            .path_prefix(self.path_prefix.iter().cloned())
            .envs(self.env.clone())
            .args(
                self.args
                    .iter()
                    .map(|(name, def)| (name.clone(), def.clone().into_formatter())),
            )
    }
}

impl Config {
    /// Parse and validate a configuration document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or formatter
    /// declarations and [`ConfigError::InvalidRunner`] when a runner would
    /// not build.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "<inline>".to_string(), ConfigSource::Inline)
    }

    /// Load a configuration file from `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::NotFound`] if the file does not exist, and the
    /// errors of [`Config::from_toml_str`] otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_as(path, ConfigSource::Cli(path.to_path_buf()))
    }

    pub(crate) fn load_as(path: &Path, source: ConfigSource) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(&content, path.display().to_string(), source)
    }

    fn parse(content: &str, origin: String, source: ConfigSource) -> Result<Self, ConfigError> {
        let mut config: Self =
            toml::from_str(content).map_err(|source| ConfigError::Parse { origin, source })?;
        config.source = source;
        config.validate()?;
        tracing::debug!(
            source = %config.source,
            runners = config.runners.len(),
            "loaded runner configuration"
        );
        Ok(config)
    }

    /// Build every runner once to surface configuration errors at load time.
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, def) in &self.runners {
            def.builder()
                .build()
                .map_err(|source| ConfigError::InvalidRunner {
                    runner: name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    /// Where this configuration came from.
    #[must_use]
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub(crate) fn with_source(mut self, source: ConfigSource) -> Self {
        self.source = source;
        self
    }

    pub fn runner_names(&self) -> impl Iterator<Item = &str> {
        self.runners.keys().map(String::as_str)
    }

    /// # Errors
    /// Returns [`ConfigError::UnknownRunner`] if `name` is not configured.
    pub fn runner_def(&self, name: &str) -> Result<&RunnerDef, ConfigError> {
        self.runners
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRunner {
                name: name.to_string(),
                known: if self.runners.is_empty() {
                    "none".to_string()
                } else {
                    self.runner_names().collect::<Vec<_>>().join(", ")
                },
            })
    }

    /// # Errors
    /// Returns [`ConfigError::UnknownRunner`] if `name` is not configured.
    pub fn builder(&self, name: &str) -> Result<CmdRunnerBuilder, ConfigError> {
        Ok(self.runner_def(name)?.builder())
    }

    /// Build the named runner with the default executor and resolver.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownRunner`] or [`ConfigError::InvalidRunner`].
    pub fn build_runner(&self, name: &str) -> Result<CmdRunner, ConfigError> {
        self.builder(name)?
            .build()
            .map_err(|source| ConfigError::InvalidRunner {
                runner: name.to_string(),
                source,
            })
    }
}
