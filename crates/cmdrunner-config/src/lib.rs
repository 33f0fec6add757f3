//! Runner definitions loaded from TOML.
//!
//! A configuration file declares named runners under `[runners.NAME]`; each
//! becomes a [`cmdrunner_engine::CmdRunnerBuilder`] once loaded. Discovery
//! follows `--config`, then `CMDRUNNER_CONFIG`, then an upward search for
//! `.cmdrunner/config.toml`.

mod discovery;
mod error;
mod formatter;
mod model;

pub use discovery::{CONFIG_DIR, CONFIG_ENV_VAR, CONFIG_FILE, ConfigSource};
pub use error::ConfigError;
pub use formatter::{ArgDef, FormatterSpec};
pub use model::{Config, ForceLang, RunnerDef};
