//! Formatter registry for the command runner.
//!
//! A [`Formatter`] turns one parameter's value into an ordered list of
//! command-line tokens. Formatters are built once through the factory
//! functions in [`fmt`] and then applied any number of times; they never look
//! at anything but their construction arguments and the value they are given.
//!
//! ```rust
//! use cmdrunner_format::fmt;
//! use serde_json::json;
//!
//! let force = fmt::flag_if_true("-f");
//! assert_eq!(force.format(&json!(true)).unwrap(), vec!["-f"]);
//! assert!(force.format(&json!(false)).unwrap().is_empty());
//!
//! let mountpoint = fmt::split("-m");
//! assert_eq!(mountpoint.format(&json!("/mnt")).unwrap(), vec!["-m", "/mnt"]);
//! ```

pub mod error;
pub mod fmt;
pub mod formatter;
pub mod value;

pub use error::FormatError;
pub use formatter::Formatter;
pub use serde_json::Value;
pub use value::{ValueKind, is_truthy, render};
