//! Common utilities: errors, configuration, logging

pub mod config;
pub mod error;
pub mod logging;

pub use config::{HaltPolicy, HarnessConfig};
pub use error::{Error, Result};

/// Render text the way the per-case diagnostics show it: quoted, with
/// newlines and control characters escaped.
pub fn escaped(text: &str) -> String {
    format!("{:?}", text)
}
