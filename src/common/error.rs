//! Error types for the harness
//!
//! Fatal errors abort the whole run. `Invocation` is recovered by the
//! runner and turned into a per-case outcome; timeouts never surface as
//! errors, they are flagged on the execution result.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Build Errors ===
    #[error("Compiler '{0}' not found. Install it or set 'compiler' in harness.toml")]
    CompilerNotFound(String),

    #[error("Failed to start compiler '{compiler}': {reason}")]
    CompilerSpawn { compiler: String, reason: String },

    #[error("Compilation failed (exit code {code:?}): {stderr}")]
    Compile { code: Option<i32>, stderr: String },

    #[error("Compilation timed out after {0} seconds")]
    CompileTimeout(u64),

    #[error("Executable not found after compilation. Searched: {searched}")]
    ExecutableNotFound { searched: String },

    // === Case Errors ===
    #[error("Failed to run program: {0}")]
    Invocation(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create an executable not found error listing every candidate path
    pub fn executable_not_found<S: AsRef<str>>(candidates: &[S]) -> Self {
        Self::ExecutableNotFound {
            searched: candidates
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Process exit code to use when this error aborts the run
    ///
    /// A failing compiler's own exit code is propagated.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Compile {
                code: Some(code), ..
            } if *code != 0 => *code,
            Error::Compile { .. } => 1,
            _ => 2,
        }
    }
}
