//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Result;

/// Configuration file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "harness.toml";

/// Main configuration structure
///
/// Every field has a default, so an empty file (or no file at all) yields
/// the stock `g++ genemdp.cpp -o genemdp` setup.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Source file handed to the compiler, relative to `work_dir`
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Executable name produced by the compiler, without platform suffix
    #[serde(default = "default_binary_name")]
    pub binary_name: String,

    /// Directory the compiler runs in and the executable is looked up in
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Compiler program, looked up on PATH unless it contains a separator
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Compiler arguments; `{source}` and `{binary}` are substituted
    #[serde(default = "default_compiler_args")]
    pub compiler_args: Vec<String>,

    /// Timeout for the build step, in seconds
    #[serde(default = "default_compile_timeout")]
    pub compile_timeout_secs: u64,

    /// Timeout for a single case, in seconds
    #[serde(default = "default_run_timeout")]
    pub run_timeout_secs: u64,

    /// Executable suffixes tried in order when resolving the binary
    #[serde(default = "default_suffix_candidates")]
    pub platform_suffix_candidates: Vec<String>,

    /// When to stop running further cases
    #[serde(default)]
    pub halt: HaltPolicy,
}

/// Which case outcomes stop the run
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HaltPolicy {
    /// Run every case regardless of outcome
    Never,
    /// Stop at the first comparator failure; timeouts and invocation
    /// errors are reported and the run continues
    #[default]
    OnFailure,
    /// Stop at the first case that did not pass
    OnAnyProblem,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            binary_name: default_binary_name(),
            work_dir: default_work_dir(),
            compiler: default_compiler(),
            compiler_args: default_compiler_args(),
            compile_timeout_secs: default_compile_timeout(),
            run_timeout_secs: default_run_timeout(),
            platform_suffix_candidates: default_suffix_candidates(),
            halt: HaltPolicy::default(),
        }
    }
}

fn default_source_path() -> PathBuf {
    PathBuf::from("genemdp.cpp")
}

fn default_binary_name() -> String {
    "genemdp".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_compiler() -> String {
    "g++".to_string()
}

fn default_compiler_args() -> Vec<String> {
    vec!["{source}".into(), "-o".into(), "{binary}".into()]
}

fn default_compile_timeout() -> u64 {
    30
}

fn default_run_timeout() -> u64 {
    10
}

fn default_suffix_candidates() -> Vec<String> {
    if cfg!(windows) {
        vec![".exe".into(), String::new()]
    } else {
        vec![String::new(), ".exe".into()]
    }
}

impl HarnessConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `harness.toml` in the
    /// current directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                path
            }
        };

        let content =
            std::fs::read_to_string(&path).map_err(|e| super::Error::file_read(&path, e))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.binary_name.is_empty() {
            return Err(super::Error::Config("'binary_name' must not be empty".into()));
        }
        if self.platform_suffix_candidates.is_empty() {
            return Err(super::Error::Config(
                "'platform_suffix_candidates' needs at least one entry".into(),
            ));
        }
        if self.run_timeout_secs == 0 || self.compile_timeout_secs == 0 {
            return Err(super::Error::Config("timeouts must be at least 1 second".into()));
        }
        Ok(())
    }

    pub fn compile_timeout(&self) -> Duration {
        Duration::from_secs(self.compile_timeout_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    /// Compiler arguments with placeholders filled in
    pub fn expanded_compiler_args(&self) -> Vec<String> {
        let source = self.source_path.to_string_lossy();
        self.compiler_args
            .iter()
            .map(|arg| {
                arg.replace("{source}", &source)
                    .replace("{binary}", &self.binary_name)
            })
            .collect()
    }
}
