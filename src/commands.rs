//! CLI argument definitions
//!
//! Every flag is optional: with no arguments the harness builds the target
//! and runs the built-in suite with the configured (or default) settings.

use clap::Args;
use std::path::PathBuf;

use crate::common::HaltPolicy;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// TOML configuration file (default: ./harness.toml if present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// YAML test suite to run instead of the built-in one
    #[arg(long, short)]
    pub suite: Option<PathBuf>,

    /// Skip the build step and test the existing executable
    #[arg(long)]
    pub no_build: bool,

    /// Which case outcomes stop the run
    #[arg(long, value_enum)]
    pub halt: Option<HaltPolicy>,

    /// Per-case timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub run_timeout: Option<u64>,

    /// Build timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub compile_timeout: Option<u64>,

    /// Show the compiler command and its output
    #[arg(long, short)]
    pub verbose: bool,

    /// Also append logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}
