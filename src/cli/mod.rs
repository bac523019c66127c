//! CLI command handling
//!
//! Turns parsed arguments into a configured harness run and an exit code.

use crate::commands::RunArgs;
use crate::common::{Error, HarnessConfig, Result};
use crate::testing::{Harness, TestSuite};

/// Run the harness and return the process exit code
///
/// Fatal errors (configuration, build, missing executable) come back as
/// `Err`; case failures are folded into the exit code.
pub async fn run(args: RunArgs) -> Result<i32> {
    let config = resolve_config(&args)?;

    let suite = match &args.suite {
        Some(path) => TestSuite::load(path)?,
        None => TestSuite::builtin(),
    };
    tracing::debug!(suite = %suite.name, cases = suite.cases.len(), "Loaded test suite");

    let harness = Harness::new(config, args.verbose);
    let report = harness.run(&suite, !args.no_build).await?;
    Ok(report.exit_code())
}

/// Load the configuration file and apply command-line overrides
pub fn resolve_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::load(args.config.as_deref())?;

    if let Some(halt) = args.halt {
        config.halt = halt;
    }
    if let Some(secs) = args.run_timeout {
        config.run_timeout_secs = secs;
    }
    if let Some(secs) = args.compile_timeout {
        config.compile_timeout_secs = secs;
    }
    if config.run_timeout_secs == 0 || config.compile_timeout_secs == 0 {
        return Err(Error::Config("timeouts must be at least 1 second".into()));
    }

    Ok(config)
}
