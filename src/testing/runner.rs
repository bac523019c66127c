//! Test runner implementation
//!
//! Builds the target, then runs each case in order, one child process at a
//! time, printing diagnostics as it goes. The halt policy decides which
//! outcomes stop the run.

use std::path::Path;

use colored::Colorize;

use crate::common::{escaped, HaltPolicy, HarnessConfig, Result};

use super::build::{compile, resolve_executable};
use super::compare::compare;
use super::exec::run_case;
use super::suite::{TestCase, TestSuite};

/// Result of running one case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    /// One reason per failed check
    Failed(Vec<String>),
    TimedOut,
    /// The program could not be spawned or talked to
    Errored(String),
}

impl CaseOutcome {
    /// Whether this outcome stops the run under `policy`
    pub fn halts(&self, policy: HaltPolicy) -> bool {
        match policy {
            HaltPolicy::Never => false,
            HaltPolicy::OnFailure => matches!(self, CaseOutcome::Failed(_)),
            HaltPolicy::OnAnyProblem => !matches!(self, CaseOutcome::Passed),
        }
    }
}

/// Outcome of one executed case
#[derive(Debug, Clone)]
pub struct CaseReport {
    pub name: String,
    pub outcome: CaseOutcome,
}

/// Result of a whole run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub suite: String,
    /// Number of cases in the suite, executed or not
    pub total: usize,
    /// Executed cases, in order
    pub cases: Vec<CaseReport>,
    /// A case produced an outcome that halts the run under the policy
    pub halted: bool,
}

impl RunReport {
    fn count(&self, pred: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Failed(_)))
    }

    pub fn timed_out(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::TimedOut))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, CaseOutcome::Errored(_)))
    }

    pub fn not_run(&self) -> usize {
        self.total - self.cases.len()
    }

    /// Process exit code: 1 on any comparator failure or halting outcome
    ///
    /// Timeouts and invocation errors that the policy lets through leave the
    /// run successful.
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 || self.halted {
            1
        } else {
            0
        }
    }
}

/// Compile-run-compare driver
pub struct Harness {
    config: HarnessConfig,
    verbose: bool,
}

impl Harness {
    pub fn new(config: HarnessConfig, verbose: bool) -> Self {
        Self { config, verbose }
    }

    /// Build (unless `build` is false), resolve the executable and run the
    /// suite
    ///
    /// Build and resolution failures are returned as errors; everything that
    /// happens to individual cases is in the report.
    pub async fn run(&self, suite: &TestSuite, build: bool) -> Result<RunReport> {
        if build {
            compile(&self.config, self.verbose).await?;
        }
        let executable = resolve_executable(&self.config)?;
        Ok(self.run_cases(&executable, suite).await)
    }

    /// Run every case against an already-built executable
    pub async fn run_cases(&self, executable: &Path, suite: &TestSuite) -> RunReport {
        let total = suite.cases.len();

        println!(
            "\n{} {} ({})",
            "Testing program:".blue().bold(),
            executable.display().to_string().white().bold(),
            suite.name.dimmed()
        );
        println!("{}", "=".repeat(50));

        let mut report = RunReport {
            suite: suite.name.clone(),
            total,
            cases: Vec::with_capacity(total),
            halted: false,
        };

        for (i, case) in suite.cases.iter().enumerate() {
            println!("\n--- Test {}/{}: {} ---", i + 1, total, case.name);

            let outcome = self.run_one(executable, case).await;
            print_outcome(&outcome);

            let halts = outcome.halts(self.config.halt);
            report.cases.push(CaseReport {
                name: case.name.clone(),
                outcome,
            });

            if halts {
                report.halted = true;
                tracing::info!(case = %case.name, "Halting run after case");
                break;
            }
        }

        print_summary(&report);
        report
    }

    /// Run a single case and judge it
    pub async fn run_one(&self, executable: &Path, case: &TestCase) -> CaseOutcome {
        println!("Input: {}", escaped(&case.input));

        let result = match run_case(executable, case, self.config.run_timeout()).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(case = %case.name, "Invocation failed: {}", e);
                return CaseOutcome::Errored(e.to_string());
            }
        };

        if result.timed_out {
            return CaseOutcome::TimedOut;
        }

        println!("Exit code: {}", result.exit_code);
        println!("STDOUT: {}", escaped(&result.stdout));
        if !result.stderr.is_empty() {
            println!("STDERR: {}", escaped(&result.stderr));
        }

        let failures = compare(case, &result);
        if failures.is_empty() {
            CaseOutcome::Passed
        } else {
            CaseOutcome::Failed(failures)
        }
    }
}

fn print_outcome(outcome: &CaseOutcome) {
    match outcome {
        CaseOutcome::Passed => println!("{} Test passed", "✓".green()),
        CaseOutcome::Failed(reasons) => {
            for reason in reasons {
                println!("{} {}", "⚠".yellow(), reason);
            }
            println!("{} Test failed", "✗".red());
        }
        CaseOutcome::TimedOut => {
            println!("{} Timeout - the program is not responding", "✗".red())
        }
        CaseOutcome::Errored(e) => println!("{} Error during test: {}", "✗".red(), e),
    }
}

fn print_summary(report: &RunReport) {
    println!("\n{}", "=".repeat(50));
    let line = format!(
        "{} passed, {} failed, {} timed out, {} errored, {} not run",
        report.passed(),
        report.failed(),
        report.timed_out(),
        report.errored(),
        report.not_run()
    );
    if report.exit_code() == 0 {
        println!("{} {}", "✓".green().bold(), line.green());
    } else {
        println!("{} {}", "✗".red().bold(), line.red());
    }
}
