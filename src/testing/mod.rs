//! Black-box test harness
//!
//! Compiles a target program, feeds each case's input to it over stdin and
//! checks what it printed. The target is only ever seen through its stdin,
//! stdout, stderr and exit code.

mod build;
mod compare;
mod exec;
mod runner;
mod suite;

pub use build::{compile, executable_candidates, resolve_executable};
pub use compare::compare;
pub use exec::{run_case, run_process, ExecutionResult};
pub use runner::{CaseOutcome, CaseReport, Harness, RunReport};
pub use suite::{ExpectedOutput, TestCase, TestSuite};
