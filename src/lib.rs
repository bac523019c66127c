//! stdio-harness - a black-box test harness for stdin/stdout programs
//!
//! Compiles a target program, drives it through a list of cases over its
//! standard input, and checks its output and exit code.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, HaltPolicy, HarnessConfig, Result};
pub use testing::{CaseOutcome, Harness, TestCase, TestSuite};
