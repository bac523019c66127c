//! Comparator: decides whether an execution satisfies a case's checks

use super::exec::ExecutionResult;
use super::suite::{ExpectedOutput, TestCase};

/// Check `result` against every expectation configured on `case`
///
/// Returns one reason per failed check; an empty list means the case passed.
pub fn compare(case: &TestCase, result: &ExecutionResult) -> Vec<String> {
    let mut failures = Vec::new();
    let stdout_lower = result.stdout.to_lowercase();

    match &case.expected_in_output {
        Some(ExpectedOutput::All(items)) => {
            for item in items {
                if !stdout_lower.contains(&item.to_lowercase()) {
                    failures.push(format!("Missing item: '{}'", item));
                }
            }
        }
        Some(ExpectedOutput::One(expected)) => {
            if !stdout_lower.contains(&expected.to_lowercase()) {
                failures.push(format!("Expected output not found: '{}'", expected));
            }
        }
        None => {}
    }

    if let Some(expected) = case.expected_returncode {
        if result.exit_code != expected {
            failures.push(format!(
                "Wrong exit code. Expected: {}, got: {}",
                expected, result.exit_code
            ));
        }
    }

    if let Some(expected) = &case.expected_stdout {
        if &result.stdout != expected {
            failures.push(format!(
                "Expected stdout {:?}, got {:?}",
                expected, result.stdout
            ));
        }
    }

    failures
}
