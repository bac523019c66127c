//! Test case definitions
//!
//! Cases come either from the built-in suite or from a YAML file:
//!
//! ```yaml
//! name: alphabet
//! cases:
//!   - name: shorter than the alphabet
//!     input: "abcde\n4\n"
//!     expected_in_output: [abcd]
//!   - name: exit code only
//!     input: ""
//!     expected_returncode: 0
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::common::{Error, Result};

/// A list of cases run in order against one target
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestSuite {
    /// Name shown in the report header
    #[serde(default = "default_suite_name")]
    pub name: String,
    /// The cases, in execution order
    pub cases: Vec<TestCase>,
}

fn default_suite_name() -> String {
    "suite".to_string()
}

/// One input fed to the target plus the checks applied to what it printed
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestCase {
    /// Name of the case
    pub name: String,
    /// Text written to the target's standard input
    #[serde(default)]
    pub input: String,
    /// Case-insensitive substring checks against stdout
    pub expected_in_output: Option<ExpectedOutput>,
    /// Expected exit code (exact match)
    pub expected_returncode: Option<i32>,
    /// Expected stdout (exact, case-sensitive match)
    pub expected_stdout: Option<String>,
}

/// Substring expectation: a list where every entry must be present, or a
/// single string
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ExpectedOutput {
    All(Vec<String>),
    One(String),
}

impl TestCase {
    /// Create a case with no checks
    pub fn new(name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            input: input.into(),
            expected_in_output: None,
            expected_returncode: None,
            expected_stdout: None,
        }
    }

    /// Require every one of `items` to appear in stdout
    pub fn expect_all<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_in_output = Some(ExpectedOutput::All(
            items.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Require `item` to appear in stdout
    pub fn expect_one(mut self, item: impl Into<String>) -> Self {
        self.expected_in_output = Some(ExpectedOutput::One(item.into()));
        self
    }

    pub fn expect_returncode(mut self, code: i32) -> Self {
        self.expected_returncode = Some(code);
        self
    }

    pub fn expect_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.expected_stdout = Some(stdout.into());
        self
    }
}

impl TestSuite {
    /// Load a suite from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a suite from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let suite: Self = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse test suite: {}", e)))?;
        if suite.cases.is_empty() {
            return Err(Error::Config("Test suite has no cases".to_string()));
        }
        Ok(suite)
    }

    /// The stock suite for the alphabet program: given an alphabet and a
    /// count N, it prints the first N characters, wrapping around, and
    /// nothing for a negative or non-numeric N.
    pub fn builtin() -> Self {
        Self {
            name: "alphabet".to_string(),
            cases: vec![
                TestCase::new("count shorter than the alphabet", "abcde\n4\n").expect_all(["abcd"]),
                TestCase::new(
                    "special characters, count shorter than the alphabet",
                    "aA1@!2\n4\n",
                )
                .expect_all(["aA1@"]),
                TestCase::new("count longer than the alphabet", "azerty\n9\n")
                    .expect_all(["azertyaze"]),
                TestCase::new("negative count", "azerty\n-9\n").expect_all([""]),
                TestCase::new("non-numeric count", "azerty\na\n").expect_all([""]),
            ],
        }
    }
}
