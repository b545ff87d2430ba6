//! Running user solutions against a problem's test cases.
//!
//! Execution is a capability that may be missing on a given machine, so
//! callers ask [`CodeRunner::is_supported`] before offering it.

pub mod node;

use crate::error::{Result, StudyError};
use crate::models::problem::TestCase;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use node::NodeRunner;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    #[serde(default)]
    pub description: String,
    pub args: serde_json::Value,
    pub expected: serde_json::Value,
    #[serde(default)]
    pub actual: Option<serde_json::Value>,
    pub passed: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    /// Captured console output, one entry per line.
    pub output: String,
    pub error: Option<String>,
    pub test_results: Vec<TestCaseResult>,
}

impl ExecutionReport {
    pub fn timed_out(limit: Duration) -> Self {
        Self {
            output: String::new(),
            error: Some(format!("Execution timed out ({}s limit)", limit.as_secs())),
            test_results: Vec::new(),
        }
    }

    pub fn passed_count(&self) -> usize {
        self.test_results.iter().filter(|r| r.passed).count()
    }

    pub fn all_passed(&self) -> bool {
        self.error.is_none()
            && !self.test_results.is_empty()
            && self.test_results.iter().all(|r| r.passed)
    }
}

pub trait CodeRunner: Send + Sync {
    fn is_supported(&self) -> bool;

    fn execute(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionReport>;
}

/// Stand-in where no runtime is available.
pub struct UnsupportedRunner;

impl CodeRunner for UnsupportedRunner {
    fn is_supported(&self) -> bool {
        false
    }

    fn execute(&self, _code: &str, _test_cases: &[TestCase]) -> Result<ExecutionReport> {
        Err(StudyError::Unsupported(
            "no JavaScript runtime found".to_string(),
        ))
    }
}

/// Name of the function the tests call: the first `function name`, else
/// the first `const|let|var name = (` or `= function`.
pub fn detect_function_name(code: &str) -> Option<String> {
    let declared = Regex::new(r"function\s+(\w+)").ok()?;
    if let Some(caps) = declared.captures(code) {
        return Some(caps[1].to_string());
    }
    let assigned = Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:\(|function)").ok()?;
    assigned.captures(code).map(|caps| caps[1].to_string())
}
