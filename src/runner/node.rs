//! Runs JavaScript solutions in a child `node` process with a hard timeout.

use super::{CodeRunner, ExecutionReport, detect_function_name};
use crate::error::Result;
use crate::models::problem::TestCase;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const REPORT_MARKER: &str = "__EXEC_REPORT__";

const HARNESS: &str = r#"
const logs = [];
const show = (a) => (typeof a === 'object' ? JSON.stringify(a, null, 2) : String(a));
console.log = (...args) => logs.push(args.map(show).join(' '));
console.error = (...args) => logs.push('ERROR: ' + args.map(String).join(' '));
console.warn = (...args) => logs.push('WARN: ' + args.map(String).join(' '));
console.info = (...args) => logs.push('INFO: ' + args.map(String).join(' '));
const message = (e) => String((e && e.message) || e);
let report;
try {
  const fn = funcName
    ? new Function(userCode + '\nreturn ' + funcName + ';')()
    : (new Function(userCode)(), null);
  const testResults = testCases.map((tc) => {
    const base = { description: tc.description || '', args: tc.args, expected: tc.expected };
    if (typeof fn !== 'function') {
      return { ...base, actual: null, passed: false, error: 'No function found' };
    }
    try {
      const args = Array.isArray(tc.args) ? tc.args : [tc.args];
      const actual = fn(...args);
      const passed = JSON.stringify(actual) === JSON.stringify(tc.expected);
      return { ...base, actual: actual === undefined ? null : actual, passed };
    } catch (e) {
      return { ...base, actual: null, passed: false, error: message(e) };
    }
  });
  report = { output: logs.join('\n'), error: null, testResults };
} catch (e) {
  report = { output: logs.join('\n'), error: message(e), testResults: [] };
}
process.stdout.write('\n' + marker + JSON.stringify(report) + '\n');
"#;

pub struct NodeRunner {
    binary: String,
    timeout: Duration,
}

impl NodeRunner {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    fn wait_with_timeout(&self, child: &mut Child) -> Result<bool> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if child.try_wait()?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok(false);
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

/// Script that defines the inputs and then runs the harness.
pub fn build_script(code: &str, test_cases: &[TestCase]) -> Result<String> {
    Ok(format!(
        "const userCode = {};\nconst testCases = {};\nconst funcName = {};\nconst marker = {};\n{}",
        serde_json::to_string(code)?,
        serde_json::to_string(test_cases)?,
        serde_json::to_string(&detect_function_name(code))?,
        serde_json::to_string(REPORT_MARKER)?,
        HARNESS
    ))
}

/// Finds the report line printed by the harness.
fn parse_report(stdout: &str) -> Option<ExecutionReport> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.strip_prefix(REPORT_MARKER))
        .and_then(|json| serde_json::from_str(json).ok())
}

fn drain<R: Read + Send + 'static>(source: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut source) = source {
            let _ = source.read_to_string(&mut text);
        }
        text
    })
}

impl CodeRunner for NodeRunner {
    fn is_supported(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn execute(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionReport> {
        let work_dir = TempDir::new()?;
        let script_path = work_dir.path().join("solution.js");
        std::fs::write(&script_path, build_script(code, test_cases)?)?;

        let mut child = Command::new(&self.binary)
            .arg(&script_path)
            .current_dir(work_dir.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let finished = self.wait_with_timeout(&mut child)?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !finished {
            log::warn!("Solution run exceeded {:?}, process killed", self.timeout);
            return Ok(ExecutionReport::timed_out(self.timeout));
        }

        Ok(parse_report(&stdout).unwrap_or_else(|| ExecutionReport {
            output: stdout.trim().to_string(),
            error: Some(if stderr.trim().is_empty() {
                "Process exited without a result".to_string()
            } else {
                stderr.trim().to_string()
            }),
            test_results: Vec::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn two_sum_cases() -> Vec<TestCase> {
        vec![
            TestCase {
                args: json!([[2, 7, 11, 15], 9]),
                expected: json!([0, 1]),
                description: "basic".to_string(),
            },
            TestCase {
                args: json!([[3, 3], 6]),
                expected: json!([0, 1]),
                description: "duplicates".to_string(),
            },
        ]
    }

    #[test]
    fn test_build_script_embeds_inputs() {
        let script = build_script("function twoSum(a, t) { return [0, 1]; }", &two_sum_cases()).unwrap();
        assert!(script.starts_with("const userCode = \"function twoSum"));
        assert!(script.contains("const funcName = \"twoSum\";"));
        assert!(script.contains("\"description\":\"duplicates\""));
    }

    #[test]
    fn test_parse_report_takes_marker_line() {
        let stdout = format!(
            "noise\n{}{{\"output\":\"hi\",\"error\":null,\"testResults\":[]}}\n",
            REPORT_MARKER
        );
        let report = parse_report(&stdout).unwrap();
        assert_eq!(report.output, "hi");
        assert!(parse_report("no report here").is_none());
    }

    #[test]
    fn test_runs_solution_when_node_available() {
        let runner = NodeRunner::new("node", Duration::from_secs(5));
        if !runner.is_supported() {
            return;
        }
        let code = "function twoSum(nums, target) {\n  const seen = new Map();\n  for (let i = 0; i < nums.length; i++) {\n    if (seen.has(target - nums[i])) return [seen.get(target - nums[i]), i];\n    seen.set(nums[i], i);\n  }\n  console.log('none');\n}";

        let report = runner.execute(code, &two_sum_cases()).unwrap();
        assert!(report.error.is_none());
        assert!(report.all_passed());
        assert_eq!(report.passed_count(), 2);
    }

    #[test]
    fn test_infinite_loop_times_out() {
        let runner = NodeRunner::new("node", Duration::from_secs(1));
        if !runner.is_supported() {
            return;
        }
        let report = runner
            .execute("function spin() { while (true) {} }", &[TestCase {
                args: json!([]),
                expected: json!(null),
                description: String::new(),
            }])
            .unwrap();
        assert_eq!(report.error.as_deref(), Some("Execution timed out (1s limit)"));
    }

    #[test]
    fn test_missing_binary_is_unsupported() {
        let runner = NodeRunner::new("definitely-not-a-node-binary", Duration::from_secs(1));
        assert!(!runner.is_supported());
    }
}
