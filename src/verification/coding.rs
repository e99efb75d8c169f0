//! Level 2 coding test: "sum the even numbers of an integer array".
//!
//! JavaScript submissions are executed against fixed vectors through a
//! [`SnippetRunner`]. The other languages are checked structurally for the
//! constructs a real solution needs.

use crate::error::{PodTrustError, Result};
use crate::types::config::CodingSettings;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodingLanguage {
    JavaScript,
    Python,
    Java,
    Cpp,
}

impl CodingLanguage {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "javascript" | "js" | "node" => Some(Self::JavaScript),
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            "cpp" | "c++" => Some(Self::Cpp),
            _ => None,
        }
    }

    pub fn function_name(self) -> &'static str {
        match self {
            Self::Python => "sum_even_numbers",
            Self::JavaScript | Self::Java | Self::Cpp => "sumEvenNumbers",
        }
    }

    fn rules(self) -> StructuralRules {
        match self {
            Self::JavaScript => StructuralRules {
                function: r"function\s+sumEvenNumbers\s*\(|sumEvenNumbers\s*=\s*(?:function\b|\(|[A-Za-z_$][\w$]*\s*=>)",
                loop_construct: r"\bfor\s*\(|\bwhile\s*\(|\.forEach\s*\(",
                comment: r"(?s)/\*.*?\*/|//[^\n]*",
            },
            Self::Python => StructuralRules {
                function: r"\bdef\s+sum_even_numbers\s*\(",
                loop_construct: r"\bfor\b[^\n]*\bin\b|\bwhile\b",
                comment: r"#[^\n]*",
            },
            Self::Java => StructuralRules {
                function: r"\b(?:int|long|Integer|Long)\s+sumEvenNumbers\s*\(",
                loop_construct: r"\bfor\s*\(|\bwhile\s*\(",
                comment: r"(?s)/\*.*?\*/|//[^\n]*",
            },
            Self::Cpp => StructuralRules {
                function: r"\b(?:int|long|auto)\s+sumEvenNumbers\s*\(",
                loop_construct: r"\bfor\s*\(|\bwhile\s*\(",
                comment: r"(?s)/\*.*?\*/|//[^\n]*",
            },
        }
    }
}

impl fmt::Display for CodingLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::JavaScript => "javascript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Cpp => "cpp",
        };
        f.write_str(name)
    }
}

struct StructuralRules {
    function: &'static str,
    loop_construct: &'static str,
    comment: &'static str,
}

const MODULO_TWO: &str = r"%\s*2\b";
const ACCUMULATOR: &str = r"\w+\s*\+=|\w+\s*=\s*\w+\s*\+\s*\w+";
const RETURN_EXPR: &str = r"\breturn\b\s*([^;\n]*)";
const INTEGER_LITERAL: &str = r"^-?\d+$";

/// Fixed vectors for the executed language: input array and expected sum.
pub const TEST_VECTORS: &[(&[i64], i64)] = &[
    (&[1, 2, 3, 4, 5, 6], 12),
    (&[], 0),
    (&[1, 3, 5, 7], 0),
    (&[2, 4, 6, 8], 20),
    (&[-4, -3, 0, 7, 10], 6),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodingTestOutcome {
    pub passed: bool,
    pub message: String,
}

impl CodingTestOutcome {
    fn pass() -> Self {
        Self {
            passed: true,
            message: "All checks passed".to_string(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    /// The program hit the time limit and was killed.
    pub timed_out: bool,
}

/// Executes a JavaScript program and captures its output.
#[async_trait]
pub trait SnippetRunner: Send + Sync {
    async fn run(&self, program: &str, limit: Duration) -> Result<RunOutput>;
}

/// Runs programs through a local `node` binary. The program is fed on
/// stdin so it never shows up in the child's argument list.
#[derive(Debug, Clone)]
pub struct NodeRunner {
    pub binary: String,
}

impl Default for NodeRunner {
    fn default() -> Self {
        Self {
            binary: "node".to_string(),
        }
    }
}

#[async_trait]
impl SnippetRunner for NodeRunner {
    async fn run(&self, program: &str, limit: Duration) -> Result<RunOutput> {
        let mut child = Command::new(&self.binary)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PodTrustError::Capability(format!("cannot start {}: {e}", self.binary))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(program.as_bytes()).await?;
        }

        // Dropping the pending wait drops the child, and kill_on_drop reaps it.
        match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => {
                let output = output?;
                Ok(RunOutput {
                    success: output.status.success(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    timed_out: false,
                })
            }
            Err(_) => {
                warn!(
                    binary = %self.binary,
                    limit_secs = limit.as_secs(),
                    "submission exceeded the run limit; killed"
                );
                Ok(RunOutput {
                    timed_out: true,
                    ..RunOutput::default()
                })
            }
        }
    }
}

static RUN_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fresh result marker for one run. Submissions cannot predict it, so
/// they cannot forge result lines.
fn run_marker(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(
        Utc::now()
            .timestamp_nanos_opt()
            .unwrap_or_default()
            .to_le_bytes(),
    );
    hasher.update(RUN_COUNTER.fetch_add(1, Ordering::Relaxed).to_le_bytes());
    let digest = hasher.finalize();
    let hex = digest
        .iter()
        .take(12)
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    format!("__podtrust_{hex}__")
}

/// Wraps the submission in its own function scope, then reports every
/// vector on one JSON line through a writer captured before it runs.
fn execution_program(code: &str, marker: &str) -> String {
    let inputs = TEST_VECTORS
        .iter()
        .map(|(input, _)| {
            let values = input
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{values}]")
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"const {marker}emit = process.stdout.write.bind(process.stdout);
const {marker}subject = (function () {{
{code}
return typeof sumEvenNumbers === "function" ? sumEvenNumbers : undefined;
}})();
const {marker}results = [{inputs}].map((input) => {{
  try {{
    return {{ value: {marker}subject(input) }};
  }} catch (error) {{
    return {{ error: String(error) }};
  }}
}});
{marker}emit("{marker}" + JSON.stringify({marker}results) + "\n");
"#
    )
}

#[derive(Debug, Deserialize)]
struct CaseResult {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads the results from the last line carrying `marker`.
fn parse_results(stdout: &str, marker: &str) -> Option<Vec<CaseResult>> {
    let payload = stdout.lines().rev().find_map(|line| {
        line.rfind(marker)
            .map(|start| &line[start + marker.len()..])
    })?;
    serde_json::from_str(payload.trim()).ok()
}

async fn check_execution(
    code: &str,
    runner: &dyn SnippetRunner,
    settings: &CodingSettings,
) -> Result<CodingTestOutcome> {
    let marker = run_marker(code);
    let output = runner
        .run(&execution_program(code, &marker), settings.run_timeout)
        .await?;

    if output.timed_out {
        return Ok(CodingTestOutcome::fail(format!(
            "Code timed out after {}s",
            settings.run_timeout.as_secs()
        )));
    }

    let Some(results) = parse_results(&output.stdout, &marker) else {
        let reason = output
            .stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no output produced");
        debug!(success = output.success, "no result line in runner output");
        return Ok(CodingTestOutcome::fail(format!("Code failed to run: {reason}")));
    };

    for (index, (input, expected)) in TEST_VECTORS.iter().enumerate() {
        let case = index + 1;
        match results.get(index) {
            Some(CaseResult {
                error: Some(error), ..
            }) => {
                return Ok(CodingTestOutcome::fail(format!(
                    "Code threw on test case {case}: {error}"
                )))
            }
            Some(CaseResult {
                value: Some(value), ..
            }) if value.as_i64() == Some(*expected) => {}
            Some(CaseResult { value, .. }) => {
                let got = value
                    .as_ref()
                    .map_or_else(|| "undefined".to_string(), ToString::to_string);
                return Ok(CodingTestOutcome::fail(format!(
                    "Test case {case} failed for input {input:?}: expected {expected}, got {got}"
                )));
            }
            None => {
                return Ok(CodingTestOutcome::fail(format!(
                    "Test case {case} produced no result"
                )))
            }
        }
    }

    Ok(CodingTestOutcome::pass())
}

/// True when every return statement yields a bare integer literal.
fn returns_hardcoded_literal(code: &str) -> Result<bool> {
    let returns = Regex::new(RETURN_EXPR)?;
    let literal = Regex::new(INTEGER_LITERAL)?;
    let expressions = returns
        .captures_iter(code)
        .filter_map(|caps| caps.get(1))
        .map(|expr| expr.as_str().trim().trim_end_matches(';').trim())
        .collect::<Vec<_>>();
    Ok(!expressions.is_empty() && expressions.iter().all(|expr| literal.is_match(expr)))
}

fn strip_comments(code: &str, language: CodingLanguage) -> Result<String> {
    Ok(Regex::new(language.rules().comment)?
        .replace_all(code, "")
        .into_owned())
}

/// Checks shared by every language: the named function exists and the
/// submission actually computes something.
fn preflight(code: &str, language: CodingLanguage) -> Result<Option<CodingTestOutcome>> {
    if !Regex::new(language.rules().function)?.is_match(code) {
        return Ok(Some(CodingTestOutcome::fail(format!(
            "Function `{}` not found",
            language.function_name()
        ))));
    }
    if returns_hardcoded_literal(code)? {
        return Ok(Some(CodingTestOutcome::fail(
            "Submission returns a hardcoded value instead of computing the result",
        )));
    }
    Ok(None)
}

fn check_structure(code: &str, language: CodingLanguage) -> Result<CodingTestOutcome> {
    if !Regex::new(language.rules().loop_construct)?.is_match(code) {
        return Ok(CodingTestOutcome::fail(
            "Missing a loop that iterates over the numbers",
        ));
    }
    if !Regex::new(MODULO_TWO)?.is_match(code) {
        return Ok(CodingTestOutcome::fail(
            "Missing an even-number check using modulo 2",
        ));
    }
    if !Regex::new(ACCUMULATOR)?.is_match(code) {
        return Ok(CodingTestOutcome::fail(
            "Missing an accumulator that adds up the even numbers",
        ));
    }
    if !Regex::new(r"\breturn\b")?.is_match(code) {
        return Ok(CodingTestOutcome::fail("Missing a return statement"));
    }

    Ok(CodingTestOutcome::pass())
}


/// Validates one submission. Failed checks come back as a negative outcome;
/// only an unsupported language or an unavailable runner is an error.
pub async fn evaluate_submission(
    code: &str,
    language: &str,
    runner: &dyn SnippetRunner,
    settings: &CodingSettings,
) -> Result<CodingTestOutcome> {
    let language = CodingLanguage::from_name(language).ok_or_else(|| {
        PodTrustError::Validation(format!("unsupported coding test language: {language}"))
    })?;

    if code.trim().is_empty() {
        return Ok(CodingTestOutcome::fail("Submission is empty"));
    }

    let stripped = strip_comments(code, language)?;
    if let Some(rejection) = preflight(&stripped, language)? {
        return Ok(rejection);
    }

    match language {
        CodingLanguage::JavaScript => check_execution(code, runner, settings).await,
        _ => check_structure(&stripped, language),
    }
}
