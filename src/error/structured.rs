//! Structured error output.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for fixing the test file or invocation
//! - Context for locating the offending line
//!
//! CI jobs that wrap the harness read the JSON form; people read the
//! human form.

use crate::dispatch::OPERATOR_NAMES;
use crate::error::HarnessError;
use crate::script::ROUNDING_TOKENS;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === I/O Errors (exit code 2) ===
    /// Test file could not be opened
    SourceUnreadable,
    /// Read failure mid-file
    IoError,

    // === Script Errors (exit code 3) ===
    /// Bad `precision:` value
    InvalidPrecision,
    /// Bad `rounding:` value
    InvalidRounding,
    /// Test line does not follow the dialect grammar
    MalformedTest,
    /// Operand or expected value is not a decimal number
    UnparsableOperand,
    /// Operator not in the dispatch table
    UnknownOperator,
    /// Operator used with the wrong number of operands
    ArityMismatch,

    // === Config Errors (exit code 4) ===
    /// Configuration error
    ConfigError,
    /// No input files
    NoInputs,
    /// Config parse error
    ConfigParseError,

    // === Internal Errors (exit code 1) ===
    /// Unexpected internal error
    InternalError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SourceUnreadable => "SOURCE_UNREADABLE",
            Self::IoError => "IO_ERROR",
            Self::InvalidPrecision => "INVALID_PRECISION",
            Self::InvalidRounding => "INVALID_ROUNDING",
            Self::MalformedTest => "MALFORMED_TEST",
            Self::UnparsableOperand => "UNPARSABLE_OPERAND",
            Self::UnknownOperator => "UNKNOWN_OPERATOR",
            Self::ArityMismatch => "ARITY_MISMATCH",
            Self::ConfigError => "CONFIG_ERROR",
            Self::NoInputs => "NO_INPUTS",
            Self::ConfigParseError => "CONFIG_PARSE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Get the exit code for this error category.
    ///
    /// - 1: Internal/unknown errors
    /// - 2: I/O errors
    /// - 3: Script errors (the test file is malformed)
    /// - 4: Config errors
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SourceUnreadable | Self::IoError => 2,
            Self::InvalidPrecision
            | Self::InvalidRounding
            | Self::MalformedTest
            | Self::UnparsableOperand
            | Self::UnknownOperator
            | Self::ArityMismatch => 3,
            Self::ConfigError | Self::NoInputs | Self::ConfigParseError => 4,
            Self::InternalError => 1,
        }
    }
}

/// Structured error for machine-parseable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Additional context data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    /// Create a new structured error from a `HarnessError`.
    #[must_use]
    pub fn from_error(err: &HarnessError) -> Self {
        let (code, mut context) = Self::extract_code_and_context(err.root());
        if let HarnessError::WithContext { context: location, .. } = err {
            let entry = context.get_or_insert_with(|| json!({}));
            entry["location"] = json!(location);
        }
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            context,
        }
    }

    /// Serialize to JSON value.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "context": self.context,
            }
        })
    }

    /// Format for human-readable output.
    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &HarnessError) -> (ErrorCode, Option<Value>) {
        match err {
            HarnessError::SourceUnreadable { path, .. } => (
                ErrorCode::SourceUnreadable,
                Some(json!({"path": path.display().to_string()})),
            ),
            HarnessError::Io(_) => (ErrorCode::IoError, None),
            HarnessError::InvalidPrecision { value } => {
                (ErrorCode::InvalidPrecision, Some(json!({"value": value})))
            }
            HarnessError::InvalidRounding { mode } => (
                ErrorCode::InvalidRounding,
                Some(json!({"provided": mode, "valid_values": ROUNDING_TOKENS})),
            ),
            HarnessError::MalformedTest { line, reason } => (
                ErrorCode::MalformedTest,
                Some(json!({"line": line, "reason": reason})),
            ),
            HarnessError::UnparsableOperand { literal, reason } => (
                ErrorCode::UnparsableOperand,
                Some(json!({"literal": literal, "reason": reason})),
            ),
            HarnessError::UnknownOperator { op } => (
                ErrorCode::UnknownOperator,
                Some(json!({"provided": op, "valid_values": OPERATOR_NAMES})),
            ),
            HarnessError::ArityMismatch {
                op,
                expected,
                found,
            } => (
                ErrorCode::ArityMismatch,
                Some(json!({"operator": op, "expected": expected, "found": found})),
            ),
            HarnessError::NoInputs => (ErrorCode::NoInputs, None),
            HarnessError::Config(_) => (ErrorCode::ConfigError, None),
            HarnessError::Yaml(_) => (ErrorCode::ConfigParseError, None),
            HarnessError::Json(_) | HarnessError::Other(_) => (ErrorCode::InternalError, None),
            HarnessError::WithContext { source, .. } => Self::extract_code_and_context(source),
        }
    }

    /// Generate context-aware hint from error.
    fn generate_hint(err: &HarnessError) -> Option<String> {
        match err.root() {
            HarnessError::UnknownOperator { op } => {
                let similar = find_similar_names(op, OPERATOR_NAMES, 1);
                similar
                    .first()
                    .map(|name| format!("Did you mean '{name}'?"))
                    .or_else(|| err.suggestion().map(str::to_string))
            }
            HarnessError::InvalidRounding { mode } => {
                let similar = find_similar_names(mode, ROUNDING_TOKENS, 1);
                similar
                    .first()
                    .map(|name| format!("Did you mean 'rounding: {name}'?"))
                    .or_else(|| err.suggestion().map(str::to_string))
            }
            _ => err.suggestion().map(str::to_string),
        }
    }
}

/// Calculate the Levenshtein distance between two strings.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut matrix = vec![vec![0; b_len + 1]; a_len + 1];

    for (i, row) in matrix.iter_mut().enumerate().take(a_len + 1) {
        row[0] = i;
    }
    for (j, item) in matrix[0].iter_mut().enumerate().take(b_len + 1) {
        *item = j;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    for (i, a_char) in a_chars.iter().enumerate() {
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            matrix[i + 1][j + 1] = std::cmp::min(
                std::cmp::min(matrix[i][j + 1] + 1, matrix[i + 1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }

    matrix[a_len][b_len]
}

/// Find names close to `searched` using Levenshtein distance.
///
/// Returns up to `max_suggestions` names with distance <= 3.
#[must_use]
pub fn find_similar_names(
    searched: &str,
    candidates: &[&str],
    max_suggestions: usize,
) -> Vec<String> {
    let mut scored: Vec<(usize, &str)> = candidates
        .iter()
        .map(|name| (levenshtein_distance(searched, name), *name))
        .filter(|(dist, _)| *dist <= 3)
        .collect();

    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(_, name)| name.to_string())
        .collect()
}
