//! Error types and handling for `dectest`.
//!
//! Only *fatal* conditions are errors: an unreadable source, a malformed
//! directive, an unparsable operand. A computed value that disagrees with
//! the oracle is a test outcome, never an error.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Supports `anyhow` integration for setup code
//! - Provides recovery hints for user-facing errors
//! - Groups exit codes by category (see [`ErrorCode::exit_code`])

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `dectest` operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    // === Input Errors ===
    /// A test-vector source could not be opened.
    #[error("Cannot read test file '{path}': {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File system I/O error while reading lines.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Script Errors ===
    /// `precision:` directive whose value is not a non-negative integer.
    #[error("Invalid precision: '{value}'")]
    InvalidPrecision { value: String },

    /// `rounding:` directive naming a mode outside the dialect vocabulary.
    #[error("Invalid rounding mode: '{mode}'")]
    InvalidRounding { mode: String },

    /// Test line that does not follow the dialect grammar.
    #[error("Invalid test line '{line}': {reason}")]
    MalformedTest { line: String, reason: String },

    /// Operand or expected value the engine cannot parse.
    #[error("Cannot parse operand '{literal}': {reason}")]
    UnparsableOperand { literal: String, reason: String },

    /// Operator missing from the dispatch table under a strict dialect.
    #[error("Unknown operator: '{op}'")]
    UnknownOperator { op: String },

    /// Operator used with the wrong number of operands.
    #[error("Operator '{op}' takes {expected} operand(s), found {found}")]
    ArityMismatch {
        op: String,
        expected: usize,
        found: usize,
    },

    // === Configuration Errors ===
    /// No test file was named.
    #[error("No test files given")]
    NoInputs,

    /// Configuration value error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML config parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON report serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Wrapped errors ===
    /// Error with additional context (usually a `path:line` location).
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Self>,
    },

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarnessError {
    /// Attach a location or other context to this error.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any context wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Does this error come from the test-vector file itself?
    #[must_use]
    pub fn is_script_error(&self) -> bool {
        matches!(
            self.root(),
            Self::InvalidPrecision { .. }
                | Self::InvalidRounding { .. }
                | Self::MalformedTest { .. }
                | Self::UnparsableOperand { .. }
                | Self::UnknownOperator { .. }
                | Self::ArityMismatch { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.root() {
            Self::NoInputs => Some("Pass a file with -f FILE or as positional arguments"),
            Self::InvalidRounding { .. } => Some(
                "Valid modes: half_even, half_up, down, zero, half_down, floor, ceiling, up",
            ),
            Self::MalformedTest { .. } | Self::ArityMismatch { .. } => {
                Some("Check that --dialect matches the layout of the test file")
            }
            Self::UnknownOperator { .. } => {
                Some("Use --dialect variable to skip operators the harness does not know")
            }
            Self::InvalidPrecision { .. } => Some("Precision must be a non-negative integer"),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        StructuredError::from_error(self).code.exit_code()
    }

    /// Create a malformed-test error.
    #[must_use]
    pub fn malformed(line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTest {
            line: line.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `HarnessError`.
pub type Result<T> = std::result::Result<T, HarnessError>;
