//! Error types for ferro-proteoform
//!
//! This module provides error handling with:
//! - Error codes for categorization
//! - Source span tracking for descriptor parse errors
//! - Diagnostic messages with a caret line under the offending text

use std::fmt;
use thiserror::Error;

/// Numeric codes attached to errors, grouped by the stage that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Descriptor parsing (E1xxx)
    /// Input ended inside a change entry
    UnexpectedEnd = 1005,
    /// A character that cannot continue a change entry
    UnexpectedChar = 1006,

    // Sequences and coordinates (E3xxx)
    /// Coordinates outside a sequence or layout
    InvalidRange = 3003,
    /// cDNA and protein change lists differ in length
    ChangeCountMismatch = 3006,
    /// Sequence contains unsupported characters
    InvalidSequence = 3007,

    // Graph hydration (E6xxx)
    /// Node is missing a required property or has a malformed one
    InvalidNode = 6001,
    /// Relationship is missing a required property
    InvalidRelationship = 6002,
    /// Query record has no usable root node
    MissingRoot = 6003,

    // Input (E9xxx)
    IoError = 9001,
    JsonError = 9002,
}

impl ErrorCode {
    /// Code as printed, e.g. `E6001`.
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedEnd => "change entry ends early",
            ErrorCode::UnexpectedChar => "unexpected character in change entry",
            ErrorCode::InvalidRange => "coordinates out of range",
            ErrorCode::ChangeCountMismatch => "cDNA and protein change counts differ",
            ErrorCode::InvalidSequence => "unsupported sequence characters",
            ErrorCode::InvalidNode => "invalid graph node",
            ErrorCode::InvalidRelationship => "invalid graph relationship",
            ErrorCode::MissingRoot => "missing root node",
            ErrorCode::IoError => "file I/O error",
            ErrorCode::JsonError => "JSON parsing error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

/// Byte range `[start, end)` of a descriptor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering the single byte at `pos`.
    pub fn point(pos: usize) -> Self {
        Self::new(pos, pos + 1)
    }

    /// `source` followed by a line marking the span:
    ///
    /// ```text
    /// 12:A>G;x4:C>T
    ///        ^
    /// ```
    pub fn underline(&self, source: &str) -> String {
        if source.is_empty() {
            return String::new();
        }
        let start = self.start.min(source.len());
        let width = self.end.min(source.len()).saturating_sub(start).max(1);
        format!("{}\n{}^{}", source, " ".repeat(start), "~".repeat(width - 1))
    }
}

/// Location and context of a descriptor parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: SourceSpan,
    /// The whole list that was being parsed
    pub source: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Failure with `code` at byte `pos` of `source`.
    pub fn at(code: ErrorCode, pos: usize, source: impl Into<String>) -> Self {
        Self {
            code,
            span: SourceSpan::point(pos),
            source: source.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// `message` prefixed with the code, followed by the underlined source
    /// and the hint.
    pub fn render(&self, message: &str) -> String {
        let mut out = format!("[{}] {}", self.code, message);
        let underlined = self.span.underline(&self.source);
        if !underlined.is_empty() {
            out.push_str("\n\n");
            out.push_str(&underlined);
        }
        if let Some(hint) = &self.hint {
            out.push_str("\n\nHint: ");
            out.push_str(hint);
        }
        out
    }
}

/// Main error type for ferro-proteoform operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FerroError {
    /// Parse error with position and message
    #[error("Parse error at position {pos}: {msg}")]
    Parse {
        pos: usize,
        msg: String,
        /// Optional diagnostic with additional context
        diagnostic: Option<Box<Diagnostic>>,
    },

    /// A graph node could not be turned into an entity
    #[error("Invalid {kind} node '{id}': {msg}")]
    InvalidNode {
        kind: &'static str,
        id: String,
        msg: String,
    },

    /// A relationship is missing or has malformed properties
    #[error("Invalid {label} relationship: {msg}")]
    InvalidRelationship { label: String, msg: String },

    /// The query record has no usable root node
    #[error("Missing root node: {msg}")]
    MissingRoot { msg: String },

    /// Invalid coordinates provided
    #[error("Invalid coordinates: {msg}")]
    InvalidCoordinates { msg: String },

    /// cDNA and protein change descriptors are not parallel
    #[error("Change count mismatch: {cdna} cDNA changes, {protein} protein changes")]
    ChangeCountMismatch { cdna: usize, protein: usize },

    /// Sequence input cannot be aligned
    #[error("Invalid sequence: {msg}")]
    InvalidSequence { msg: String },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl FerroError {
    /// Parse error at `pos` carrying a [`Diagnostic`].
    pub fn parse_with_diagnostic(
        pos: usize,
        msg: impl Into<String>,
        diagnostic: Diagnostic,
    ) -> Self {
        FerroError::Parse {
            pos,
            msg: msg.into(),
            diagnostic: Some(Box::new(diagnostic)),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            FerroError::Parse { diagnostic, .. } => diagnostic.as_ref().map(|d| d.code),
            FerroError::InvalidNode { .. } => Some(ErrorCode::InvalidNode),
            FerroError::InvalidRelationship { .. } => Some(ErrorCode::InvalidRelationship),
            FerroError::MissingRoot { .. } => Some(ErrorCode::MissingRoot),
            FerroError::InvalidCoordinates { .. } => Some(ErrorCode::InvalidRange),
            FerroError::ChangeCountMismatch { .. } => Some(ErrorCode::ChangeCountMismatch),
            FerroError::InvalidSequence { .. } => Some(ErrorCode::InvalidSequence),
            FerroError::Io { .. } => Some(ErrorCode::IoError),
            FerroError::Json { .. } => Some(ErrorCode::JsonError),
        }
    }

    /// Display message, expanded with the diagnostic of parse errors.
    pub fn detailed_message(&self) -> String {
        match self {
            FerroError::Parse {
                diagnostic: Some(d),
                ..
            } => d.render(&self.to_string()),
            _ => self.to_string(),
        }
    }
}

impl From<std::io::Error> for FerroError {
    fn from(err: std::io::Error) -> Self {
        FerroError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FerroError {
    fn from(err: serde_json::Error) -> Self {
        FerroError::Json {
            msg: err.to_string(),
        }
    }
}
