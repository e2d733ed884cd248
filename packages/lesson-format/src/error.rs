//! Error types for lesson file processing.
//!
//! Uses the dual-error pattern: `LessonError` carries detailed context for
//! library internals, while the public operations fold every fault into an
//! [`Outcome`](crate::session::Outcome). Only argument errors escape.

use thiserror::Error;

/// Classification of a fault for outcome and recovery decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Schema mismatch. Truncates the current tab, the operation continues.
    Validation,
    /// A required root or tab element is absent or misplaced. Aborts.
    Structural,
    /// A cancellation signal was observed.
    Cancellation,
    /// Anything else (malformed XML, I/O). Aborts.
    Unclassified,
}

/// Main error type for the lesson format library.
#[derive(Debug, Error)]
pub enum LessonError {
    /// Invalid argument passed to a public operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Element does not satisfy the lesson schema.
    #[error("Schema violation at <{element}>{}: {reason}", .context.as_ref().map(|c| format!(" in <{c}>")).unwrap_or_default())]
    Validation {
        element: String,
        context: Option<String>,
        reason: String,
    },

    /// No content kind registered for a tag inside a page.
    #[error("No content kind registered for <{tag_name}>{}", .context.as_ref().map(|c| format!(" in <{c}>")).unwrap_or_default())]
    UnknownContentKind {
        tag_name: String,
        context: Option<String>,
    },

    /// Missing required XML element.
    #[error("Missing required XML element: <{element}> in {context}")]
    MissingElement { element: String, context: String },

    /// Element present where the document structure forbids it.
    #[error("Unexpected element <{element}> in {context}")]
    UnexpectedElement { element: String, context: String },

    /// Character data where the document structure forbids it.
    #[error("Unexpected text in {context}")]
    UnexpectedText { context: String },

    /// Document ended while elements were still open.
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// A cancellation signal was observed.
    #[error("Operation cancelled")]
    Cancelled,

    /// XML reading or writing failed.
    #[error("XML processing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A payload holds a character XML 1.0 cannot represent.
    #[error("Character U+{code:04X} cannot be written in <{element}>")]
    InvalidCharacter { element: String, code: u32 },

    /// Text or attribute bytes are not valid UTF-8.
    #[error("Invalid UTF-8 in {0}")]
    Encoding(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation finished without a usable result.
    #[error("{operation} did not complete: {outcome}")]
    Incomplete { operation: String, outcome: String },
}

impl LessonError {
    /// Classify this error for outcome reporting and recovery.
    #[must_use]
    pub fn fault(&self) -> Fault {
        match self {
            Self::Validation { .. } | Self::UnknownContentKind { .. } => Fault::Validation,
            Self::MissingElement { .. }
            | Self::UnexpectedElement { .. }
            | Self::UnexpectedText { .. }
            | Self::UnexpectedEof(_) => Fault::Structural,
            Self::Cancelled => Fault::Cancellation,
            Self::InvalidArgument(_)
            | Self::Xml(_)
            | Self::Encoding(_)
            | Self::InvalidCharacter { .. }
            | Self::Io(_)
            | Self::Json(_)
            | Self::Incomplete { .. } => Fault::Unclassified,
        }
    }

    /// Whether the fault only truncates the current tab.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.fault() == Fault::Validation
    }
}

impl From<quick_xml::events::attributes::AttrError> for LessonError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(err))
    }
}

/// Result type alias for lesson format operations.
pub type Result<T> = std::result::Result<T, LessonError>;
