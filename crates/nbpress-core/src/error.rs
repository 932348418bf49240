//! Error types for nbpress.

use thiserror::Error;

/// Top-level result type for nbpress operations.
pub type Result<T> = std::result::Result<T, NbpressError>;

/// Top-level error type for nbpress.
#[derive(Debug, Error)]
pub enum NbpressError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// The note is intentionally unpublished. Expected and frequent:
    /// batch callers skip these instead of treating them as failures.
    #[error("note is marked as draft")]
    Draft,

    #[error("converter exited with {status}: {stderr}")]
    Conversion { status: String, stderr: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl NbpressError {
    /// Whether this error is the draft gate rather than a real failure.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

/// Errors for a malformed notebook or missing required metadata.
/// Fatal to that file's export.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("'{path}' does not have an .ipynb extension")]
    Extension { path: String },

    #[error("not a valid notebook document: {0}")]
    InvalidNotebook(String),

    #[error("first cell is missing or not a raw cell")]
    FirstCellNotRaw,

    #[error("front-matter is not fenced by '---' lines")]
    MissingDelimiter,

    #[error("raw cell continues after the closing '---' fence")]
    TrailingContent,

    #[error("missing required front-matter field '{field}'")]
    MissingField { field: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_human_readable_messages() {
        let err = FormatError::MissingField {
            field: "author".to_string(),
        };
        assert!(err.to_string().contains("author"));

        let err = NbpressError::Conversion {
            status: "exit status: 1".to_string(),
            stderr: "no such kernel".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit status: 1"));
        assert!(msg.contains("no such kernel"));
    }

    #[test]
    fn draft_is_distinguishable_from_format_failures() {
        assert!(NbpressError::Draft.is_draft());
        assert!(!NbpressError::Format(FormatError::FirstCellNotRaw).is_draft());
    }
}
