use thiserror::Error;

use crate::extract::FileKind;

/// Unified error type for doc-translator-core
///
/// This enum encompasses all error cases that can occur in the library:
/// - Text extraction (unsupported formats, unreadable documents, missing OCR)
/// - Input validation (nothing to translate)
/// - Translation operations (API requests, responses, rate limiting)
/// - Configuration operations (loading, validation)
/// - General I/O operations
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Extraction Errors
    // ==========================================================================
    /// File extension is not one of the supported document kinds
    #[error("Unsupported file format{}. Please upload PDF, DOCX, TXT, or image files.", quoted_extension(.0))]
    UnsupportedFormat(String),

    /// The extraction backend failed to read the document
    #[error("failed to extract text from {kind}: {reason}")]
    Extraction { kind: FileKind, reason: String },

    /// Text extraction for this document needs OCR, which this build lacks
    #[error("OCR is required to extract text from {kind}, but this build has no OCR support")]
    OcrUnavailable { kind: FileKind },

    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// Input text is empty or whitespace-only
    #[error("no text to translate: the input is empty")]
    EmptyInput,

    // ==========================================================================
    // Translation Errors
    // ==========================================================================
    /// Translation API request failed
    #[error("translation API request failed: {0}")]
    TranslationRequest(String),

    /// Invalid response from translation API
    #[error("invalid translation API response: {0}")]
    TranslationInvalidResponse(String),

    /// Rate limited by translation API
    #[error("translation rate limited{}", retry_after.map(|s| format!(", retry after {s} seconds")).unwrap_or_default())]
    TranslationRateLimited { retry_after: Option<u64> },

    /// Translation request timed out
    #[error("translation request timed out")]
    TranslationTimeout,

    /// Maximum retry attempts exceeded for translation
    #[error("translation failed after maximum retries")]
    TranslationMaxRetriesExceeded,

    /// A segment of a chunked translation failed; the whole run is aborted
    #[error("translation of segment {} of {total} failed: {source}", index + 1)]
    SegmentTranslation {
        index: usize,
        total: usize,
        #[source]
        source: Box<Error>,
    },

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] for callers that render errors
/// rather than inspect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Extraction,
    TranslationService,
    EmptyInput,
    Config,
    Io,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) | Self::Extraction { .. } | Self::OcrUnavailable { .. } => {
                ErrorKind::Extraction
            }
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::TranslationRequest(_)
            | Self::TranslationInvalidResponse(_)
            | Self::TranslationRateLimited { .. }
            | Self::TranslationTimeout
            | Self::TranslationMaxRetriesExceeded
            | Self::SegmentTranslation { .. } => ErrorKind::TranslationService,
            Self::ConfigLoad(_) | Self::ConfigInvalid { .. } => ErrorKind::Config,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether a failed request is worth repeating.
    ///
    /// Malformed responses and rate limits are retried along with
    /// transport failures; extraction and config errors never are.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TranslationRequest(_)
                | Self::TranslationInvalidResponse(_)
                | Self::TranslationRateLimited { .. }
                | Self::TranslationTimeout
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

fn quoted_extension(ext: &str) -> String {
    if ext.is_empty() {
        String::new()
    } else {
        format!(" '{ext}'")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_error_is_translation_service() {
        let err = Error::SegmentTranslation {
            index: 1,
            total: 3,
            source: Box::new(Error::TranslationTimeout),
        };
        assert_eq!(err.kind(), ErrorKind::TranslationService);
        assert_eq!(
            err.to_string(),
            "translation of segment 2 of 3 failed: translation request timed out"
        );
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = Error::UnsupportedFormat(".xlsx".to_string());
        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(err.to_string().starts_with("Unsupported file format '.xlsx'."));
        assert!(err.to_string().contains("PDF, DOCX, TXT, or image files"));
    }

    #[test]
    fn test_rate_limited_message() {
        let err = Error::TranslationRateLimited { retry_after: Some(5) };
        assert_eq!(err.to_string(), "translation rate limited, retry after 5 seconds");
        let err = Error::TranslationRateLimited { retry_after: None };
        assert_eq!(err.to_string(), "translation rate limited");
    }

    #[test]
    fn test_retryable() {
        assert!(Error::TranslationTimeout.is_retryable());
        assert!(!Error::EmptyInput.is_retryable());
        assert!(!Error::TranslationMaxRetriesExceeded.is_retryable());
    }
}
