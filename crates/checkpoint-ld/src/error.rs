//! Error type for checkpoint conversion and validation.

use thiserror::Error;

/// Broad outcome class of a [`ConversionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Export or import could not produce a result.
    Conversion,
    /// An external document failed structural validation.
    Validation,
}

impl ErrorKind {
    /// Returns a short label (e.g., "conversion").
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Conversion => "conversion",
            ErrorKind::Validation => "validation",
        }
    }
}

/// The single error surfaced by every converter operation.
///
/// Lower-level failures (JSON parsing) are wrapped and remain reachable
/// through [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("missing required field `{field}` in {context}")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("unsupported checkpoint version {found:?} (expected \"2.0\")")]
    UnsupportedVersion { found: String },

    #[error("trait {trait_name:?} has invalid score range: min_score={min}, max_score={max}")]
    InvalidScoreRange {
        trait_name: String,
        min: f64,
        max: f64,
    },

    #[error("invalid rating {rating:?}: {reason}")]
    InvalidRating { rating: String, reason: String },

    #[error("rating {rating:?} tagged {additional_type:?} cannot appear at {location}")]
    ScopeMismatch {
        rating: String,
        additional_type: String,
        location: &'static str,
    },

    #[error("duplicate question id {id:?} in feed")]
    DuplicateQuestionId { id: String },

    #[error("{}", violations.join("\n"))]
    Validation { violations: Vec<String> },

    #[error("unrecognized checkpoint format")]
    UnrecognizedFormat,

    #[error("JSON error in {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ConversionError {
    /// Returns whether this is a conversion or a validation failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConversionError::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::Conversion,
        }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        ConversionError::Json { context, source }
    }

    pub(crate) fn invalid_rating(rating: impl Into<String>, reason: impl Into<String>) -> Self {
        ConversionError::InvalidRating {
            rating: rating.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConversionError>;

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_validation_message_joins_all_violations() {
        let err = ConversionError::Validation {
            violations: vec!["first".to_string(), "second".to_string()],
        };
        assert_eq!(err.to_string(), "first\nsecond");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_score_range_names_trait_and_bounds() {
        let err = ConversionError::InvalidScoreRange {
            trait_name: "clarity".to_string(),
            min: 5.0,
            max: 1.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("clarity"));
        assert!(msg.contains("min_score=5"));
        assert!(msg.contains("max_score=1"));
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_json_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ConversionError::json("document", source);
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("JSON error in document"));
    }
}
