use thiserror::Error;
use tickstat_core::ValidationError;

/// Errors surfaced by analytics operations.
///
/// "Not enough history" is never an error here; it is carried as `None`
/// values or typed results such as `AdfResult::InsufficientData`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("series '{y}' and '{x}' share no common timestamps")]
    Alignment { y: String, x: String },

    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AnalyticsError {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}
