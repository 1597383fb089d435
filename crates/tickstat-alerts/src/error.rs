use thiserror::Error;

/// Failure while building or evaluating an alert condition.
///
/// Evaluation failures are isolated per alert by the engine: they are logged
/// and the alert is treated as not triggered.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredicateError {
    #[error("latest '{column}' value is undefined")]
    UndefinedValue { column: &'static str },

    #[error("unknown alert kind '{kind}'")]
    UnknownKind { kind: String },

    #[error("alert parameter must be finite, got {value}")]
    NonFiniteParameter { value: f64 },
}
