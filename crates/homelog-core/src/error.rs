//! Validation errors for payload normalization.

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors produced while validating a device or request payload.
///
/// These never leave the process: per the drop policy, a payload that
/// fails validation is logged and discarded, not reported back over
/// the bus.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Payload was not valid JSON.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A mandatory field was absent.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field held a value outside its fixed vocabulary.
    #[error("invalid value for {field}: {value:?}")]
    InvalidEnum {
        field: &'static str,
        value: String,
    },

    /// Timestamp or date did not parse in a recognized format.
    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),
}
