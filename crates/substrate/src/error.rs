//! Substrate error types
//!
//! Substrates report failures in the shape a message broker would: API
//! errors carry a numeric code, transport failures carry a description.
//! The engine layer translates these into the closed error taxonomy.

use thiserror::Error;

/// Result type alias for substrate operations
pub type Result<T> = std::result::Result<T, SubstrateError>;

/// Broker API error codes understood by the engine layer
pub mod api_codes {
    /// Malformed request
    pub const BAD_REQUEST: u16 = 10003;
    /// No message matches the query
    pub const NO_MESSAGE_FOUND: u16 = 10037;
    /// Stream name already in use with a different configuration
    pub const STREAM_NAME_IN_USE: u16 = 10058;
    /// Stream does not exist
    pub const STREAM_NOT_FOUND: u16 = 10059;
    /// Conditional write failed on the last sequence check
    pub const WRONG_LAST_SEQUENCE: u16 = 10071;
}

/// Failures reported by a log or KV substrate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstrateError {
    /// Error returned by the broker API with a numeric code
    #[error("api error {code}: {description}")]
    Api { code: u16, description: String },

    /// Connection to the substrate refused
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// Payload or configuration larger than the substrate accepts
    #[error("maximum payload exceeded: {size} > {max}")]
    MaxPayload { size: usize, max: usize },

    /// Request rejected before reaching the API
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Substrate did not answer in time
    #[error("timed out: {0}")]
    Timeout(String),

    /// Nobody is listening on the request subject
    #[error("no responders available")]
    NoResponders,

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl SubstrateError {
    /// API error with a code and description
    pub fn api(code: u16, description: impl Into<String>) -> Self {
        SubstrateError::Api {
            code,
            description: description.into(),
        }
    }

    /// API error code, when this is an API error
    pub fn api_code(&self) -> Option<u16> {
        match self {
            SubstrateError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
