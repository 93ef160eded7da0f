use thiserror::Error;

/// Failures surfaced by the sampling, projection and lookup operations.
///
/// Every variant describes a caller-side problem (bad configuration, an index
/// past the image edge, a query against an empty map); none of them is fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GlobeError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Pixel ({u}, {v}) is outside the {width}x{height} image")]
    OutOfBounds {
        u: i64,
        v: i64,
        width: u32,
        height: u32,
    },

    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Hex cell lookup failed: {message}")]
    HexIndex { message: String },
}

impl GlobeError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        GlobeError::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        GlobeError::InvalidState {
            message: message.into(),
        }
    }
}

pub type GlobeResult<T> = Result<T, GlobeError>;
