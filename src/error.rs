//! Error handling
//!
//! Construction errors only, and they are fatal to the caller.
//! Verification failures are expected input and surface as booleans,
//! never as errors.

use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Failures raised while building core components.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Signing key below the minimum length.
    #[error("signing key too short: {actual} bytes, minimum is {minimum}")]
    KeyTooShort { actual: usize, minimum: usize },

    /// Node id string did not parse as a UUID.
    #[error("invalid node id '{value}': {source}")]
    InvalidNodeId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// Tier name not present in the tier table.
    #[error("unknown tier '{0}'")]
    UnknownTier(String),
}
