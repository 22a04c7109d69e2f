use shared_types::{ContractError, StubError};
use thiserror::Error;

/// Nonce rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NonceError {
    /// Not a 13-digit millisecond timestamp.
    #[error("incorrect nonce format: {0}")]
    InvalidFormat(String),

    /// Older than the window allows.
    #[error("incorrect nonce {nonce}: stale, newest is {last}, ttl {ttl}s")]
    Stale { nonce: u64, last: u64, ttl: u64 },

    /// Already accepted.
    #[error("nonce {0} already exists")]
    Duplicate(u64),

    /// Stored history could not be decoded.
    #[error("corrupted nonce history: {0}")]
    Corrupted(String),

    #[error(transparent)]
    Stub(#[from] StubError),
}

impl From<NonceError> for ContractError {
    fn from(err: NonceError) -> Self {
        match err {
            NonceError::Stub(e) => ContractError::Stub(e),
            NonceError::Corrupted(_) => ContractError::Loading(err.to_string()),
            other => ContractError::Unauthorized(other.to_string()),
        }
    }
}
