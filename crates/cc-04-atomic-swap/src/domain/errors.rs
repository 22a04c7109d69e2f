//! # Domain Errors
//!
//! Error types for hashlocked swaps. `Display` strings are the user-visible
//! error messages.

use cc_01_state_cache::BalanceError;
use shared_types::{ContractError, StubError};
use thiserror::Error;

/// Swap error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SwapError {
    /// Channels or token do not form a valid swap.
    #[error("incorrect swap")]
    IncorrectSwap,

    /// A swap with this id is already stored.
    #[error("swap already exists")]
    AlreadyExists,

    /// No swap under this id.
    #[error("swap doesn't exist")]
    NotFound,

    /// Revealed key does not hash to the stored hash.
    #[error("incorrect key")]
    IncorrectKey,

    /// Hash is not 32 bytes.
    #[error("invalid hash length: expected 32, got {0}")]
    InvalidHash(usize),

    /// Cancel guard rejected the caller or the time.
    #[error("swap cancel not allowed: {0}")]
    CancelNotAllowed(String),

    /// Stored or supplied record is malformed.
    #[error("invalid swap record: {0}")]
    Decode(String),

    /// Balance move failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Host failure.
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl From<SwapError> for ContractError {
    fn from(err: SwapError) -> Self {
        match err {
            SwapError::Balance(e) => e.into(),
            SwapError::Stub(e) => ContractError::Stub(e),
            SwapError::InvalidHash(_) => ContractError::InvalidArgument(err.to_string()),
            SwapError::CancelNotAllowed(_) => ContractError::Unauthorized(err.to_string()),
            SwapError::NotFound | SwapError::Decode(_) => ContractError::Loading(err.to_string()),
            other => ContractError::Business(other.to_string()),
        }
    }
}
