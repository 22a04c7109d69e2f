//! # Batch Errors
//!
//! Per-transaction failures end up in the batch response; only [`BatchError::Decode`]
//! and [`BatchError::Stub`] abort a whole batch.

use shared_types::{ContractError, StubError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// No preimage stored for the tx id.
    #[error("function and args loading error: transaction {0} not found")]
    PreimageNotFound(String),

    #[error("function and args loading error: {0}")]
    MalformedPreimage(String),

    /// Preimage older than the configured tx TTL.
    #[error("function and args loading error: transaction {0} expired")]
    Expired(String),

    /// Preimage nonce is missing from the sender's history.
    #[error("function and args loading error: nonce {0} was not accepted")]
    NonceNotAccepted(u64),

    #[error("panic batchedTxExecute")]
    Panic,

    /// Driver payload is not a batch or task request.
    #[error("incorrect batch: {0}")]
    Decode(String),

    /// Method, authentication or argument failure of one transaction.
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Stub(#[from] StubError),
}

impl BatchError {
    /// Response code carried in per-item errors.
    pub fn code(&self) -> i32 {
        match self {
            Self::PreimageNotFound(_)
            | Self::MalformedPreimage(_)
            | Self::Expired(_)
            | Self::NonceNotAccepted(_) => 404,
            Self::Decode(_) => 400,
            Self::Contract(e) => e.code(),
            Self::Panic | Self::Stub(_) => 500,
        }
    }
}

impl From<BatchError> for ContractError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::Contract(e) => e,
            BatchError::Stub(e) => ContractError::Stub(e),
            BatchError::Decode(_) => ContractError::Invocation(err.to_string()),
            BatchError::Panic => ContractError::Business(err.to_string()),
            other => ContractError::Loading(other.to_string()),
        }
    }
}
