//! # Domain Errors
//!
//! Error types for cross-channel transfers. `Display` strings are the
//! user-visible error messages.

use cc_01_state_cache::BalanceError;
use shared_types::{ContractError, StubError};
use thiserror::Error;

/// Cross-channel transfer error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossChannelError {
    /// Transfer id already used on this side.
    #[error("transfer already exists")]
    AlreadyExists,

    /// No record under this id.
    #[error("transfer not found")]
    NotFound,

    /// Cancel or second commit after commit.
    #[error("transfer already commit")]
    AlreadyCommit,

    /// Delete before commit.
    #[error("transfer not commit")]
    NotCommit,

    /// Bookmark outside the transfer namespace.
    #[error("incorrect bookmark")]
    IncorrectBookmark,

    /// Target equals source, or record addressed to another channel.
    #[error("invalid channel: {0}")]
    InvalidChannel(String),

    /// Token belongs to neither channel.
    #[error("incorrect token: {token} is not native to {from} or {to}")]
    IncorrectToken {
        /// Offending token.
        token: String,
        /// Source channel.
        from: String,
        /// Target channel.
        to: String,
    },

    /// Direction flag disagrees with the token.
    #[error("incorrect direction")]
    IncorrectDirection,

    /// Items of a multi-asset transfer belong to different channels.
    #[error("tokens of a multi transfer must share one channel")]
    MixedTokens,

    /// Empty or oversized item list.
    #[error("invalid item count: {count}, allowed 1..={max}")]
    InvalidItemCount {
        /// Items supplied.
        count: usize,
        /// Configured maximum.
        max: usize,
    },

    /// Zero or malformed amount.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Admin-only path called by someone else.
    #[error("unauthorized")]
    Unauthorized,

    /// Input record could not be decoded.
    #[error("invalid transfer record: {0}")]
    Decode(String),

    /// Balance move failed.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Host failure.
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl From<CrossChannelError> for ContractError {
    fn from(err: CrossChannelError) -> Self {
        match err {
            CrossChannelError::Balance(e) => e.into(),
            CrossChannelError::Stub(e) => ContractError::Stub(e),
            CrossChannelError::Decode(_) | CrossChannelError::InvalidAmount(_) => {
                ContractError::InvalidArgument(err.to_string())
            }
            CrossChannelError::Unauthorized => ContractError::Unauthorized(err.to_string()),
            CrossChannelError::NotFound => ContractError::Loading(err.to_string()),
            other => ContractError::Business(other.to_string()),
        }
    }
}
