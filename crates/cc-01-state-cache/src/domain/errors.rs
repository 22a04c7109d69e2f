use shared_types::{ContractError, StubError};
use thiserror::Error;

/// Balance store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("insufficient locked balance")]
    InsufficientLockedBalance,

    #[error("lock already exists")]
    LockAlreadyExists,

    #[error("lock not found")]
    LockNotFound,

    #[error("{0} balance cannot be locked")]
    NotLockable(&'static str),

    #[error("index for {0} balance already exists")]
    IndexAlreadyExists(&'static str),

    #[error("index for {0} balance not created")]
    IndexNotCreated(&'static str),

    #[error("corrupted balance record {key:?}: {reason}")]
    Corrupted { key: String, reason: String },

    #[error(transparent)]
    Stub(#[from] StubError),
}

impl From<BalanceError> for ContractError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::Stub(e) => ContractError::Stub(e),
            BalanceError::Corrupted { .. } => ContractError::Loading(err.to_string()),
            other => ContractError::Business(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_messages() {
        let err: ContractError = BalanceError::InsufficientBalance.into();
        assert_eq!(err.to_string(), "insufficient balance");
        let err: ContractError = BalanceError::LockAlreadyExists.into();
        assert_eq!(err.to_string(), "lock already exists");
    }
}
