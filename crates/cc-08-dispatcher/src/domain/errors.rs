//! # Dispatcher Errors
//!
//! Failures raised by the entry point itself. Everything a component returns
//! travels as that component's error converted into [`ContractError`].

use shared_types::ContractError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Transaction id is not hexadecimal.
    #[error("incorrect tx id: {0}")]
    InvalidTxId(String),

    /// Creator certificate carries no Subject Key Identifier.
    #[error("creator SKI is empty")]
    NoCreatorSki,

    /// A robot-only method was called by someone else.
    #[error("unauthorized")]
    RobotOnly,

    /// Fixed-arity system method called with the wrong argument count.
    #[error("{method}: incorrect number of arguments: got {got}, expected {expected}")]
    ArgCount {
        method: &'static str,
        got: usize,
        expected: usize,
    },

    /// `createIndex` with an unknown balance type.
    #[error("unknown balance type {0:?}")]
    UnknownBalanceType(String),

    /// `init` without a configuration document.
    #[error("config is empty")]
    EmptyConfig,
}

impl From<DispatchError> for ContractError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::NoCreatorSki | DispatchError::RobotOnly => {
                ContractError::Unauthorized(err.to_string())
            }
            DispatchError::UnknownBalanceType(_) => ContractError::InvalidArgument(err.to_string()),
            other => ContractError::Invocation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_only_is_unauthorized() {
        let err: ContractError = DispatchError::RobotOnly.into();
        assert_eq!(err.code(), 403);
        assert_eq!(err.to_string(), "unauthorized");
    }

    #[test]
    fn test_invocation_errors() {
        let err: ContractError = DispatchError::InvalidTxId("zz".into()).into();
        assert_eq!(err.code(), 400);
        let err: ContractError = DispatchError::ArgCount {
            method: "swapDone",
            got: 1,
            expected: 2,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "swapDone: incorrect number of arguments: got 1, expected 2"
        );
    }
}
