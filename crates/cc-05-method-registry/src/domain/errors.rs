//! # Domain Errors

use shared_types::ContractError;
use thiserror::Error;

/// Registry and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Unknown, disabled or globally switched-off method.
    #[error("method not found")]
    MethodNotFound(String),

    /// Two methods registered under one name.
    #[error("duplicate method: {0}")]
    DuplicateMethod(String),

    /// Argument vector length differs from the declared parameters.
    #[error("incorrect number of arguments: got {got}, expected {expected}")]
    ArgCount {
        /// Arguments supplied.
        got: usize,
        /// Parameters declared.
        expected: usize,
    },

    /// A decoder rejected an argument.
    #[error("invalid argument value: {0}")]
    InvalidArgument(String),
}

impl From<RegistryError> for ContractError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::InvalidArgument(inner) => ContractError::InvalidArgument(inner),
            other => ContractError::Invocation(other.to_string()),
        }
    }
}
