//! # Error Types
//!
//! Defines error types used across subsystems.
//!
//! Every subsystem keeps its own `thiserror` enum and converts into
//! [`ContractError`] at the method boundary. The variants of `ContractError`
//! follow the error taxonomy: invocation, authentication, argument, business,
//! loading and host failures.

use thiserror::Error;

/// Errors parsing or building an [`crate::Address`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Empty external form.
    #[error("address is empty")]
    Empty,

    /// Wrong byte length.
    #[error("invalid address length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Base58 or checksum failure.
    #[error("invalid address encoding: {0}")]
    InvalidEncoding(String),
}

/// Errors surfaced by the host ledger port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StubError {
    /// Composite key attribute or type contains a forbidden code point.
    #[error("invalid composite key part: {0:?}")]
    InvalidCompositeKey(String),

    /// Host call failed.
    #[error("host error: {0}")]
    Host(String),

    /// The host does not provide this capability.
    #[error("unsupported host operation: {0}")]
    Unsupported(&'static str),

    /// Stored record could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Boundary error for contract methods and engine operations.
///
/// `Display` is the user-visible error string carried in responses, so
/// business variants print their message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// Wrong argument count, unknown method, wrong chaincode or channel.
    #[error("{0}")]
    Invocation(String),

    /// Signature, ACL, nonce or robot check failure.
    #[error("{0}")]
    Unauthorized(String),

    /// Argument decoding or `Check` failure.
    #[error("invalid argument value: {0}")]
    InvalidArgument(String),

    /// Domain rule violation.
    #[error("{0}")]
    Business(String),

    /// Missing or malformed stored record.
    #[error("{0}")]
    Loading(String),

    /// Host ledger failure.
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl ContractError {
    /// Shorthand for a business error.
    pub fn business(msg: impl Into<String>) -> Self {
        Self::Business(msg.into())
    }

    /// Response code for this error kind.
    pub fn code(&self) -> i32 {
        match self {
            Self::Invocation(_) | Self::InvalidArgument(_) => 400,
            Self::Unauthorized(_) => 403,
            Self::Loading(_) => 404,
            Self::Business(_) | Self::Stub(_) => 500,
        }
    }
}

impl From<AddressError> for ContractError {
    fn from(err: AddressError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

impl From<prost::DecodeError> for ContractError {
    fn from(err: prost::DecodeError) -> Self {
        Self::Loading(err.to_string())
    }
}
