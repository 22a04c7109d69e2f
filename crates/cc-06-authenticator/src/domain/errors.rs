//! # Authentication Errors

use cc_02_nonce::NonceError;
use shared_crypto::CryptoError;
use shared_types::{ContractError, StubError};
use thiserror::Error;

/// Reasons a signed invocation is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Too few positional arguments for the method arity.
    #[error("incorrect number of arguments: got {got}, expected at least {expected}")]
    ArgCount { got: usize, expected: usize },

    /// Tail after the nonce does not split into key/signature pairs.
    #[error("incorrect number of keys or signatures")]
    KeySignatureMismatch,

    #[error("incorrect chaincode: expected {expected}, got {got}")]
    WrongChaincode { expected: String, got: String },

    #[error("incorrect channel: expected {expected}, got {got}")]
    WrongChannel { expected: String, got: String },

    /// ACL does not know the key set.
    #[error("unknown signer: {0}")]
    UnknownSigner(String),

    #[error("address {0} is blacklisted")]
    Blacklisted(String),

    #[error("address {0} is graylisted")]
    Graylisted(String),

    /// ACL advertised a key type this build cannot verify.
    #[error("unsupported key type for key {key}: {reason}")]
    KeyType { key: String, reason: String },

    /// Key or signature is not valid base58.
    #[error("invalid encoding of {0}")]
    Encoding(String),

    #[error("invalid signature for key {0}")]
    InvalidSignature(String),

    #[error("insufficient signatures: got {got}, need {need}")]
    Insufficient { got: usize, need: usize },

    /// ACL answered with something that is not an ACL response.
    #[error("acl response: {0}")]
    Acl(String),

    #[error(transparent)]
    Nonce(#[from] NonceError),

    #[error(transparent)]
    Stub(#[from] StubError),
}

impl AuthError {
    pub(crate) fn key_type(key: &str, err: CryptoError) -> Self {
        Self::KeyType {
            key: key.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<AuthError> for ContractError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ArgCount { .. }
            | AuthError::KeySignatureMismatch
            | AuthError::WrongChaincode { .. }
            | AuthError::WrongChannel { .. } => ContractError::Invocation(err.to_string()),
            AuthError::Nonce(e) => e.into(),
            AuthError::Stub(e) => ContractError::Stub(e),
            other => ContractError::Unauthorized(other.to_string()),
        }
    }
}
