//! # Multi-Curve Verification
//!
//! Maps an ACL-advertised key type to its digest and curve.

use std::fmt;
use std::sync::Arc;

use crate::ecdsa::{Secp256k1PublicKey, Secp256k1Signature};
use crate::gost::GostVerifier;
use crate::hashing::{keccak256, sha3_256, streebog256, Hash};
use crate::signatures::{Ed25519PublicKey, Ed25519Signature};
use crate::CryptoError;

/// Signer key algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Ed25519 over SHA3-256.
    Ed25519,
    /// secp256k1 ECDSA over Keccak-256.
    Secp256k1,
    /// GOST R 34.10-2012 over Streebog-256.
    Gost,
}

impl KeyType {
    /// Decode the ACL enumeration value.
    pub fn from_i32(value: i32) -> Result<Self, CryptoError> {
        match value {
            0 => Ok(Self::Ed25519),
            1 => Ok(Self::Secp256k1),
            2 => Ok(Self::Gost),
            other => Err(CryptoError::UnknownKeyType(other)),
        }
    }

    /// Digest the signed message for this key type.
    pub fn digest(&self, message: &[u8]) -> Hash {
        match self {
            Self::Ed25519 => sha3_256(message),
            Self::Secp256k1 => keccak256(message),
            Self::Gost => streebog256(message),
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::Gost => "gost",
        };
        f.write_str(name)
    }
}

/// Verifies signatures of every supported key type.
#[derive(Clone, Default)]
pub struct SignatureVerifier {
    gost: Option<Arc<dyn GostVerifier>>,
}

impl SignatureVerifier {
    /// Verifier without GOST support.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a GOST verifier.
    pub fn with_gost(mut self, gost: Arc<dyn GostVerifier>) -> Self {
        self.gost = Some(gost);
        self
    }

    /// Verify `signature` by `public_key` over `message`.
    pub fn verify(
        &self,
        key_type: KeyType,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), CryptoError> {
        let digest = key_type.digest(message);
        match key_type {
            KeyType::Ed25519 => {
                let pk = Ed25519PublicKey::from_slice(public_key)?;
                let sig = Ed25519Signature::from_slice(signature)?;
                pk.verify(&digest, &sig)
            }
            KeyType::Secp256k1 => {
                let pk = Secp256k1PublicKey::from_sec1_bytes(public_key)?;
                let sig = Secp256k1Signature::from_slice(signature)?;
                pk.verify_prehash(&digest, &sig)
            }
            KeyType::Gost => match &self.gost {
                Some(gost) => gost.verify(public_key, &digest, signature),
                None => Err(CryptoError::UnsupportedKeyType("gost")),
            },
        }
    }
}

impl fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("gost", &self.gost.is_some())
            .finish()
    }
}
