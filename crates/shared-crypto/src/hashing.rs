//! # Message Digests
//!
//! Every signer key type hashes the signed message with its own digest before
//! verification.
//!
//! | Digest | Used by |
//! |--------|---------|
//! | SHA3-256 | Ed25519 keys, addresses, swap hashlocks |
//! | Keccak-256 | secp256k1 keys |
//! | Streebog-256 | GOST R 34.10-2012 keys |
//! | SHA-256 | creator identity fallback for the robot check |

use sha2::Sha256;
use sha3::{Digest, Keccak256, Sha3_256};
use streebog::Streebog256;

/// 256-bit digest output.
pub type Hash = [u8; 32];

/// SHA3-256 (FIPS 202).
pub fn sha3_256(data: &[u8]) -> Hash {
    Sha3_256::digest(data).into()
}

/// Keccak-256 (pre-standard SHA3 padding).
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256::digest(data).into()
}

/// Streebog-256 (GOST R 34.11-2012).
pub fn streebog256(data: &[u8]) -> Hash {
    Streebog256::digest(data).into()
}

/// SHA-256.
pub fn sha256(data: &[u8]) -> Hash {
    Sha256::digest(data).into()
}
