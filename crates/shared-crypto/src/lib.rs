//! # Shared Crypto - Signature Verification
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA3-256, Keccak-256, Streebog-256, SHA-256 | Message digests |
//! | `signatures` | Ed25519 | Signer verification |
//! | `ecdsa` | secp256k1 | Signer verification (Keccak prehash) |
//! | `gost` | GOST R 34.10-2012 | Host-supplied verification hook |
//! | `verifier` | all of the above | Dispatch by ACL key type |
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency
//! - **secp256k1**: RFC 6979 deterministic, low-S normalization before verify

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ecdsa;
pub mod errors;
pub mod gost;
pub mod hashing;
pub mod signatures;
pub mod verifier;

// Re-exports
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};
pub use errors::CryptoError;
pub use gost::GostVerifier;
pub use hashing::{keccak256, sha256, sha3_256, streebog256, Hash};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};
pub use verifier::{KeyType, SignatureVerifier};
