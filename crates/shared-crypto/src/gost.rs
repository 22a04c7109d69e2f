//! # GOST R 34.10-2012 Hook
//!
//! No audited Rust implementation of GOST R 34.10-2012 verification is
//! available, so hosts that accept GOST signers install their own verifier.
//! The core only computes the Streebog-256 digest and hands it over.

use crate::hashing::Hash;
use crate::CryptoError;

/// Verifies a GOST R 34.10-2012 (256-bit) signature over a Streebog-256 digest.
pub trait GostVerifier: Send + Sync {
    /// `Ok(())` when `signature` is valid for `public_key` over `digest`.
    fn verify(&self, public_key: &[u8], digest: &Hash, signature: &[u8])
        -> Result<(), CryptoError>;
}
