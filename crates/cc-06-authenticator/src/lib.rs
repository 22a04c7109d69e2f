//! # cc-06-authenticator
//!
//! Verifies the signing envelope carried by every authenticated invocation.
//!
//! ## Flow
//!
//! ```text
//! raw args ──► split layout ──► chaincode / channel / nonce format
//!                                   │
//!                                   ▼
//!                     ACL checkKeys(pk_1/../pk_K)
//!                                   │  address, policy n, key types, flags
//!                                   ▼
//!              verify each non-blank signature over
//!              function || req_id || .. || pk_K
//!                                   │  valid >= (n > 0 ? n : K)
//!                                   ▼
//!                     nonce stored under the address
//! ```
//!
//! ## Digests
//!
//! | Key type | Digest | Curve |
//! |----------|--------|-------|
//! | Ed25519 (default) | SHA3-256 | Ed25519 |
//! | Secp256k1 | Keccak-256 | secp256k1, low-S |
//! | Gost | Streebog-256 | pluggable verifier |

pub mod acl;
pub mod domain;
pub mod service;

pub use domain::*;
pub use service::Authenticator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
