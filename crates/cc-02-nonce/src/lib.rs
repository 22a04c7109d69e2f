//! # cc-02-nonce
//!
//! Replay protection. Every authenticated call carries a 13-digit millisecond
//! nonce; each address keeps a bounded, strictly ascending history of the
//! nonces it has used.
//!
//! ## Rules
//!
//! | Case | Outcome |
//! |------|---------|
//! | empty history | accept |
//! | newer than newest | append, evict entries older than `newest - ttl` |
//! | older than `newest - ttl` | reject as stale |
//! | already present | reject as duplicate |
//! | otherwise | insert in order |

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::{decode_history, load_history, store_history, NonceService};
