//! # Domain Invariants
//!
//! Checks every swap transition runs before touching balances.

use shared_crypto::sha3_256;
use shared_types::{same_channel, Address};

use super::entities::SwapRecord;
use super::errors::SwapError;

/// Invariant: hashlocks are SHA3-256 digests.
pub fn invariant_hash_length(hash: &[u8]) -> Result<(), SwapError> {
    if hash.len() != 32 {
        return Err(SwapError::InvalidHash(hash.len()));
    }
    Ok(())
}

/// Invariant: a swap crosses two distinct channels.
pub fn invariant_distinct_channels(from: &str, to: &str) -> Result<(), SwapError> {
    if to.is_empty() || same_channel(from, to) {
        return Err(SwapError::IncorrectSwap);
    }
    Ok(())
}

/// Invariant: `SHA3-256(key) == hash`.
pub fn invariant_key_matches(key: &str, hash: &[u8]) -> Result<(), SwapError> {
    if sha3_256(key.as_bytes()).as_slice() != hash {
        return Err(SwapError::IncorrectKey);
    }
    Ok(())
}

/// Invariant: only the owner cancels, and only once the swap timed out.
/// `unsafe_cancel` lifts both conditions.
pub fn invariant_cancel_allowed<R: SwapRecord>(
    record: &R,
    sender: &Address,
    now: i64,
    unsafe_cancel: bool,
) -> Result<(), SwapError> {
    if unsafe_cancel {
        return Ok(());
    }
    if record.owner() != sender.as_bytes().as_slice() {
        return Err(SwapError::CancelNotAllowed(format!(
            "{sender} is not the owner"
        )));
    }
    if now < record.timeout() {
        return Err(SwapError::CancelNotAllowed(format!(
            "swap is active until {}",
            record.timeout()
        )));
    }
    Ok(())
}
