//! Sliding nonce window.
//!
//! A history is a strictly ascending list of accepted nonces (milliseconds
//! since epoch). Every element stays within `ttl` seconds of the newest one.

use super::errors::NonceError;

/// Smallest 13-digit value.
pub const MIN_NONCE: u64 = 1_000_000_000_000;

/// Largest 13-digit value.
pub const MAX_NONCE: u64 = 9_999_999_999_999;

/// Parse the textual nonce argument.
pub fn parse_nonce(raw: &str) -> Result<u64, NonceError> {
    let nonce: u64 = raw
        .parse()
        .map_err(|_| NonceError::InvalidFormat(raw.to_string()))?;
    validate_format(nonce)?;
    Ok(nonce)
}

fn validate_format(nonce: u64) -> Result<(), NonceError> {
    if !(MIN_NONCE..=MAX_NONCE).contains(&nonce) {
        return Err(NonceError::InvalidFormat(nonce.to_string()));
    }
    Ok(())
}

/// Accept `nonce` into `history` or reject it.
pub fn next_history(nonce: u64, mut history: Vec<u64>, ttl: u64) -> Result<Vec<u64>, NonceError> {
    validate_format(nonce)?;

    let Some(&last) = history.last() else {
        return Ok(vec![nonce]);
    };
    let ttl_ms = ttl.saturating_mul(1000);

    if nonce > last {
        history.push(nonce);
        let keep_from = history.partition_point(|&v| nonce - v > ttl_ms);
        history.drain(..keep_from);
        return Ok(history);
    }

    if last - nonce > ttl_ms {
        return Err(NonceError::Stale {
            nonce,
            last,
            ttl,
        });
    }

    match history.binary_search(&nonce) {
        Ok(_) => Err(NonceError::Duplicate(nonce)),
        Err(pos) => {
            history.insert(pos, nonce);
            Ok(history)
        }
    }
}
