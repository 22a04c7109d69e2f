//! # Composite Keys
//!
//! Every persisted key belongs to exactly one typed namespace encoded in its
//! composite-key prefix. The encoding matches the host ledger's own:
//! `U+0000 type U+0000 attr1 U+0000 attr2 U+0000 ...`.

use crate::errors::StubError;

/// Namespace separator.
pub const MIN_UNICODE_RUNE: char = '\u{0}';

/// Upper bound used to close partial-key ranges.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Namespace of pending preimages.
pub const BATCH_PREFIX: &str = "batchTransactions";

/// Namespace of single-asset swaps.
pub const SWAP_PREFIX: &str = "swaps";

/// Namespace of multi-asset swaps.
pub const MULTI_SWAP_PREFIX: &str = "multi_swap";

/// Namespace of outgoing cross-channel transfers.
pub const CC_TRANSFER_FROM_PREFIX: &str = "/transfer/from/";

/// Namespace of incoming cross-channel transfers.
pub const CC_TRANSFER_TO_PREFIX: &str = "/transfer/to/";

/// Namespace of nonce histories (byte `0x2a` rendered as hex).
pub const NONCE_PREFIX: &str = "2a";

/// Namespace of attached documents.
pub const DOCUMENTS_PREFIX: &str = "documents";

/// Plain key holding the contract configuration.
pub const CONFIG_KEY: &str = "__config";

/// Build a composite key.
pub fn create_composite_key<S: AsRef<str>>(
    object_type: &str,
    attributes: &[S],
) -> Result<String, StubError> {
    validate_part(object_type)?;
    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(MIN_UNICODE_RUNE);
    key.push_str(object_type);
    key.push(MIN_UNICODE_RUNE);
    for attr in attributes {
        let attr = attr.as_ref();
        validate_part(attr)?;
        key.push_str(attr);
        key.push(MIN_UNICODE_RUNE);
    }
    Ok(key)
}

/// Split a composite key into its type and attributes.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), StubError> {
    let body = key
        .strip_prefix(MIN_UNICODE_RUNE)
        .ok_or_else(|| StubError::InvalidCompositeKey(key.to_string()))?;
    let mut parts: Vec<String> = body
        .split(MIN_UNICODE_RUNE)
        .map(str::to_string)
        .collect();
    // Trailing separator yields one empty tail element.
    if parts.last().is_some_and(String::is_empty) {
        parts.pop();
    }
    if parts.is_empty() {
        return Err(StubError::InvalidCompositeKey(key.to_string()));
    }
    let object_type = parts.remove(0);
    Ok((object_type, parts))
}

/// Inclusive start and exclusive end of a partial composite key range.
pub fn partial_key_range<S: AsRef<str>>(
    object_type: &str,
    attributes: &[S],
) -> Result<(String, String), StubError> {
    let start = create_composite_key(object_type, attributes)?;
    let mut end = start.clone();
    end.push(MAX_UNICODE_RUNE);
    Ok((start, end))
}

fn validate_part(part: &str) -> Result<(), StubError> {
    if part.contains(MIN_UNICODE_RUNE) || part.contains(MAX_UNICODE_RUNE) {
        return Err(StubError::InvalidCompositeKey(part.to_string()));
    }
    Ok(())
}
