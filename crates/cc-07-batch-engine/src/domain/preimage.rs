//! # Preimages
//!
//! A batched call is recorded as a [`PendingTx`] under
//! `(batchTransactions, tx_id)` and executed later by `batchExecute`.

use std::collections::BTreeMap;

use prost::Message;

use shared_types::keys::{create_composite_key, BATCH_PREFIX};
use shared_types::proto::{CarrierEntry, PendingTx};
use shared_types::{Address, StubError};

use super::errors::BatchError;

/// Transient keys propagated into the preimage.
pub const TRACE_KEYS: [&str; 2] = ["traceparent", "tracestate"];

pub fn preimage_key(tx_id: &str) -> Result<String, StubError> {
    create_composite_key(BATCH_PREFIX, &[tx_id])
}

/// Trace context found in the transient map, in [`TRACE_KEYS`] order.
pub fn trace_carrier(transient: &BTreeMap<String, Vec<u8>>) -> Vec<CarrierEntry> {
    TRACE_KEYS
        .iter()
        .filter_map(|key| {
            transient.get(*key).map(|value| CarrierEntry {
                key: key.to_string(),
                value: String::from_utf8_lossy(value).into_owned(),
            })
        })
        .collect()
}

/// Decode a stored preimage.
pub fn decode_preimage(raw: &[u8]) -> Result<PendingTx, BatchError> {
    PendingTx::decode(raw).map_err(|e| BatchError::MalformedPreimage(e.to_string()))
}

/// Sender recorded in the preimage, if the method is authenticated.
pub fn preimage_sender(pending: &PendingTx) -> Result<Option<Address>, BatchError> {
    match &pending.sender {
        None => Ok(None),
        Some(proto) => Address::try_from(proto)
            .map(Some)
            .map_err(|e| BatchError::MalformedPreimage(e.to_string())),
    }
}

/// Fail when `tx_ttl` is set and the preimage is older than it at `now`.
pub fn invariant_not_expired(
    tx_id: &str,
    pending: &PendingTx,
    now: i64,
    tx_ttl: u32,
) -> Result<(), BatchError> {
    if tx_ttl > 0 && now - pending.timestamp > i64::from(tx_ttl) {
        return Err(BatchError::Expired(tx_id.to_string()));
    }
    Ok(())
}

/// Fail unless `nonce` could have been accepted into `history`.
///
/// The nonce may already be evicted from the window, so anything not newer
/// than the newest stored value passes.
pub fn invariant_nonce_accepted(nonce: u64, history: &[u64]) -> Result<(), BatchError> {
    match history.last() {
        Some(&last) if nonce <= last => Ok(()),
        _ => Err(BatchError::NonceNotAccepted(nonce)),
    }
}
