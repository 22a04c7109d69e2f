//! Nonce enforcement against ledger state.

use prost::Message;
use tracing::{debug, instrument};

use shared_types::keys::{create_composite_key, NONCE_PREFIX};
use shared_types::proto::Nonce;
use shared_types::{Address, ChaincodeStub};

use crate::domain::{next_history, NonceError};

/// Loads, checks and persists per-address nonce histories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NonceService {
    ttl: u64,
}

impl NonceService {
    /// `ttl` is the window in seconds.
    pub fn new(ttl: u64) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Accept `nonce` for `address` and persist the new history.
    #[instrument(skip(self, stub, address), fields(address = %address))]
    pub fn check_and_store(
        &self,
        stub: &mut dyn ChaincodeStub,
        address: &Address,
        nonce: u64,
    ) -> Result<(), NonceError> {
        let history = load_history(stub, address)?;
        let next = next_history(nonce, history, self.ttl)?;
        debug!(nonce, size = next.len(), "nonce accepted");
        store_history(stub, address, next)
    }
}

fn nonce_key(address: &Address) -> Result<String, NonceError> {
    Ok(create_composite_key(NONCE_PREFIX, &[address.to_base58()])?)
}

/// Stored history of `address`, ascending.
pub fn load_history(stub: &mut dyn ChaincodeStub, address: &Address) -> Result<Vec<u64>, NonceError> {
    match stub.get_state(&nonce_key(address)?)? {
        None => Ok(Vec::new()),
        Some(raw) => decode_history(&raw),
    }
}

/// Persist `history` for `address`.
pub fn store_history(
    stub: &mut dyn ChaincodeStub,
    address: &Address,
    history: Vec<u64>,
) -> Result<(), NonceError> {
    let record = Nonce { nonce: history };
    stub.put_state(&nonce_key(address)?, record.encode_to_vec())?;
    Ok(())
}

/// Decode a stored history. Records written before histories existed hold a
/// bare big-endian integer and decode to a one-element history.
pub fn decode_history(raw: &[u8]) -> Result<Vec<u64>, NonceError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if let Ok(record) = Nonce::decode(raw) {
        if !record.nonce.is_empty() {
            return Ok(record.nonce);
        }
    }
    decode_legacy(raw).map(|n| vec![n])
}

fn decode_legacy(raw: &[u8]) -> Result<u64, NonceError> {
    let first = raw.iter().position(|b| *b != 0).unwrap_or(raw.len());
    let significant = &raw[first..];
    if significant.len() > 8 {
        return Err(NonceError::Corrupted(format!(
            "legacy nonce is {} bytes",
            significant.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[8 - significant.len()..].copy_from_slice(significant);
    Ok(u64::from_be_bytes(buf))
}
