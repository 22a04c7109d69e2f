//! # Host Ledger Port
//!
//! The surface the chaincode core consumes from its host: state access,
//! event emission, transaction oracles and cross-contract calls.
//!
//! ## Implementations
//!
//! | Implementor | Crate | Purpose |
//! |-------------|-------|---------|
//! | host shim | (external) | Real ledger |
//! | `MockLedger` | `cc-01-state-cache` | In-memory ledger with per-tx staging |
//! | `BatchCache` | `cc-01-state-cache` | Batch-wide write overlay |
//! | `TxCache` | `cc-01-state-cache` | Per-transaction write overlay |
//! | `QueryStub` | `cc-01-state-cache` | Write-masking view for queries |
//!
//! Methods that mutate take `&mut self` because overlay layers memoize reads.

use std::collections::BTreeMap;

use crate::entities::Timestamp;
use crate::errors::StubError;
use crate::keys;
use crate::proto::AccountingRecord;

/// Status code of a successful response.
pub const OK: i32 = 200;

/// Status code of a failed response.
pub const ERROR: i32 = 500;

/// A key and its stored value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    /// Full key.
    pub key: String,
    /// Stored bytes.
    pub value: Vec<u8>,
}

/// Invocation response (host `peer.Response` shape).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Response {
    /// 200 on success.
    pub status: i32,
    /// Error string on failure.
    pub message: String,
    /// Success payload.
    pub payload: Vec<u8>,
}

impl Response {
    /// Success with a payload.
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            message: String::new(),
            payload,
        }
    }

    /// Failure with a message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    /// True for status 200.
    pub fn is_ok(&self) -> bool {
        self.status == OK
    }
}

/// Host ledger capabilities used by the core.
pub trait ChaincodeStub {
    // -------------------------------------------------------------------------
    // Transaction oracles
    // -------------------------------------------------------------------------

    /// Hex transaction id.
    fn tx_id(&self) -> String;

    /// Channel this invocation runs on.
    fn channel_id(&self) -> String;

    /// Name this chaincode is installed under.
    fn chaincode_name(&self) -> String;

    /// Proposal timestamp.
    fn tx_timestamp(&self) -> Timestamp;

    /// Function name and positional arguments of the invocation.
    fn function_and_parameters(&self) -> (String, Vec<String>);

    /// Serialized creator identity.
    fn creator(&self) -> Result<Vec<u8>, StubError>;

    /// Subject Key Identifier of the creator certificate.
    fn creator_ski(&self) -> Result<Vec<u8>, StubError>;

    /// Signed proposal bytes.
    fn signed_proposal(&self) -> Result<Vec<u8>, StubError> {
        Err(StubError::Unsupported("signed_proposal"))
    }

    /// Transient map of the proposal.
    fn transient(&self) -> Result<BTreeMap<String, Vec<u8>>, StubError> {
        Ok(BTreeMap::new())
    }

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------

    /// Read a key. `None` when absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError>;

    /// Write a key.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError>;

    /// Delete a key.
    fn del_state(&mut self, key: &str) -> Result<(), StubError>;

    /// Keys in `[start, end)`, ascending.
    fn get_state_by_range(&mut self, start: &str, end: &str)
        -> Result<Vec<KeyValue>, StubError>;

    /// One page of keys in `[start, end)` beginning at `bookmark` (or `start`
    /// when empty). Returns the page and the bookmark of the next page (empty
    /// when exhausted).
    fn get_state_by_range_with_pagination(
        &mut self,
        start: &str,
        end: &str,
        page_size: usize,
        bookmark: &str,
    ) -> Result<(Vec<KeyValue>, String), StubError> {
        let from = if bookmark.is_empty() { start } else { bookmark };
        let mut all = self.get_state_by_range(from, end)?;
        if page_size == 0 || all.len() <= page_size {
            return Ok((all, String::new()));
        }
        let next = all[page_size].key.clone();
        all.truncate(page_size);
        Ok((all, next))
    }

    /// All keys under a partial composite key.
    fn get_state_by_partial_composite_key(
        &mut self,
        object_type: &str,
        attributes: &[String],
    ) -> Result<Vec<KeyValue>, StubError> {
        let (start, end) = keys::partial_key_range(object_type, attributes)?;
        self.get_state_by_range(&start, &end)
    }

    /// Build a composite key.
    fn create_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> Result<String, StubError> {
        keys::create_composite_key(object_type, attributes)
    }

    /// Set key-level endorsement policy.
    fn set_state_validation_parameter(
        &mut self,
        _key: &str,
        _policy: Vec<u8>,
    ) -> Result<(), StubError> {
        Err(StubError::Unsupported("set_state_validation_parameter"))
    }

    // -------------------------------------------------------------------------
    // Events and calls
    // -------------------------------------------------------------------------

    /// Emit an event.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StubError>;

    /// Call another chaincode.
    fn invoke_chaincode(&mut self, name: &str, args: &[Vec<u8>], channel: &str) -> Response;

    /// Record a balance movement. Only transaction caches keep these.
    fn add_accounting_record(&mut self, _record: AccountingRecord) {}
}
