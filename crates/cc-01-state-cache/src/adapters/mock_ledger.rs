//! # In-Memory Ledger
//!
//! [`ChaincodeStub`] adapter with host ledger semantics, used by tests and
//! local tooling:
//!
//! - writes are staged per transaction and applied only on commit
//! - reads see committed state only, never the transaction's own writes
//! - one event per transaction, the last `set_event` wins
//! - other chaincodes are plain closures registered by name

use std::collections::{BTreeMap, HashMap};

use shared_types::{ChaincodeStub, KeyValue, Response, StubError, Timestamp};

use crate::domain::WriteSet;

/// Handler standing in for another chaincode: `(args, channel) -> response`.
pub type InvokeHandler = Box<dyn FnMut(&[Vec<u8>], &str) -> Response + Send>;

/// Default proposal timestamp.
pub const DEFAULT_TIMESTAMP: Timestamp = Timestamp::new(1_700_000_000, 0);

/// In-memory host ledger.
pub struct MockLedger {
    channel: String,
    chaincode: String,
    state: BTreeMap<String, Vec<u8>>,
    staged: WriteSet,
    pending_event: Option<(String, Vec<u8>)>,
    events: Vec<(String, Vec<u8>)>,
    tx_id: String,
    timestamp: Timestamp,
    function: String,
    args: Vec<String>,
    creator: Vec<u8>,
    creator_ski: Vec<u8>,
    transient: BTreeMap<String, Vec<u8>>,
    handlers: HashMap<String, InvokeHandler>,
}

impl MockLedger {
    pub fn new(channel: &str, chaincode: &str) -> Self {
        Self {
            channel: channel.to_string(),
            chaincode: chaincode.to_string(),
            state: BTreeMap::new(),
            staged: WriteSet::new(),
            pending_event: None,
            events: Vec::new(),
            tx_id: String::new(),
            timestamp: DEFAULT_TIMESTAMP,
            function: String::new(),
            args: Vec::new(),
            creator: Vec::new(),
            creator_ski: Vec::new(),
            transient: BTreeMap::new(),
            handlers: HashMap::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Transaction lifecycle
    // -------------------------------------------------------------------------

    /// Start a transaction. Discards anything staged and not committed.
    pub fn begin(&mut self, tx_id: &str, function: &str, args: Vec<String>) {
        self.staged.clear();
        self.pending_event = None;
        self.tx_id = tx_id.to_string();
        self.function = function.to_string();
        self.args = args;
    }

    /// Apply staged writes and the pending event.
    pub fn commit(&mut self) {
        for (key, write) in self.staged.iter() {
            if write.deleted {
                self.state.remove(key);
            } else {
                self.state.insert(key.to_string(), write.value.clone());
            }
        }
        self.staged.clear();
        if let Some(event) = self.pending_event.take() {
            self.events.push(event);
        }
    }

    /// Drop staged writes and the pending event.
    pub fn rollback(&mut self) {
        self.staged.clear();
        self.pending_event = None;
    }

    /// Run one transaction; commit when `f` returns status 200.
    pub fn execute<F>(&mut self, tx_id: &str, function: &str, args: Vec<String>, f: F) -> Response
    where
        F: FnOnce(&mut Self) -> Response,
    {
        self.begin(tx_id, function, args);
        let response = f(self);
        if response.is_ok() {
            self.commit();
        } else {
            self.rollback();
        }
        response
    }

    /// Run one transaction and always commit.
    pub fn execute_ok<F>(&mut self, tx_id: &str, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.begin(tx_id, "", Vec::new());
        f(self);
        self.commit();
    }

    // -------------------------------------------------------------------------
    // Proposal context
    // -------------------------------------------------------------------------

    pub fn set_channel(&mut self, channel: &str) {
        self.channel = channel.to_string();
    }

    pub fn set_timestamp(&mut self, timestamp: Timestamp) {
        self.timestamp = timestamp;
    }

    /// Serialized creator identity and its certificate SKI.
    pub fn set_creator(&mut self, creator: Vec<u8>, ski: Vec<u8>) {
        self.creator = creator;
        self.creator_ski = ski;
    }

    pub fn set_transient(&mut self, transient: BTreeMap<String, Vec<u8>>) {
        self.transient = transient;
    }

    /// Register a handler for `invoke_chaincode(name, ..)`.
    pub fn register_chaincode<F>(&mut self, name: &str, handler: F)
    where
        F: FnMut(&[Vec<u8>], &str) -> Response + Send + 'static,
    {
        self.handlers.insert(name.to_string(), Box::new(handler));
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Write straight into committed state.
    pub fn seed(&mut self, key: &str, value: Vec<u8>) {
        self.state.insert(key.to_string(), value);
    }

    /// Committed value of a key.
    pub fn state(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Committed keys in `[start, end)`.
    pub fn keys_in_range(&self, start: &str, end: &str) -> Vec<String> {
        self.state
            .range(start.to_string()..end.to_string())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Committed events, oldest first.
    pub fn events(&self) -> &[(String, Vec<u8>)] {
        &self.events
    }

    /// Most recent committed event.
    pub fn last_event(&self) -> Option<&(String, Vec<u8>)> {
        self.events.last()
    }

    /// Keys staged by the open transaction, in write order.
    pub fn staged_keys(&self) -> Vec<String> {
        self.staged.iter().map(|(k, _)| k.to_string()).collect()
    }

    pub fn staged_is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

impl ChaincodeStub for MockLedger {
    fn tx_id(&self) -> String {
        self.tx_id.clone()
    }

    fn channel_id(&self) -> String {
        self.channel.clone()
    }

    fn chaincode_name(&self) -> String {
        self.chaincode.clone()
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn function_and_parameters(&self) -> (String, Vec<String>) {
        (self.function.clone(), self.args.clone())
    }

    fn creator(&self) -> Result<Vec<u8>, StubError> {
        Ok(self.creator.clone())
    }

    fn creator_ski(&self) -> Result<Vec<u8>, StubError> {
        if self.creator_ski.is_empty() {
            return Err(StubError::Host("creator certificate has no SKI".into()));
        }
        Ok(self.creator_ski.clone())
    }

    fn signed_proposal(&self) -> Result<Vec<u8>, StubError> {
        Ok(Vec::new())
    }

    fn transient(&self) -> Result<BTreeMap<String, Vec<u8>>, StubError> {
        Ok(self.transient.clone())
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError> {
        if key.is_empty() {
            return Err(StubError::Host("key must not be empty".into()));
        }
        self.staged.put(key, value);
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), StubError> {
        self.staged.delete(key);
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<Vec<KeyValue>, StubError> {
        if start > end && !end.is_empty() {
            return Ok(Vec::new());
        }
        let iter: Box<dyn Iterator<Item = (&String, &Vec<u8>)>> = if end.is_empty() {
            Box::new(self.state.range(start.to_string()..))
        } else {
            Box::new(self.state.range(start.to_string()..end.to_string()))
        };
        Ok(iter
            .map(|(key, value)| KeyValue {
                key: key.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn set_state_validation_parameter(
        &mut self,
        _key: &str,
        _policy: Vec<u8>,
    ) -> Result<(), StubError> {
        Ok(())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StubError> {
        if name.is_empty() {
            return Err(StubError::Host("event name must not be empty".into()));
        }
        self.pending_event = Some((name.to_string(), payload));
        Ok(())
    }

    fn invoke_chaincode(&mut self, name: &str, args: &[Vec<u8>], channel: &str) -> Response {
        match self.handlers.get_mut(name) {
            Some(handler) => handler(args, channel),
            None => Response::error(format!("chaincode {name} not found")),
        }
    }
}
