//! # Transaction Cache
//!
//! Per-transaction overlay over a parent stub (normally a [`BatchCache`]).
//! Carries its own tx id and timestamp, collects events and accounting
//! records, and on [`TxCache::commit`] copies its writes into the parent and
//! returns them sorted for the wire.
//!
//! Dropping a `TxCache` without committing discards everything it holds.
//!
//! [`BatchCache`]: super::BatchCache

use std::collections::BTreeMap;

use shared_types::proto::{AccountingRecord, Event, WriteElement};
use shared_types::{ChaincodeStub, KeyValue, Response, StubError, Timestamp};

use crate::domain::WriteSet;

/// Sorted output of a committed transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TxCommit {
    /// Ascending by key, one entry per key.
    pub writes: Vec<WriteElement>,
    /// Ascending by name.
    pub events: Vec<Event>,
    /// Ascending by canonical form.
    pub accounting: Vec<AccountingRecord>,
}

/// Per-transaction write overlay.
pub struct TxCache<'a> {
    parent: &'a mut dyn ChaincodeStub,
    tx_id: String,
    timestamp: Timestamp,
    writes: WriteSet,
    events: BTreeMap<String, Vec<u8>>,
    accounting: Vec<AccountingRecord>,
}

impl<'a> TxCache<'a> {
    pub fn new(parent: &'a mut dyn ChaincodeStub, tx_id: String, timestamp: Timestamp) -> Self {
        Self {
            parent,
            tx_id,
            timestamp,
            writes: WriteSet::new(),
            events: BTreeMap::new(),
            accounting: Vec::new(),
        }
    }

    /// Uncommitted writes.
    pub fn writes(&self) -> &WriteSet {
        &self.writes
    }

    /// Copy writes into the parent in insertion order and return the sorted
    /// writes, events and accounting records.
    pub fn commit(self) -> Result<TxCommit, StubError> {
        for (key, write) in self.writes.iter() {
            if write.deleted {
                self.parent.del_state(key)?;
            } else {
                self.parent.put_state(key, write.value.clone())?;
            }
        }

        let writes = self.writes.sorted_elements();
        let events = self
            .events
            .into_iter()
            .map(|(name, value)| Event { name, value })
            .collect();
        let mut accounting = self.accounting;
        accounting.sort_by_cached_key(AccountingRecord::canonical);

        Ok(TxCommit {
            writes,
            events,
            accounting,
        })
    }
}

impl ChaincodeStub for TxCache<'_> {
    fn tx_id(&self) -> String {
        self.tx_id.clone()
    }

    fn channel_id(&self) -> String {
        self.parent.channel_id()
    }

    fn chaincode_name(&self) -> String {
        self.parent.chaincode_name()
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.timestamp
    }

    fn function_and_parameters(&self) -> (String, Vec<String>) {
        self.parent.function_and_parameters()
    }

    fn creator(&self) -> Result<Vec<u8>, StubError> {
        self.parent.creator()
    }

    fn creator_ski(&self) -> Result<Vec<u8>, StubError> {
        self.parent.creator_ski()
    }

    fn signed_proposal(&self) -> Result<Vec<u8>, StubError> {
        self.parent.signed_proposal()
    }

    fn transient(&self) -> Result<BTreeMap<String, Vec<u8>>, StubError> {
        self.parent.transient()
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        if let Some(pending) = self.writes.lookup(key) {
            return Ok(pending.map(<[u8]>::to_vec));
        }
        self.parent.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError> {
        self.writes.put(key, value);
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), StubError> {
        self.writes.delete(key);
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<Vec<KeyValue>, StubError> {
        let base = self.parent.get_state_by_range(start, end)?;
        Ok(self.writes.overlay_range(base, start, end))
    }

    fn set_state_validation_parameter(
        &mut self,
        key: &str,
        policy: Vec<u8>,
    ) -> Result<(), StubError> {
        self.parent.set_state_validation_parameter(key, policy)
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StubError> {
        self.events.insert(name.to_string(), payload);
        Ok(())
    }

    fn invoke_chaincode(&mut self, name: &str, args: &[Vec<u8>], channel: &str) -> Response {
        self.parent.invoke_chaincode(name, args, channel)
    }

    fn add_accounting_record(&mut self, record: AccountingRecord) {
        self.accounting.push(record);
    }
}
