//! # Batch Cache
//!
//! Batch-wide overlay over the ledger stub. Reads go `writes -> reads ->
//! ledger` and are memoized; writes stay in memory until [`BatchCache::commit`]
//! replays them onto the ledger in insertion order.
//!
//! Cross-contract calls are memoized as well. A successful ACL `checkKeys`
//! response also seeds the `checkAddress` and `getAccountInfo` entries of the
//! signer it resolves, so later lookups in the same batch never leave the
//! cache.

use std::collections::{BTreeMap, HashMap};

use prost::Message;
use tracing::{debug, warn};

use shared_types::acl::{self, ACL_CHAINCODE, CHECK_ADDRESS, CHECK_KEYS, GET_ACCOUNT_INFO};
use shared_types::proto::{AclResponse, AddressProto};
use shared_types::{ChaincodeStub, KeyValue, Response, StubError, Timestamp};

use crate::domain::WriteSet;

/// Batch-wide write overlay.
pub struct BatchCache<'a> {
    ledger: &'a mut dyn ChaincodeStub,
    writes: WriteSet,
    reads: HashMap<String, Option<Vec<u8>>>,
    invoke_results: HashMap<String, Response>,
    events: Vec<(String, Vec<u8>)>,
}

impl<'a> BatchCache<'a> {
    pub fn new(ledger: &'a mut dyn ChaincodeStub) -> Self {
        Self {
            ledger,
            writes: WriteSet::new(),
            reads: HashMap::new(),
            invoke_results: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Uncommitted writes.
    pub fn writes(&self) -> &WriteSet {
        &self.writes
    }

    /// Replay writes and buffered events onto the ledger.
    pub fn commit(self) -> Result<(), StubError> {
        debug!(writes = self.writes.len(), "committing batch cache");
        for (key, write) in self.writes.iter() {
            if write.deleted {
                self.ledger.del_state(key)?;
            } else {
                self.ledger.put_state(key, write.value.clone())?;
            }
        }
        for (name, payload) in self.events {
            self.ledger.set_event(&name, payload)?;
        }
        Ok(())
    }

    fn remember_acl_derivatives(&mut self, channel: &str, response: &Response) {
        let decoded = match AclResponse::from_payload(&response.payload) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(error = %err, "unable to decode checkKeys response");
                return;
            }
        };
        let Ok(address) = decoded.signer_address() else {
            return;
        };
        let encoded = address.to_base58();

        let proto = decoded
            .address
            .as_ref()
            .and_then(|a| a.address.clone())
            .unwrap_or_else(|| AddressProto::from(address));
        self.invoke_results.insert(
            invoke_key(ACL_CHAINCODE, channel, &acl::acl_args(CHECK_ADDRESS, &[&encoded])),
            Response::success(proto.encode_to_vec()),
        );
        self.invoke_results.insert(
            invoke_key(ACL_CHAINCODE, channel, &acl::acl_args(GET_ACCOUNT_INFO, &[&encoded])),
            Response::success(decoded.account_info().encode_to_vec()),
        );
    }
}

fn invoke_key(name: &str, channel: &str, args: &[Vec<u8>]) -> String {
    let mut key = format!("{channel}\u{0}{name}");
    for arg in args {
        key.push('\u{0}');
        key.push_str(&hex::encode(arg));
    }
    key
}

impl ChaincodeStub for BatchCache<'_> {
    fn tx_id(&self) -> String {
        self.ledger.tx_id()
    }

    fn channel_id(&self) -> String {
        self.ledger.channel_id()
    }

    fn chaincode_name(&self) -> String {
        self.ledger.chaincode_name()
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.ledger.tx_timestamp()
    }

    fn function_and_parameters(&self) -> (String, Vec<String>) {
        self.ledger.function_and_parameters()
    }

    fn creator(&self) -> Result<Vec<u8>, StubError> {
        self.ledger.creator()
    }

    fn creator_ski(&self) -> Result<Vec<u8>, StubError> {
        self.ledger.creator_ski()
    }

    fn signed_proposal(&self) -> Result<Vec<u8>, StubError> {
        self.ledger.signed_proposal()
    }

    fn transient(&self) -> Result<BTreeMap<String, Vec<u8>>, StubError> {
        self.ledger.transient()
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        if let Some(pending) = self.writes.lookup(key) {
            return Ok(pending.map(<[u8]>::to_vec));
        }
        if let Some(cached) = self.reads.get(key) {
            return Ok(cached.clone());
        }
        let value = self.ledger.get_state(key)?;
        self.reads.insert(key.to_string(), value.clone());
        Ok(value)
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
        let base = self.ledger.get_state_by_range(start, end)?;
        Ok(self.writes.overlay_range(base, start, end))
    }

    fn set_state_validation_parameter(
        &mut self,
        key: &str,
        policy: Vec<u8>,
    ) -> Result<(), StubError> {
        self.ledger.set_state_validation_parameter(key, policy)
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<(), StubError> {
        self.events.push((name.to_string(), payload));
        Ok(())
    }

    fn invoke_chaincode(&mut self, name: &str, args: &[Vec<u8>], channel: &str) -> Response {
        let key = invoke_key(name, channel, args);
        if let Some(cached) = self.invoke_results.get(&key) {
            return cached.clone();
        }
        let response = self.ledger.invoke_chaincode(name, args, channel);
        let is_check_keys =
            name == ACL_CHAINCODE && args.first().map(Vec::as_slice) == Some(CHECK_KEYS.as_bytes());
        if is_check_keys && response.is_ok() {
            self.remember_acl_derivatives(channel, &response);
        }
        self.invoke_results.insert(key, response.clone());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockLedger;
    use shared_types::proto::{AccountInfo, SignedAddress};
    use shared_types::Address;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_reads_consult_writes_first() {
        let mut ledger = MockLedger::new("ch", "cc");
        ledger.seed("k", b"ledger".to_vec());
        ledger.begin("aa01", "batchExecute", vec![]);
        let mut cache = BatchCache::new(&mut ledger);
        assert_eq!(cache.get_state("k").unwrap(), Some(b"ledger".to_vec()));
        cache.put_state("k", b"batch".to_vec()).unwrap();
        assert_eq!(cache.get_state("k").unwrap(), Some(b"batch".to_vec()));
        cache.del_state("k").unwrap();
        assert_eq!(cache.get_state("k").unwrap(), None);
    }

    #[test]
    fn test_commit_replays_in_insertion_order() {
        let mut ledger = MockLedger::new("ch", "cc");
        ledger.seed("old", vec![1]);
        ledger.begin("aa01", "batchExecute", vec![]);
        {
            let mut cache = BatchCache::new(&mut ledger);
            cache.put_state("b", vec![2]).unwrap();
            cache.put_state("a", vec![3]).unwrap();
            cache.del_state("old").unwrap();
            cache.commit().unwrap();
        }
        let order: Vec<String> = ledger.staged_keys();
        assert_eq!(order, vec!["b".to_string(), "a".to_string(), "old".to_string()]);
        ledger.commit();
        assert_eq!(ledger.state("a"), Some(&[3u8][..]));
        assert_eq!(ledger.state("old"), None);
    }

    #[test]
    fn test_uncommitted_cache_leaves_ledger_untouched() {
        let mut ledger = MockLedger::new("ch", "cc");
        ledger.begin("aa01", "batchExecute", vec![]);
        {
            let mut cache = BatchCache::new(&mut ledger);
            cache.put_state("k", vec![1]).unwrap();
        }
        assert!(ledger.staged_is_empty());
    }

    #[test]
    fn test_check_keys_seeds_derived_entries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let address = Address::new([4u8; 32]);
        let mut ledger = MockLedger::new("ch", "cc");
        let counter = Arc::clone(&calls);
        ledger.register_chaincode(
            "acl",
            move |_args: &[Vec<u8>], _channel: &str| {
                counter.fetch_add(1, Ordering::SeqCst);
                let resp = AclResponse {
                    account: Some(AccountInfo {
                        kyc_hash: "kyc".into(),
                        ..Default::default()
                    }),
                    address: Some(SignedAddress {
                        address: Some(AddressProto::from(address)),
                        signature_policy: None,
                    }),
                    key_types: vec![],
                };
                Response::success(resp.encode_to_vec())
            },
        );
        ledger.begin("aa01", "batchExecute", vec![]);
        let mut cache = BatchCache::new(&mut ledger);

        let check = acl::acl_args(CHECK_KEYS, &["pk"]);
        assert!(cache.invoke_chaincode("acl", &check, "acl").is_ok());
        assert!(cache.invoke_chaincode("acl", &check, "acl").is_ok());

        let info = cache.invoke_chaincode(
            "acl",
            &acl::acl_args(GET_ACCOUNT_INFO, &[&address.to_base58()]),
            "acl",
        );
        let info = AccountInfo::decode(info.payload.as_slice()).unwrap();
        assert_eq!(info.kyc_hash, "kyc");

        let addr = cache.invoke_chaincode(
            "acl",
            &acl::acl_args(CHECK_ADDRESS, &[&address.to_base58()]),
            "acl",
        );
        let addr = AddressProto::decode(addr.payload.as_slice()).unwrap();
        assert_eq!(addr.address, address.as_bytes().to_vec());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_range_overlays_pending_writes() {
        let mut ledger = MockLedger::new("ch", "cc");
        ledger.seed("a1", vec![1]);
        ledger.seed("a2", vec![2]);
        ledger.begin("aa01", "batchExecute", vec![]);
        let mut cache = BatchCache::new(&mut ledger);
        cache.del_state("a1").unwrap();
        cache.put_state("a3", vec![3]).unwrap();
        let keys: Vec<String> = cache
            .get_state_by_range("a", "b")
            .unwrap()
            .into_iter()
            .map(|kv| kv.key)
            .collect();
        assert_eq!(keys, vec!["a2".to_string(), "a3".to_string()]);
    }
}
