//! Write-masking view used to run query methods.
//!
//! Reads pass through; every mutation and event is accepted and dropped.

use std::collections::BTreeMap;

use tracing::debug;

use shared_types::{ChaincodeStub, KeyValue, Response, StubError, Timestamp};

pub struct QueryStub<'a> {
    inner: &'a mut dyn ChaincodeStub,
}

impl<'a> QueryStub<'a> {
    pub fn new(inner: &'a mut dyn ChaincodeStub) -> Self {
        Self { inner }
    }
}

impl ChaincodeStub for QueryStub<'_> {
    fn tx_id(&self) -> String {
        self.inner.tx_id()
    }

    fn channel_id(&self) -> String {
        self.inner.channel_id()
    }

    fn chaincode_name(&self) -> String {
        self.inner.chaincode_name()
    }

    fn tx_timestamp(&self) -> Timestamp {
        self.inner.tx_timestamp()
    }

    fn function_and_parameters(&self) -> (String, Vec<String>) {
        self.inner.function_and_parameters()
    }

    fn creator(&self) -> Result<Vec<u8>, StubError> {
        self.inner.creator()
    }

    fn creator_ski(&self) -> Result<Vec<u8>, StubError> {
        self.inner.creator_ski()
    }

    fn signed_proposal(&self) -> Result<Vec<u8>, StubError> {
        self.inner.signed_proposal()
    }

    fn transient(&self) -> Result<BTreeMap<String, Vec<u8>>, StubError> {
        self.inner.transient()
    }

    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, _value: Vec<u8>) -> Result<(), StubError> {
        debug!(key, "query stub dropped put_state");
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<(), StubError> {
        debug!(key, "query stub dropped del_state");
        Ok(())
    }

    fn get_state_by_range(&mut self, start: &str, end: &str) -> Result<Vec<KeyValue>, StubError> {
        self.inner.get_state_by_range(start, end)
    }

    fn get_state_by_range_with_pagination(
        &mut self,
        start: &str,
        end: &str,
        page_size: usize,
        bookmark: &str,
    ) -> Result<(Vec<KeyValue>, String), StubError> {
        self.inner
            .get_state_by_range_with_pagination(start, end, page_size, bookmark)
    }

    fn set_state_validation_parameter(
        &mut self,
        key: &str,
        _policy: Vec<u8>,
    ) -> Result<(), StubError> {
        debug!(key, "query stub dropped set_state_validation_parameter");
        Ok(())
    }

    fn set_event(&mut self, name: &str, _payload: Vec<u8>) -> Result<(), StubError> {
        debug!(name, "query stub dropped set_event");
        Ok(())
    }

    fn invoke_chaincode(&mut self, name: &str, args: &[Vec<u8>], channel: &str) -> Response {
        self.inner.invoke_chaincode(name, args, channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockLedger;

    #[test]
    fn test_mutations_are_dropped() {
        let mut ledger = MockLedger::new("ch", "cc");
        ledger.seed("seen", vec![1]);
        let response = ledger.execute("aa01", "query", vec![], |l| {
            let mut q = QueryStub::new(l);
            q.put_state("k", b"v".to_vec()).unwrap();
            q.del_state("seen").unwrap();
            q.set_event("evt", vec![1]).unwrap();
            assert_eq!(q.get_state("seen").unwrap(), Some(vec![1]));
            Response::success(vec![])
        });
        assert!(response.is_ok());
        assert_eq!(ledger.state("k"), None);
        assert_eq!(ledger.state("seen"), Some(&[1u8][..]));
        assert!(ledger.events().is_empty());
    }
}
