//! # Batched Call Flows
//!
//! Signed calls recorded as preimages, then executed by the driver.
//!
//! 1. **Happy path**: preimage, batch, balances and the batch event
//! 2. **Replay protection**: duplicate nonce, consumed tx id
//! 3. **Isolation**: query writes dropped, panics contained per transaction
//! 4. **Direct tasks**: `executeTasks` authenticates each task itself

#[cfg(test)]
mod tests {
    use prost::Message;

    use cc_01_state_cache::balance::BalanceType;
    use shared_types::keys::{create_composite_key, BATCH_PREFIX};
    use shared_types::proto::{BatchEvent, BatchResponse, ExecuteTasksRequest, Task};
    use shared_types::U256;

    use crate::fixtures::{Channel, Signer, NONCE};

    fn preimage_key(tx: &str) -> String {
        create_composite_key(BATCH_PREFIX, &[tx]).unwrap()
    }

    /// Channel `tok` where signer 1 holds 1000 TOK.
    fn funded() -> (Channel, Signer, Signer) {
        let mut channel = Channel::open("tok");
        let alice = Signer::new(1);
        let bob = Signer::new(2);
        channel.mint(&alice.address(), 1000);
        (channel, alice, bob)
    }

    // =========================================================================
    // HAPPY PATH
    // =========================================================================

    #[test]
    fn test_batched_transfer_happy_path() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();

        let resp = tok.submit("a1", &alice, "transfer", &[&to, "100"], NONCE);
        assert!(resp.is_ok(), "{}", resp.message);
        assert!(resp.payload.is_empty());
        assert!(tok.ledger.state(&preimage_key("a1")).is_some());
        assert_eq!(tok.tokens(&alice.address()), U256::from(1000u64));

        let response = tok.batch_txs("b1", &["a1"]);

        assert!(tok.ledger.state(&preimage_key("a1")).is_none());
        assert_eq!(tok.tokens(&alice.address()), U256::from(900u64));
        assert_eq!(tok.tokens(&bob.address()), U256::from(100u64));

        assert_eq!(response.tx_responses.len(), 1);
        let tx = &response.tx_responses[0];
        assert_eq!(tx.id, vec![0xa1]);
        assert_eq!(tx.method, "transfer");
        assert!(tx.error.is_none());
        assert!(!tx.writes.is_empty());
        let keys: Vec<&str> = tx.writes.iter().map(|w| w.key.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(keys, sorted);

        let (name, payload) = tok.ledger.last_event().unwrap();
        assert_eq!(name, "batchExecute");
        let event = BatchEvent::decode(payload.as_slice()).unwrap();
        assert_eq!(event.events.len(), 1);
        assert_eq!(event.events[0].method, "transfer");
        assert!(!event.events[0].accounting.is_empty());
    }

    #[test]
    fn test_responses_follow_input_order() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        for (i, tx) in ["c1", "c2", "c3"].iter().enumerate() {
            let resp = tok.submit(tx, &alice, "transfer", &[&to, "10"], NONCE + i as u64);
            assert!(resp.is_ok(), "{}", resp.message);
        }

        let response = tok.batch_txs("d1", &["c3", "c1", "c2"]);
        let ids: Vec<Vec<u8>> = response.tx_responses.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![vec![0xc3], vec![0xc1], vec![0xc2]]);
        assert_eq!(tok.tokens(&bob.address()), U256::from(30u64));
    }

    // =========================================================================
    // REPLAY PROTECTION
    // =========================================================================

    #[test]
    fn test_duplicate_nonce_rejected() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        assert!(tok.submit("a1", &alice, "transfer", &[&to, "100"], NONCE).is_ok());
        tok.batch_txs("b1", &["a1"]);

        let resp = tok.submit("a2", &alice, "transfer", &[&to, "100"], NONCE);
        assert!(!resp.is_ok());
        assert_eq!(resp.message, "nonce 1700000000000 already exists");
        assert!(tok.ledger.state(&preimage_key("a2")).is_none());
    }

    #[test]
    fn test_consumed_tx_id_reports_missing_preimage() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        assert!(tok.submit("a1", &alice, "transfer", &[&to, "100"], NONCE).is_ok());
        tok.batch_txs("b1", &["a1"]);

        let response = tok.batch_txs("b2", &["a1"]);
        let tx = &response.tx_responses[0];
        assert!(tx.method.is_empty());
        assert_eq!(
            tx.error.as_ref().unwrap().error,
            "function and args loading error: transaction a1 not found"
        );
        assert_eq!(tok.tokens(&bob.address()), U256::from(100u64));
    }

    #[test]
    fn test_one_argument_short() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        let resp = tok.submit("a1", &alice, "transfer", &[&to], NONCE);
        assert_eq!(
            resp.message,
            "incorrect number of arguments: got 7, expected at least 8"
        );
    }

    #[test]
    fn test_signature_from_other_key_rejected() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        let mut args = alice.sign("transfer", "tok", &[&to, "100"], NONCE);
        let forged = bob.sign("transfer", "tok", &[&to, "100"], NONCE);
        let last = args.len() - 1;
        args[last] = forged[last].clone();

        tok.as_user();
        let resp = tok.invoke("a1", "transfer", &args);
        assert_eq!(
            resp.message,
            format!("invalid signature for key {}", alice.public_key())
        );
    }

    // =========================================================================
    // ISOLATION
    // =========================================================================

    #[test]
    fn test_query_writes_are_dropped() {
        let mut tok = Channel::open("tok");
        tok.as_user();
        let before = tok.ledger.events().len();

        let resp = tok.invoke("e1", "peek", &[]);

        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(resp.payload, b"peeked".to_vec());
        assert!(tok.ledger.state("k").is_none());
        assert_eq!(tok.ledger.events().len(), before);
    }

    #[test]
    fn test_panic_is_contained() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        tok.as_user();
        assert!(tok.invoke("f1", "explode", &[]).is_ok());
        assert!(tok.submit("f2", &alice, "transfer", &[&to, "7"], NONCE).is_ok());

        let response = tok.batch_txs("f3", &["f1", "f2"]);

        assert_eq!(
            response.tx_responses[0].error.as_ref().unwrap().error,
            "panic batchedTxExecute"
        );
        assert!(response.tx_responses[1].error.is_none());
        assert_eq!(tok.tokens(&bob.address()), U256::from(7u64));
        assert!(tok.ledger.state(&preimage_key("f1")).is_none());
    }

    // =========================================================================
    // DIRECT TASKS
    // =========================================================================

    #[test]
    fn test_execute_tasks_authenticates_each_task() {
        let (mut tok, alice, bob) = funded();
        let to = bob.address().to_base58();
        let request = ExecuteTasksRequest {
            tasks: vec![
                Task {
                    id: "t1".into(),
                    method: "transfer".into(),
                    args: alice.sign("transfer", "tok", &[&to, "25"], NONCE),
                },
                Task {
                    id: "t2".into(),
                    method: "balanceOf".into(),
                    args: vec![to.clone()],
                },
            ],
        };

        let resp = tok.robot_call("g1", "executeTasks", &request);
        assert!(resp.is_ok(), "{}", resp.message);
        let response = BatchResponse::decode(resp.payload.as_slice()).unwrap();

        assert_eq!(response.tx_responses[0].id, b"t1".to_vec());
        assert!(response.tx_responses[0].error.is_none());
        assert_eq!(
            response.tx_responses[1].error.as_ref().unwrap().error,
            "method not found"
        );
        assert_eq!(tok.balance(BalanceType::Token, &to, "TOK"), U256::from(25u64));
        assert_eq!(tok.ledger.last_event().unwrap().0, "executeTasks");
    }

    #[test]
    fn test_user_cannot_drive_batches() {
        let mut tok = Channel::open("tok");
        tok.as_user();
        let resp = tok.invoke("h1", "batchExecute", &[String::new()]);
        assert_eq!(resp.message, "unauthorized");
    }
}
