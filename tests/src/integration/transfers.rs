//! # Cross-Channel Transfer Round Trip
//!
//! A forward transfer of TOK from channel `tok` to channel `usd`: opened by
//! the user, accepted on the target, committed and cleaned up by the driver.

#[cfg(test)]
mod tests {
    use cc_01_state_cache::balance::BalanceType;
    use shared_types::proto::CCTransfer;
    use shared_types::U256;

    use crate::fixtures::{Channel, Signer, NONCE};

    /// Opens transfer `t1` of 10 TOK and returns the source record as JSON.
    fn open(tok: &mut Channel, alice: &Signer) -> String {
        tok.mint(&alice.address(), 25);
        let resp = tok.submit(
            "a1",
            alice,
            "channelTransferByCustomer",
            &["t1", "USD", "TOK", "10"],
            NONCE,
        );
        assert!(resp.is_ok(), "{}", resp.message);
        let response = tok.batch_txs("b1", &["a1"]);
        assert!(response.tx_responses[0].error.is_none());

        let resp = tok.invoke("b2", "channelTransferFrom", &["t1".to_string()]);
        assert!(resp.is_ok(), "{}", resp.message);
        String::from_utf8(resp.payload).unwrap()
    }

    #[test]
    fn test_forward_transfer_full_cycle() {
        let mut tok = Channel::open("tok");
        let mut usd = Channel::open("usd");
        let alice = Signer::new(1);
        let user = alice.address().to_base58();

        let record = open(&mut tok, &alice);
        let source: CCTransfer = serde_json::from_str(&record).unwrap();
        assert!(!source.is_commit);
        assert!(source.forward_direction);
        assert_eq!((source.from.as_str(), source.to.as_str()), ("TOK", "USD"));
        assert_eq!(tok.tokens(&alice.address()), U256::from(15u64));
        assert_eq!(tok.balance(BalanceType::Given, "USD", ""), U256::from(10u64));

        usd.as_robot();
        let resp = usd.invoke("c1", "createCCTransferTo", &[record]);
        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(usd.balance(BalanceType::Allowed, &user, "TOK"), U256::from(10u64));
        let resp = usd.invoke("c2", "channelTransferTo", &["t1".to_string()]);
        let target: CCTransfer = serde_json::from_slice(&resp.payload).unwrap();
        assert!(target.is_commit);

        tok.as_robot();
        assert!(tok.invoke("b3", "commitCCTransferFrom", &["t1".to_string()]).is_ok());
        let resp = tok.invoke("b4", "channelTransferFrom", &["t1".to_string()]);
        let source: CCTransfer = serde_json::from_slice(&resp.payload).unwrap();
        assert!(source.is_commit);
        let resp = tok.invoke("b5", "commitCCTransferFrom", &["t1".to_string()]);
        assert_eq!(resp.message, "transfer already commit");

        assert!(usd.invoke("c3", "deleteCCTransferTo", &["t1".to_string()]).is_ok());
        assert!(tok.invoke("b6", "deleteCCTransferFrom", &["t1".to_string()]).is_ok());
        let resp = tok.invoke("b7", "channelTransferFrom", &["t1".to_string()]);
        assert_eq!(resp.message, "transfer not found");
        let resp = usd.invoke("c4", "channelTransferTo", &["t1".to_string()]);
        assert_eq!(resp.message, "transfer not found");
    }

    #[test]
    fn test_amount_beyond_u64() {
        let mut tok = Channel::open("tok");
        let mut usd = Channel::open("usd");
        let alice = Signer::new(1);
        let user = alice.address().to_base58();
        let amount = U256::exp10(20);
        tok.mint_exact(&alice.address(), amount + U256::from(7u64));

        let resp = tok.submit(
            "a1",
            &alice,
            "channelTransferByCustomer",
            &["t1", "USD", "TOK", "100000000000000000000"],
            NONCE,
        );
        assert!(resp.is_ok(), "{}", resp.message);
        let response = tok.batch_txs("b1", &["a1"]);
        assert!(response.tx_responses[0].error.is_none());
        assert_eq!(tok.tokens(&alice.address()), U256::from(7u64));
        assert_eq!(tok.balance(BalanceType::Given, "USD", ""), amount);

        let resp = tok.invoke("b2", "channelTransferFrom", &["t1".to_string()]);
        let record = String::from_utf8(resp.payload).unwrap();
        let source: CCTransfer = serde_json::from_str(&record).unwrap();
        assert_eq!(source.amount, "100000000000000000000");

        usd.as_robot();
        let resp = usd.invoke("c1", "createCCTransferTo", &[record]);
        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(usd.balance(BalanceType::Allowed, &user, "TOK"), amount);
    }

    #[test]
    fn test_cancel_refunds_source() {
        let mut tok = Channel::open("tok");
        let alice = Signer::new(1);
        open(&mut tok, &alice);

        tok.as_robot();
        assert!(tok.invoke("d1", "cancelCCTransferFrom", &["t1".to_string()]).is_ok());
        assert_eq!(tok.tokens(&alice.address()), U256::from(25u64));
        assert_eq!(tok.balance(BalanceType::Given, "USD", ""), U256::zero());
    }

    #[test]
    fn test_target_accepts_hex_protobuf() {
        use prost::Message;

        let mut tok = Channel::open("tok");
        let mut usd = Channel::open("usd");
        let alice = Signer::new(1);
        let source: CCTransfer = serde_json::from_str(&open(&mut tok, &alice)).unwrap();

        let resp = usd.robot_call("c1", "createCCTransferTo", &source);
        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(resp.payload, b"t1".to_vec());
        let again = hex::encode(source.encode_to_vec());
        let resp = usd.invoke("c2", "createCCTransferTo", &[again]);
        assert_eq!(resp.message, "transfer already exists");
    }

    #[test]
    fn test_user_cannot_commit() {
        let mut tok = Channel::open("tok");
        let alice = Signer::new(1);
        open(&mut tok, &alice);

        tok.as_user();
        let resp = tok.invoke("e1", "commitCCTransferFrom", &["t1".to_string()]);
        assert_eq!(resp.message, "unauthorized");
    }
}
