//! # Atomic Swap Round Trip
//!
//! ```text
//! channel TOK (origin)                  channel USD (responder)
//! ────────────────────                  ───────────────────────
//! swapBegin (user, batched)
//! batchExecute ─── swap record ───────▶ batchExecute { swaps }
//!                                       swapDone (user reveals key)
//! batchExecute { keys } ◀── key event ─
//! ```

#[cfg(test)]
mod tests {
    use prost::Message;

    use cc_01_state_cache::balance::BalanceType;
    use cc_04_atomic_swap::{swap_key, ROBOT_CREATOR};
    use shared_crypto::sha3_256;
    use shared_types::proto::{Batch, Swap, SwapKey};
    use shared_types::U256;

    use crate::fixtures::{Channel, Signer, NONCE};

    const SWAP_TX: &str = "5a01";

    fn stored_swap(channel: &Channel) -> Option<Swap> {
        let key = swap_key::<Swap>(SWAP_TX).unwrap();
        channel
            .ledger
            .state(&key)
            .map(|raw| Swap::decode(raw).unwrap())
    }

    /// Opens a 50 TOK swap towards USD and returns the origin record.
    fn begin(tok: &mut Channel, alice: &Signer) -> Swap {
        tok.mint(&alice.address(), 80);
        let hash = hex::encode(sha3_256(b"s"));
        let resp = tok.submit(SWAP_TX, alice, "swapBegin", &["TOK", "USD", "50", &hash], NONCE);
        assert!(resp.is_ok(), "{}", resp.message);
        let response = tok.batch_txs("b1", &[SWAP_TX]);
        assert!(response.tx_responses[0].error.is_none());
        stored_swap(tok).unwrap()
    }

    #[test]
    fn test_forward_swap_full_cycle() {
        let mut tok = Channel::open("tok");
        let mut usd = Channel::open("usd");
        let alice = Signer::new(1);
        let owner = alice.address().to_base58();

        // Origin: value leaves the user.
        let swap = begin(&mut tok, &alice);
        assert_eq!(tok.tokens(&alice.address()), U256::from(30u64));
        assert_eq!(swap.from, "TOK");
        assert_eq!(swap.to, "USD");
        assert_eq!(swap.hash, sha3_256(b"s").to_vec());

        // Responder: driver answers.
        let response = usd.batch(
            "c1",
            &Batch {
                swaps: vec![swap.clone()],
                ..Default::default()
            },
        );
        assert!(response.swap_responses[0].error.is_none());
        let answered = stored_swap(&usd).unwrap();
        assert_eq!(answered.creator, ROBOT_CREATOR.to_vec());
        assert_eq!(answered.timeout, 1_700_000_000 + 300);

        // Responder: owner reveals the key.
        usd.as_user();
        let resp = usd.invoke("c2", "swapDone", &[SWAP_TX.to_string(), "s".to_string()]);
        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(usd.balance(BalanceType::Allowed, &owner, "TOK"), U256::from(50u64));
        assert!(stored_swap(&usd).is_none());
        let (name, payload) = usd.ledger.last_event().unwrap();
        assert_eq!(name, "swapKey");
        assert_eq!(payload, &format!("TOK\t{SWAP_TX}\ts").into_bytes());

        // Origin: driver closes with the revealed key.
        let response = tok.batch(
            "b2",
            &Batch {
                keys: vec![SwapKey {
                    id: hex::decode(SWAP_TX).unwrap(),
                    key: "s".into(),
                }],
                ..Default::default()
            },
        );
        assert!(response.swap_key_responses[0].error.is_none());
        assert_eq!(tok.balance(BalanceType::Given, "USD", ""), U256::from(50u64));
        assert!(stored_swap(&tok).is_none());
    }

    #[test]
    fn test_wrong_key_keeps_swap() {
        let mut tok = Channel::open("tok");
        let mut usd = Channel::open("usd");
        let alice = Signer::new(1);
        let swap = begin(&mut tok, &alice);
        usd.batch(
            "c1",
            &Batch {
                swaps: vec![swap],
                ..Default::default()
            },
        );

        usd.as_user();
        let resp = usd.invoke("c2", "swapDone", &[SWAP_TX.to_string(), "t".to_string()]);
        assert_eq!(resp.message, "incorrect key");
        assert!(stored_swap(&usd).is_some());
    }

    #[test]
    fn test_swap_get_returns_record() {
        let mut tok = Channel::open("tok");
        let alice = Signer::new(1);
        let swap = begin(&mut tok, &alice);

        tok.as_user();
        let resp = tok.invoke("d1", "swapGet", &[SWAP_TX.to_string()]);
        assert!(resp.is_ok(), "{}", resp.message);
        assert_eq!(Swap::decode(resp.payload.as_slice()).unwrap(), swap);
    }

    #[test]
    fn test_disabled_swaps_hide_swap_methods() {
        let mut tok = Channel::open("tok");
        let config = format!(
            r#"{{"contract":{{"symbol":"TOK","robotSKI":"{}","options":{{"disableSwaps":true}}}}}}"#,
            hex::encode(crate::fixtures::ROBOT_SKI)
        );
        let chaincode = tok.chaincode.clone();
        assert!(tok.ledger.execute("01", &config, Vec::new(), |l| chaincode.init(l)).is_ok());

        tok.as_user();
        for method in ["swapBegin", "swapGet", "swapDone"] {
            let resp = tok.invoke("d2", method, &[String::new(), String::new()]);
            assert_eq!(resp.message, "method not found", "{method}");
        }
    }
}
