//! # Shared Chaincode
//!
//! One immutable [`cc_08_dispatcher::Chaincode`] serves many invocations at
//! once; each thread drives its own ledger.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use parking_lot::Mutex;
    use primitive_types::U256;

    use cc_08_dispatcher::Chaincode;

    use crate::fixtures::{Channel, Signer, TokenContract, NONCE};

    const THREADS: u8 = 8;
    const CALLS: u64 = 5;

    #[test]
    fn test_parallel_invocations_share_one_chaincode() {
        let chaincode = Chaincode::new(TokenContract).unwrap();
        let results = Arc::new(Mutex::new(Vec::new()));

        thread::scope(|scope| {
            for seed in 1..=THREADS {
                let chaincode = chaincode.clone();
                let results = Arc::clone(&results);
                scope.spawn(move || {
                    let mut channel = Channel::with_chaincode("tok", chaincode);
                    let alice = Signer::new(seed);
                    let bob = Signer::new(seed + 100);
                    let to = bob.address().to_base58();
                    channel.mint(&alice.address(), 100);

                    let mut pending = Vec::new();
                    for i in 0..CALLS {
                        let tx = format!("{seed:02x}{i:02x}");
                        let resp = channel.submit(&tx, &alice, "transfer", &[&to, "3"], NONCE + i);
                        assert!(resp.is_ok(), "{}", resp.message);
                        pending.push(tx);
                    }
                    let ids: Vec<&str> = pending.iter().map(String::as_str).collect();
                    channel.batch_txs("ff00", &ids);

                    results.lock().push((seed, channel.tokens(&bob.address())));
                });
            }
        });

        let results = results.lock();
        assert_eq!(results.len(), usize::from(THREADS));
        for (seed, received) in results.iter() {
            assert_eq!(*received, U256::from(3 * CALLS), "signer {seed}");
        }
    }

    #[test]
    fn test_method_table_is_shared() {
        let chaincode = Chaincode::new(TokenContract).unwrap();
        let copy = chaincode.clone();
        assert!(std::ptr::eq(chaincode.methods(), copy.methods()));
        assert!(copy.methods().get("transfer").is_some());
    }
}
