//! # Batch Engine
//!
//! Runs recorded preimages and signed task lists inside a [`BatchCache`],
//! one [`TxCache`] per transaction, and aggregates the results.

use std::backtrace::Backtrace;
use std::panic::{catch_unwind, AssertUnwindSafe};

use prost::Message;
use tracing::{debug, error, info, instrument, warn};

use cc_01_state_cache::{BatchCache, TxCache};
use cc_02_nonce::load_history;
use cc_04_atomic_swap::{SwapError, SwapService};
use cc_06_authenticator::Authenticator;
use shared_types::proto::{
    AddressProto, Batch, BatchEvent, BatchResponse, ExecuteTasksRequest, MultiSwap, PendingTx,
    Swap,
};
use shared_types::{ChaincodeStub, ContractConfig, ContractError, Sender, Timestamp};

use crate::domain::{
    created_swaps, decode_preimage, invariant_nonce_accepted, invariant_not_expired,
    panic_message, preimage_key, preimage_sender, swap_response, trace_carrier, BatchError,
    TxOutcome,
};
use crate::ports::BatchedMethodInvoker;

/// Event carrying the [`BatchEvent`] of `batchExecute`.
pub const BATCH_EXECUTE_EVENT: &str = "batchExecute";
/// Event carrying the [`BatchEvent`] of `executeTasks`.
pub const EXECUTE_TASKS_EVENT: &str = "executeTasks";

/// Two-phase execution engine.
#[derive(Clone, Debug)]
pub struct BatchEngine {
    swaps: SwapService,
    authenticator: Authenticator,
    tx_ttl: u32,
}

impl BatchEngine {
    /// `tx_ttl` in seconds; zero disables preimage expiry.
    pub fn new(swaps: SwapService, authenticator: Authenticator, tx_ttl: u32) -> Self {
        Self {
            swaps,
            authenticator,
            tx_ttl,
        }
    }

    pub fn from_config(config: &ContractConfig, authenticator: Authenticator) -> Self {
        Self::new(
            SwapService::from_options(&config.options),
            authenticator,
            config.tx_ttl,
        )
    }

    // =========================================================================
    // PHASE 1
    // =========================================================================

    /// Record a batched call under the current tx id. Nothing else runs.
    #[instrument(skip(self, stub, sender, args), fields(tx_id = %stub.tx_id()))]
    pub fn save_preimage(
        &self,
        stub: &mut dyn ChaincodeStub,
        method: &str,
        sender: Option<&Sender>,
        args: &[String],
        nonce: u64,
    ) -> Result<(), BatchError> {
        let pending = PendingTx {
            method: method.to_string(),
            sender: sender.map(|s| AddressProto::from(*s.address())),
            args: args.to_vec(),
            timestamp: stub.tx_timestamp().seconds,
            nonce,
            telemetry_carrier: trace_carrier(&stub.transient()?),
        };
        stub.put_state(&preimage_key(&stub.tx_id())?, pending.encode_to_vec())?;
        debug!("preimage stored");
        Ok(())
    }

    // =========================================================================
    // PHASE 2
    // =========================================================================

    /// `batchExecute`: run every preimage of `batch`, then the swap answers
    /// and keys, and commit everything at once.
    #[instrument(
        skip_all,
        fields(
            txs = batch.tx_ids.len(),
            swaps = batch.swaps.len() + batch.multi_swaps.len(),
            keys = batch.keys.len() + batch.multi_swap_keys.len()
        )
    )]
    pub fn batch_execute(
        &self,
        stub: &mut dyn ChaincodeStub,
        invoker: &dyn BatchedMethodInvoker,
        batch: &Batch,
    ) -> Result<BatchResponse, BatchError> {
        let base = stub.tx_timestamp();
        let batch_tx_id = stub.tx_id();
        let mut cache = BatchCache::new(stub);
        let mut response = BatchResponse::default();
        let mut event = BatchEvent::default();

        for (i, raw_id) in batch.tx_ids.iter().enumerate() {
            let tx_id = hex::encode(raw_id);
            let timestamp = sibling_timestamp(base, i);
            let (method, outcome) = self.execute_pending(&mut cache, invoker, &tx_id, timestamp);
            collect(&mut response, &mut event, raw_id, &method, outcome);
        }

        for swap in &batch.swaps {
            let result = swap_step(&mut cache, &batch_tx_id, base, |tx| {
                self.swaps.answer::<Swap>(tx, swap.clone())
            });
            response.swap_responses.push(swap_response(&swap.id, &result));
        }
        for key in &batch.keys {
            let result = swap_step(&mut cache, &batch_tx_id, base, |tx| {
                self.swaps.robot_done::<Swap>(tx, &key.id, &key.key)
            });
            response.swap_key_responses.push(swap_response(&key.id, &result));
        }
        for swap in &batch.multi_swaps {
            let result = swap_step(&mut cache, &batch_tx_id, base, |tx| {
                self.swaps.answer::<MultiSwap>(tx, swap.clone())
            });
            response.multi_swap_responses.push(swap_response(&swap.id, &result));
        }
        for key in &batch.multi_swap_keys {
            let result = swap_step(&mut cache, &batch_tx_id, base, |tx| {
                self.swaps.robot_done::<MultiSwap>(tx, &key.id, &key.key)
            });
            response
                .multi_swap_key_responses
                .push(swap_response(&key.id, &result));
        }

        cache.set_event(BATCH_EXECUTE_EVENT, event.encode_to_vec())?;
        cache.commit()?;
        info!(
            failed = response.tx_responses.iter().filter(|r| r.error.is_some()).count(),
            "batch executed"
        );
        Ok(response)
    }

    /// `executeTasks`: authenticate and run fully signed invocations, each in
    /// its own transaction cache. Task failures never abort the request.
    #[instrument(skip_all, fields(tasks = request.tasks.len()))]
    pub fn execute_tasks(
        &self,
        stub: &mut dyn ChaincodeStub,
        invoker: &dyn BatchedMethodInvoker,
        request: &ExecuteTasksRequest,
    ) -> Result<BatchResponse, BatchError> {
        let base = stub.tx_timestamp();
        let trace = trace_carrier(&stub.transient()?);
        let mut cache = BatchCache::new(stub);
        let mut response = BatchResponse::default();
        let mut event = BatchEvent::default();

        for (i, task) in request.tasks.iter().enumerate() {
            let timestamp = sibling_timestamp(base, i);
            let outcome = match invoker.batched_method(&task.method) {
                Err(e) => TxOutcome::Failed(e.into()),
                Ok(signature) => run_in_tx(&mut cache, &task.id, timestamp, |tx| {
                    let (sender, args) = if signature.requires_auth {
                        let auth = self.authenticator.authenticate(
                            tx,
                            &task.method,
                            &task.args,
                            signature.arity,
                        )?;
                        (Some(auth.sender), auth.args)
                    } else {
                        (None, task.args.clone())
                    };
                    invoker.invoke_batched(tx, &task.method, sender, &args, trace.clone())
                }),
            };
            collect(&mut response, &mut event, task.id.as_bytes(), &task.method, outcome);
        }

        cache.set_event(EXECUTE_TASKS_EVENT, event.encode_to_vec())?;
        cache.commit()?;
        info!("tasks executed");
        Ok(response)
    }

    /// Load, delete and run one preimage. Returns the method name (empty when
    /// the preimage could not be read) and the outcome.
    fn execute_pending(
        &self,
        cache: &mut BatchCache<'_>,
        invoker: &dyn BatchedMethodInvoker,
        tx_id: &str,
        timestamp: Timestamp,
    ) -> (String, TxOutcome) {
        let pending = match take_preimage(cache, tx_id) {
            Ok(pending) => pending,
            Err(e) => {
                warn!(tx_id, error = %e, "preimage not loaded");
                return (String::new(), TxOutcome::Failed(e));
            }
        };
        let outcome = match self.prepare(cache, invoker, tx_id, &pending, timestamp) {
            Ok(sender) => run_in_tx(cache, tx_id, timestamp, |tx| {
                invoker.invoke_batched(
                    tx,
                    &pending.method,
                    sender,
                    &pending.args,
                    pending.telemetry_carrier.clone(),
                )
            }),
            Err(e) => {
                warn!(tx_id, method = %pending.method, error = %e, "preimage rejected");
                TxOutcome::Failed(e)
            }
        };
        (pending.method, outcome)
    }

    /// Re-check a loaded preimage before running it.
    fn prepare(
        &self,
        cache: &mut BatchCache<'_>,
        invoker: &dyn BatchedMethodInvoker,
        tx_id: &str,
        pending: &PendingTx,
        timestamp: Timestamp,
    ) -> Result<Option<Sender>, BatchError> {
        invariant_not_expired(tx_id, pending, timestamp.seconds, self.tx_ttl)?;
        invoker.batched_method(&pending.method)?;
        let sender = preimage_sender(pending)?;
        if let Some(address) = &sender {
            let history = load_history(cache, address).map_err(ContractError::from)?;
            invariant_nonce_accepted(pending.nonce, &history)?;
        }
        Ok(sender.map(Sender::new))
    }
}

/// Decode the `batchExecute` argument.
pub fn decode_batch(raw: &[u8]) -> Result<Batch, BatchError> {
    Batch::decode(raw).map_err(|e| BatchError::Decode(e.to_string()))
}

/// Decode the `executeTasks` argument.
pub fn decode_tasks(raw: &[u8]) -> Result<ExecuteTasksRequest, BatchError> {
    ExecuteTasksRequest::decode(raw).map_err(|e| BatchError::Decode(e.to_string()))
}

/// Siblings share the batch seconds and get strictly increasing nanos.
fn sibling_timestamp(base: Timestamp, index: usize) -> Timestamp {
    Timestamp::new(base.seconds, base.nanos + index as i64)
}

/// Read and delete the preimage of `tx_id`. The delete happens even when the
/// preimage is missing or malformed.
fn take_preimage(cache: &mut BatchCache<'_>, tx_id: &str) -> Result<PendingTx, BatchError> {
    let key = preimage_key(tx_id)?;
    let raw = cache.get_state(&key)?;
    cache.del_state(&key)?;
    match raw {
        None => Err(BatchError::PreimageNotFound(tx_id.to_string())),
        Some(raw) => decode_preimage(&raw),
    }
}

/// Run `f` in a fresh transaction cache; commit into `cache` on success.
fn run_in_tx<F>(cache: &mut BatchCache<'_>, tx_id: &str, timestamp: Timestamp, f: F) -> TxOutcome
where
    F: FnOnce(&mut dyn ChaincodeStub) -> Result<Vec<u8>, ContractError>,
{
    let mut tx = TxCache::new(cache, tx_id.to_string(), timestamp);
    match catch_unwind(AssertUnwindSafe(|| f(&mut tx))) {
        Ok(Ok(result)) => match tx.commit() {
            Ok(commit) => TxOutcome::Committed { result, commit },
            Err(e) => TxOutcome::Failed(e.into()),
        },
        Ok(Err(e)) => {
            debug!(tx_id, error = %e, "transaction failed");
            TxOutcome::Failed(BatchError::Contract(e))
        }
        Err(payload) => {
            error!(
                tx_id,
                panic = %panic_message(payload.as_ref()),
                backtrace = %Backtrace::force_capture(),
                "panic in batched transaction"
            );
            TxOutcome::Failed(BatchError::Panic)
        }
    }
}

/// Run one swap answer or key in its own transaction cache.
fn swap_step<T, F>(
    cache: &mut BatchCache<'_>,
    tx_id: &str,
    timestamp: Timestamp,
    f: F,
) -> Result<T, BatchError>
where
    F: FnOnce(&mut dyn ChaincodeStub) -> Result<T, SwapError>,
{
    let mut tx = TxCache::new(cache, tx_id.to_string(), timestamp);
    let value = f(&mut tx).map_err(|e| BatchError::Contract(e.into()))?;
    tx.commit()?;
    Ok(value)
}

fn collect(
    response: &mut BatchResponse,
    event: &mut BatchEvent,
    id: &[u8],
    method: &str,
    outcome: TxOutcome,
) {
    if let TxOutcome::Committed { commit, .. } = &outcome {
        let (swaps, multi) = created_swaps(&commit.writes);
        response.created_swaps.extend(swaps);
        response.created_multi_swaps.extend(multi);
    }
    response.tx_responses.push(outcome.to_response(id, method));
    event.events.push(outcome.to_event(id, method));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MethodSignature;
    use cc_01_state_cache::balance::{self, BalanceType};
    use cc_01_state_cache::MockLedger;
    use cc_02_nonce::NonceService;
    use shared_crypto::{sha3_256, Ed25519KeyPair};
    use shared_types::acl::ACL_CHAINCODE;
    use shared_types::keys::create_composite_key;
    use shared_types::proto::{
        AclResponse, CarrierEntry, SignedAddress, SwapKey, Task,
    };
    use shared_types::{amount_to_bytes, Address, Response, U256};

    const NONCE: u64 = 1_700_000_000_000;

    /// `credit(amount)` mints to the sender, `boom` panics, `fail` errors.
    struct Methods;

    impl BatchedMethodInvoker for Methods {
        fn batched_method(&self, name: &str) -> Result<MethodSignature, ContractError> {
            match name {
                "credit" => Ok(MethodSignature {
                    requires_auth: true,
                    arity: 1,
                }),
                "boom" | "fail" => Ok(MethodSignature {
                    requires_auth: false,
                    arity: 0,
                }),
                _ => Err(ContractError::Invocation("method not found".into())),
            }
        }

        fn invoke_batched(
            &self,
            stub: &mut dyn ChaincodeStub,
            name: &str,
            sender: Option<Sender>,
            args: &[String],
            _trace: Vec<CarrierEntry>,
        ) -> Result<Vec<u8>, ContractError> {
            match name {
                "credit" => {
                    let sender = sender
                        .ok_or_else(|| ContractError::Unauthorized("sender required".into()))?;
                    let amount = U256::from_dec_str(&args[0])
                        .map_err(|e| ContractError::InvalidArgument(e.to_string()))?;
                    balance::add(
                        stub,
                        BalanceType::Token,
                        &sender.address().to_base58(),
                        "TOK",
                        &amount,
                        "credit",
                    )?;
                    stub.set_event("credited", args[0].clone().into_bytes())?;
                    Ok(b"ok".to_vec())
                }
                "boom" => panic!("boom"),
                _ => Err(ContractError::business("failed on purpose")),
            }
        }
    }

    fn engine() -> BatchEngine {
        BatchEngine::new(SwapService::default(), Authenticator::default(), 0)
    }

    fn alice() -> Address {
        Address::new([7u8; 32])
    }

    fn token_balance(ledger: &mut MockLedger, address: &Address) -> U256 {
        let mut out = U256::zero();
        ledger.execute_ok("ff00", |l| {
            out = balance::get_balance(l, BalanceType::Token, &address.to_base58(), "TOK").unwrap();
        });
        out
    }

    fn store_preimage(ledger: &mut MockLedger, tx_id: &str, method: &str, args: &[&str]) {
        let engine = engine();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        ledger.execute_ok(tx_id, |l| {
            let sender = Sender::new(alice());
            let with_sender = method == "credit";
            if with_sender {
                NonceService::new(10)
                    .check_and_store(l, &alice(), NONCE + tx_id.len() as u64)
                    .unwrap();
            }
            engine
                .save_preimage(
                    l,
                    method,
                    with_sender.then_some(&sender),
                    &args,
                    NONCE + tx_id.len() as u64,
                )
                .unwrap();
        });
    }

    fn run_batch(ledger: &mut MockLedger, batch: &Batch) -> BatchResponse {
        let mut out = None;
        ledger.execute_ok("bb00", |l| out = Some(engine().batch_execute(l, &Methods, batch)));
        out.unwrap().unwrap()
    }

    #[test]
    fn test_preimage_then_execute() {
        let mut ledger = MockLedger::new("ch", "cc");
        store_preimage(&mut ledger, "aa01", "credit", &["100"]);
        let key = preimage_key("aa01").unwrap();
        assert!(ledger.state(&key).is_some());
        assert!(token_balance(&mut ledger, &alice()).is_zero());

        let batch = Batch {
            tx_ids: vec![hex::decode("aa01").unwrap()],
            ..Default::default()
        };
        let response = run_batch(&mut ledger, &batch);

        assert!(ledger.state(&key).is_none());
        assert_eq!(token_balance(&mut ledger, &alice()), U256::from(100u64));
        let tx = &response.tx_responses[0];
        assert_eq!(tx.method, "credit");
        assert!(tx.error.is_none());
        assert!(tx.writes.windows(2).all(|w| w[0].key < w[1].key));

        let (name, payload) = ledger.last_event().unwrap();
        assert_eq!(name, BATCH_EXECUTE_EVENT);
        let event = BatchEvent::decode(payload.as_slice()).unwrap();
        assert_eq!(event.events.len(), 1);
        assert!(!event.events[0].accounting.is_empty());
        assert_eq!(event.events[0].events[0].name, "credited");
        assert_eq!(event.events[0].result, b"ok".to_vec());
    }

    #[test]
    fn test_missing_preimage_does_not_stop_batch() {
        let mut ledger = MockLedger::new("ch", "cc");
        store_preimage(&mut ledger, "aa0102", "credit", &["5"]);
        let batch = Batch {
            tx_ids: vec![vec![0xde, 0xad], hex::decode("aa0102").unwrap()],
            ..Default::default()
        };
        let response = run_batch(&mut ledger, &batch);
        assert_eq!(
            response.tx_responses[0].error.as_ref().unwrap().error,
            "function and args loading error: transaction dead not found"
        );
        assert_eq!(response.tx_responses[0].id, vec![0xde, 0xad]);
        assert!(response.tx_responses[1].error.is_none());

        // Replaying the consumed tx id.
        let response = run_batch(&mut ledger, &Batch {
            tx_ids: vec![hex::decode("aa0102").unwrap()],
            ..Default::default()
        });
        assert_eq!(
            response.tx_responses[0].error.as_ref().unwrap().error,
            "function and args loading error: transaction aa0102 not found"
        );
    }

    #[test]
    fn test_malformed_preimage_is_deleted() {
        let mut ledger = MockLedger::new("ch", "cc");
        let key = preimage_key("cc03").unwrap();
        ledger.seed(&key, vec![0xff, 0xff, 0xff]);
        let response = run_batch(&mut ledger, &Batch {
            tx_ids: vec![hex::decode("cc03").unwrap()],
            ..Default::default()
        });
        let err = response.tx_responses[0].error.as_ref().unwrap();
        assert!(err.error.starts_with("function and args loading error: "));
        assert!(ledger.state(&key).is_none());
    }

    #[test]
    fn test_panic_is_contained() {
        let mut ledger = MockLedger::new("ch", "cc");
        store_preimage(&mut ledger, "0b01", "boom", &[]);
        store_preimage(&mut ledger, "0b0202", "credit", &["7"]);
        store_preimage(&mut ledger, "0b030303", "fail", &[]);
        let batch = Batch {
            tx_ids: ["0b01", "0b0202", "0b030303"]
                .iter()
                .map(|id| hex::decode(id).unwrap())
                .collect(),
            ..Default::default()
        };
        let response = run_batch(&mut ledger, &batch);
        let errors: Vec<Option<String>> = response
            .tx_responses
            .iter()
            .map(|r| r.error.as_ref().map(|e| e.error.clone()))
            .collect();
        assert_eq!(
            errors,
            vec![
                Some("panic batchedTxExecute".to_string()),
                None,
                Some("failed on purpose".to_string())
            ]
        );
        assert_eq!(token_balance(&mut ledger, &alice()), U256::from(7u64));
    }

    #[test]
    fn test_expired_preimage() {
        let mut ledger = MockLedger::new("ch", "cc");
        store_preimage(&mut ledger, "ee01", "credit", &["1"]);
        ledger.set_timestamp(Timestamp::new(1_700_000_100, 0));
        let engine = BatchEngine::new(SwapService::default(), Authenticator::default(), 60);
        let batch = Batch {
            tx_ids: vec![hex::decode("ee01").unwrap()],
            ..Default::default()
        };
        let mut out = None;
        ledger.execute_ok("bb01", |l| out = Some(engine.batch_execute(l, &Methods, &batch)));
        let response = out.unwrap().unwrap();
        assert_eq!(
            response.tx_responses[0].error.as_ref().unwrap().error,
            "function and args loading error: transaction ee01 expired"
        );
        assert!(ledger.state(&preimage_key("ee01").unwrap()).is_none());
    }

    #[test]
    fn test_swap_answer_and_duplicate() {
        let mut ledger = MockLedger::new("ch", "cc");
        let hash = sha3_256(b"secret");
        let swap = Swap {
            id: vec![0x5a, 0x01],
            creator: alice().as_bytes().to_vec(),
            owner: alice().as_bytes().to_vec(),
            token: "TOK".into(),
            amount: amount_to_bytes(&U256::from(3u64)),
            from: "TOK".into(),
            to: "CH".into(),
            hash: hash.to_vec(),
            timeout: 0,
        };
        let batch = Batch {
            swaps: vec![swap.clone(), swap.clone()],
            ..Default::default()
        };
        let response = run_batch(&mut ledger, &batch);
        assert!(response.swap_responses[0].error.is_none());
        assert_eq!(
            response.swap_responses[1].error.as_ref().unwrap().error,
            "swap already exists"
        );
        let key = create_composite_key(shared_types::keys::SWAP_PREFIX, &["5a01"]).unwrap();
        let stored = Swap::decode(ledger.state(&key).unwrap()).unwrap();
        assert_eq!(stored.creator, b"0000".to_vec());

        let response = run_batch(&mut ledger, &Batch {
            keys: vec![SwapKey {
                id: vec![0x5a, 0x01],
                key: "wrong".into(),
            }],
            ..Default::default()
        });
        assert_eq!(
            response.swap_key_responses[0].error.as_ref().unwrap().error,
            "incorrect key"
        );
    }

    #[test]
    fn test_execute_tasks_authenticates_each_task() {
        let mut ledger = MockLedger::new("ch", "cc");
        let kp = Ed25519KeyPair::from_seed([9u8; 32]);
        let signer = Address::from_public_keys(&[kp.public_key().as_bytes()]);
        ledger.register_chaincode(ACL_CHAINCODE, move |_, _| {
            let resp = AclResponse {
                address: Some(SignedAddress {
                    address: Some(AddressProto::from(signer)),
                    signature_policy: None,
                }),
                ..Default::default()
            };
            Response::success(resp.encode_to_vec())
        });
        let pk = bs58::encode(kp.public_key().as_bytes()).into_string();
        let signed = |amount: &str| {
            let mut args = vec![
                "req".to_string(),
                "cc".into(),
                "ch".into(),
                amount.to_string(),
                NONCE.to_string(),
                pk.clone(),
            ];
            let message = cc_06_authenticator::signing_message("credit", &args);
            args.push(bs58::encode(kp.sign(&sha3_256(&message)).as_bytes()).into_string());
            args
        };
        let request = ExecuteTasksRequest {
            tasks: vec![
                Task {
                    id: "t1".into(),
                    method: "credit".into(),
                    args: signed("4"),
                },
                Task {
                    id: "t2".into(),
                    method: "credit".into(),
                    args: signed("4"),
                },
                Task {
                    id: "t3".into(),
                    method: "unknown".into(),
                    args: vec![],
                },
            ],
        };

        let mut out = None;
        ledger.execute_ok("bb02", |l| out = Some(engine().execute_tasks(l, &Methods, &request)));
        let response = out.unwrap().unwrap();

        assert!(response.tx_responses[0].error.is_none());
        assert_eq!(
            response.tx_responses[1].error.as_ref().unwrap().error,
            format!("nonce {NONCE} already exists")
        );
        assert_eq!(
            response.tx_responses[2].error.as_ref().unwrap().error,
            "method not found"
        );
        assert_eq!(token_balance(&mut ledger, &signer), U256::from(4u64));
        assert_eq!(ledger.last_event().unwrap().0, EXECUTE_TASKS_EVENT);
    }
}
