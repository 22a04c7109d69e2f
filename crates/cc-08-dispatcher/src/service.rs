//! # Chaincode Entry Point
//!
//! ```text
//! invoke(stub)
//!   │
//!   ├─ tx id is hex, creator has an SKI, config loads
//!   │
//!   ├─ reserved name? ──▶ robot check ──▶ batch / swap / transfer / index engine
//!   │
//!   └─ method table lookup (filters from config)
//!        ├─ batched    ──▶ authenticate ──▶ decode ──▶ store preimage
//!        ├─ immediate  ──▶ authenticate ──▶ decode ──▶ run on the ledger
//!        └─ query      ──▶ authenticate ──▶ decode ──▶ run on a QueryStub
//! ```
//!
//! Every failure becomes `Response{status: 500, message}`; the host discards
//! the transaction's writes.

use std::sync::Arc;

use prost::Message;
use tracing::{debug, info, instrument, warn};

use cc_01_state_cache::balance::BalanceType;
use cc_01_state_cache::{holder_index, QueryStub};
use cc_02_nonce::NonceService;
use cc_03_cross_channel::CrossChannelService;
use cc_04_atomic_swap::{SwapRecord, SwapService};
use cc_05_method_registry::{
    is_enabled, Context, Method, MethodKind, MethodTable, RegistryError,
};
use cc_06_authenticator::Authenticator;
use cc_07_batch_engine::{decode_batch, decode_tasks, trace_carrier, BatchEngine};
use shared_crypto::{GostVerifier, SignatureVerifier};
use shared_types::proto::{MultiSwap, Swap};
use shared_types::{ChaincodeStub, Config, ContractError, Response, Sender};

use crate::adapters::RegistryInvoker;
use crate::contract::{CompletedSwap, Contract};
use crate::domain::{
    invariant_hex_tx_id, invariant_robot, payload_bytes, DispatchError, SystemMethod,
};
use crate::methods::base_methods;

/// Who is calling and with which user arguments.
struct Caller {
    sender: Option<Sender>,
    args: Vec<String>,
    nonce: u64,
}

/// A chaincode: base methods, contract methods and the engines behind them.
///
/// Immutable after construction; one instance serves concurrent invocations.
#[derive(Clone)]
pub struct Chaincode {
    table: Arc<MethodTable>,
    contract: Arc<dyn Contract>,
    verifier: SignatureVerifier,
}

impl Chaincode {
    /// Build the method table from the base methods and `contract`'s own.
    pub fn new<C: Contract + 'static>(contract: C) -> Result<Self, RegistryError> {
        Self::from_arc(Arc::new(contract))
    }

    pub fn from_arc(contract: Arc<dyn Contract>) -> Result<Self, RegistryError> {
        let table = MethodTable::builder()
            .methods(base_methods())
            .methods(contract.methods())
            .build()?;
        info!(methods = table.len(), "method table built");
        Ok(Self {
            table: Arc::new(table),
            contract,
            verifier: SignatureVerifier::new(),
        })
    }

    /// Accept GOST signatures.
    pub fn with_gost(mut self, gost: Arc<dyn GostVerifier>) -> Self {
        self.verifier = self.verifier.with_gost(gost);
        self
    }

    pub fn methods(&self) -> &MethodTable {
        &self.table
    }

    // =========================================================================
    // HOST ENTRY POINTS
    // =========================================================================

    /// Validate and store the JSON configuration passed as the first
    /// argument (the function name slot, or the first parameter when that is
    /// empty).
    #[instrument(skip_all, fields(tx_id = %stub.tx_id()))]
    pub fn init(&self, stub: &mut dyn ChaincodeStub) -> Response {
        match self.store_config(stub) {
            Ok(config) => {
                info!(symbol = %config.symbol(), "config stored");
                Response::success(Vec::new())
            }
            Err(e) => {
                warn!(error = %e, "init failed");
                Response::error(e.to_string())
            }
        }
    }

    /// Route one invocation.
    pub fn invoke(&self, stub: &mut dyn ChaincodeStub) -> Response {
        let (function, args) = stub.function_and_parameters();
        match self.dispatch(stub, &function, &args) {
            Ok(payload) => Response::success(payload),
            Err(e) => {
                warn!(method = %function, code = e.code(), error = %e, "invocation failed");
                Response::error(e.to_string())
            }
        }
    }

    fn store_config(&self, stub: &mut dyn ChaincodeStub) -> Result<Config, ContractError> {
        let (function, params) = stub.function_and_parameters();
        let raw = if function.is_empty() {
            params.into_iter().next().unwrap_or_default()
        } else {
            function
        };
        if raw.is_empty() {
            return Err(DispatchError::EmptyConfig.into());
        }
        let config = Config::from_json(raw.as_bytes())?;
        config.store(stub)?;
        Ok(config)
    }

    // =========================================================================
    // ROUTING
    // =========================================================================

    #[instrument(skip(self, stub, args), fields(tx_id = %stub.tx_id(), channel = %stub.channel_id()))]
    fn dispatch(
        &self,
        stub: &mut dyn ChaincodeStub,
        method: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        invariant_hex_tx_id(&stub.tx_id())?;
        let ski = stub.creator_ski().map_err(|_| DispatchError::NoCreatorSki)?;
        if ski.is_empty() {
            return Err(DispatchError::NoCreatorSki.into());
        }
        let config = Config::load(stub)?;

        if let Some(system) = SystemMethod::parse(method) {
            if !is_enabled(method, &config.contract.options) {
                return Err(RegistryError::MethodNotFound(method.to_string()).into());
            }
            system.check_args(args)?;
            if system.requires_robot() {
                invariant_robot(&ski, &stub.creator()?, &config.robot_ski()?)?;
            }
            return self.system(stub, &config, system, args);
        }

        let entry = self.table.lookup(method, &config.contract.options)?;
        match entry.kind() {
            MethodKind::Batched => self.record(stub, &config, entry, args),
            MethodKind::Immediate => self.run(stub, &config, entry, args),
            MethodKind::Query => {
                let mut view = QueryStub::new(stub);
                self.run(&mut view, &config, entry, args)
            }
        }
    }

    fn authenticator(&self, config: &Config) -> Authenticator {
        Authenticator::new(
            self.verifier.clone(),
            NonceService::new(config.contract.nonce_ttl),
        )
    }

    fn engine(&self, config: &Config) -> BatchEngine {
        BatchEngine::from_config(&config.contract, self.authenticator(config))
    }

    fn caller(
        &self,
        stub: &mut dyn ChaincodeStub,
        config: &Config,
        method: &Method,
        args: &[String],
    ) -> Result<Caller, ContractError> {
        if !method.requires_auth() {
            return Ok(Caller {
                sender: None,
                args: args.to_vec(),
                nonce: 0,
            });
        }
        let auth = self
            .authenticator(config)
            .authenticate(stub, method.name(), args, method.arity())?;
        debug!(sender = %auth.sender, request_id = %auth.request_id, "caller authenticated");
        Ok(Caller {
            sender: Some(auth.sender),
            args: auth.args,
            nonce: auth.nonce,
        })
    }

    /// Phase one of a batched call: validate and keep the preimage.
    fn record(
        &self,
        stub: &mut dyn ChaincodeStub,
        config: &Config,
        method: &Method,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let caller = self.caller(stub, config, method, args)?;
        method.decode_args(&caller.args)?;
        self.engine(config).save_preimage(
            stub,
            method.name(),
            caller.sender.as_ref(),
            &caller.args,
            caller.nonce,
        )?;
        Ok(Vec::new())
    }

    fn run(
        &self,
        stub: &mut dyn ChaincodeStub,
        config: &Config,
        method: &Method,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let caller = self.caller(stub, config, method, args)?;
        let decoded = method.decode_args(&caller.args)?;
        let trace = trace_carrier(&stub.transient()?);
        let mut ctx = Context::new(stub, config, caller.sender).with_trace(trace);
        method.call(&mut ctx, &decoded)
    }

    // =========================================================================
    // SYSTEM METHODS
    // =========================================================================

    fn system(
        &self,
        stub: &mut dyn ChaincodeStub,
        config: &Config,
        system: SystemMethod,
        args: &[String],
    ) -> Result<Vec<u8>, ContractError> {
        let transfers =
            CrossChannelService::new(config.contract.max_channel_transfer_items as usize);
        match system {
            SystemMethod::BatchExecute => {
                let batch = decode_batch(&payload_bytes(&args[0]))?;
                let invoker = RegistryInvoker::new(&self.table, config);
                let response = self.engine(config).batch_execute(stub, &invoker, &batch)?;
                Ok(response.encode_to_vec())
            }
            SystemMethod::ExecuteTasks => {
                let request = decode_tasks(&payload_bytes(&args[0]))?;
                let invoker = RegistryInvoker::new(&self.table, config);
                let response = self.engine(config).execute_tasks(stub, &invoker, &request)?;
                Ok(response.encode_to_vec())
            }
            SystemMethod::SwapDone => {
                self.swap_done::<Swap>(stub, config, &args[0], &args[1], CompletedSwap::Single)
            }
            SystemMethod::MultiSwapDone => self.swap_done::<MultiSwap>(
                stub,
                config,
                &args[0],
                &args[1],
                CompletedSwap::Multi,
            ),
            SystemMethod::CreateTransferTo => {
                let record = transfers.create_to(stub, &payload_bytes(&args[0]))?;
                Ok(record.id.into_bytes())
            }
            SystemMethod::DeleteTransferTo => {
                transfers.delete_to(stub, &args[0])?;
                Ok(Vec::new())
            }
            SystemMethod::CommitTransferFrom => {
                transfers.commit_from(stub, &args[0])?;
                Ok(Vec::new())
            }
            SystemMethod::CancelTransferFrom => {
                transfers.cancel_from(stub, &args[0])?;
                Ok(Vec::new())
            }
            SystemMethod::DeleteTransferFrom => {
                transfers.delete_from(stub, &args[0])?;
                Ok(Vec::new())
            }
            SystemMethod::CreateIndex => {
                let ty = BalanceType::parse(&args[0])
                    .ok_or_else(|| DispatchError::UnknownBalanceType(args[0].clone()))?;
                let written = holder_index::create_index(stub, ty)?;
                Ok(written.to_string().into_bytes())
            }
        }
    }

    /// Owner-side completion, then the contract callback in the same
    /// transaction.
    fn swap_done<R: SwapRecord>(
        &self,
        stub: &mut dyn ChaincodeStub,
        config: &Config,
        swap_id: &str,
        key: &str,
        wrap: fn(R) -> CompletedSwap,
    ) -> Result<Vec<u8>, ContractError> {
        let record = SwapService::from_options(&config.contract.options)
            .user_done::<R>(stub, swap_id, key)?;
        let completed = wrap(record);
        let mut ctx = Context::new(stub, config, None);
        self.contract.on_swap_done(&mut ctx, &completed)?;
        Ok(Vec::new())
    }
}
