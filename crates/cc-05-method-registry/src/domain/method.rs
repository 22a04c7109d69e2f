//! # Methods
//!
//! A [`Method`] binds an external name to a handler, its execution kind,
//! whether it needs an authenticated sender, and the decoders of its
//! parameters. Handlers receive an explicit [`Context`].

use std::fmt;
use std::sync::Arc;

use shared_types::proto::CarrierEntry;
use shared_types::{ChaincodeStub, Config, ContractError, Sender, Timestamp};

use super::decoder::{decode_arg, ParamDecoder};
use super::errors::RegistryError;
use super::value::Args;

/// How the dispatcher runs a method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Recorded as a preimage, executed later inside `batchExecute`.
    Batched,
    /// Executed at once against the ledger.
    Immediate,
    /// Executed against a write-masking stub.
    Query,
}

/// Per-invocation state handed to a handler.
pub struct Context<'a> {
    /// Ledger, transaction cache or query stub.
    pub stub: &'a mut dyn ChaincodeStub,
    pub config: &'a Config,
    /// Authenticated caller, for methods that require one.
    pub sender: Option<Sender>,
    pub tx_id: String,
    pub timestamp: Timestamp,
    /// Propagated trace context.
    pub trace: Vec<CarrierEntry>,
}

impl<'a> Context<'a> {
    /// Context carrying the stub's own tx id and timestamp.
    pub fn new(stub: &'a mut dyn ChaincodeStub, config: &'a Config, sender: Option<Sender>) -> Self {
        let tx_id = stub.tx_id();
        let timestamp = stub.tx_timestamp();
        Self {
            stub,
            config,
            sender,
            tx_id,
            timestamp,
            trace: Vec::new(),
        }
    }

    pub fn with_trace(mut self, trace: Vec<CarrierEntry>) -> Self {
        self.trace = trace;
        self
    }

    /// The authenticated caller.
    pub fn sender(&self) -> Result<&Sender, ContractError> {
        self.sender
            .as_ref()
            .ok_or_else(|| ContractError::Unauthorized("sender required".into()))
    }
}

/// Method body.
pub type Handler =
    Arc<dyn Fn(&mut Context<'_>, &Args) -> Result<Vec<u8>, ContractError> + Send + Sync>;

/// A registered method.
#[derive(Clone)]
pub struct Method {
    name: String,
    kind: MethodKind,
    auth: bool,
    params: Vec<Arc<dyn ParamDecoder>>,
    handler: Handler,
}

impl Method {
    pub fn new<F>(name: impl Into<String>, kind: MethodKind, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Args) -> Result<Vec<u8>, ContractError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind,
            auth: false,
            params: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn batched<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Args) -> Result<Vec<u8>, ContractError> + Send + Sync + 'static,
    {
        Self::new(name, MethodKind::Batched, handler)
    }

    pub fn immediate<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Args) -> Result<Vec<u8>, ContractError> + Send + Sync + 'static,
    {
        Self::new(name, MethodKind::Immediate, handler)
    }

    pub fn query<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Context<'_>, &Args) -> Result<Vec<u8>, ContractError> + Send + Sync + 'static,
    {
        Self::new(name, MethodKind::Query, handler)
    }

    /// Require an authenticated sender.
    pub fn with_auth(mut self) -> Self {
        self.auth = true;
        self
    }

    /// Append a parameter.
    pub fn param<D: ParamDecoder + 'static>(mut self, decoder: D) -> Self {
        self.params.push(Arc::new(decoder));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    pub fn requires_auth(&self) -> bool {
        self.auth
    }

    /// Number of user arguments.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Decode the user arguments.
    pub fn decode_args<S: AsRef<str>>(&self, raw: &[S]) -> Result<Args, RegistryError> {
        if raw.len() != self.params.len() {
            return Err(RegistryError::ArgCount {
                got: raw.len(),
                expected: self.params.len(),
            });
        }
        self.params
            .iter()
            .zip(raw)
            .map(|(decoder, arg)| decode_arg(decoder.as_ref(), arg.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Args::new)
    }

    /// Run the handler.
    pub fn call(&self, ctx: &mut Context<'_>, args: &Args) -> Result<Vec<u8>, ContractError> {
        (self.handler)(ctx, args)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("auth", &self.auth)
            .field(
                "params",
                &self.params.iter().map(|p| p.type_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
