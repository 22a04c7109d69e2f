//! # Driven Ports (Outbound)
//!
//! The engine runs user methods without knowing the method table: the
//! dispatcher implements [`BatchedMethodInvoker`] over its registry.

use shared_types::proto::CarrierEntry;
use shared_types::{ChaincodeStub, ContractError, Sender};

/// Shape of a batched method as the engine needs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub requires_auth: bool,
    /// Number of user arguments.
    pub arity: usize,
}

/// Access to the batched methods of a contract.
pub trait BatchedMethodInvoker: Send + Sync {
    /// Signature of the enabled batched method `name`, or `method not found`.
    fn batched_method(&self, name: &str) -> Result<MethodSignature, ContractError>;

    /// Decode `args` and run the method against `stub`.
    fn invoke_batched(
        &self,
        stub: &mut dyn ChaincodeStub,
        name: &str,
        sender: Option<Sender>,
        args: &[String],
        trace: Vec<CarrierEntry>,
    ) -> Result<Vec<u8>, ContractError>;
}
