//! Method table as seen by the batch engine.

use cc_05_method_registry::{Context, Method, MethodKind, MethodTable, RegistryError};
use cc_07_batch_engine::{BatchedMethodInvoker, MethodSignature};
use shared_types::proto::CarrierEntry;
use shared_types::{ChaincodeStub, Config, ContractError, Sender};

/// Batched methods of a table, filtered by the loaded configuration.
pub struct RegistryInvoker<'a> {
    table: &'a MethodTable,
    config: &'a Config,
}

impl<'a> RegistryInvoker<'a> {
    pub fn new(table: &'a MethodTable, config: &'a Config) -> Self {
        Self { table, config }
    }

    fn batched(&self, name: &str) -> Result<&'a Method, RegistryError> {
        let method = self.table.lookup(name, &self.config.contract.options)?;
        if method.kind() != MethodKind::Batched {
            return Err(RegistryError::MethodNotFound(name.to_string()));
        }
        Ok(method)
    }
}

impl BatchedMethodInvoker for RegistryInvoker<'_> {
    fn batched_method(&self, name: &str) -> Result<MethodSignature, ContractError> {
        let method = self.batched(name)?;
        Ok(MethodSignature {
            requires_auth: method.requires_auth(),
            arity: method.arity(),
        })
    }

    fn invoke_batched(
        &self,
        stub: &mut dyn ChaincodeStub,
        name: &str,
        sender: Option<Sender>,
        args: &[String],
        trace: Vec<CarrierEntry>,
    ) -> Result<Vec<u8>, ContractError> {
        let method = self.batched(name)?;
        let args = method.decode_args(args)?;
        let mut ctx = Context::new(stub, self.config, sender).with_trace(trace);
        method.call(&mut ctx, &args)
    }
}
