//! # ACL Calls
//!
//! Thin wrappers over `invoke_chaincode` to the ACL chaincode. Payloads are
//! protobuf; a non-200 answer becomes [`AuthError::UnknownSigner`].

use prost::Message;
use tracing::debug;

use shared_types::acl::{
    acl_args, ACL_CHAINCODE, ACL_CHANNEL, CHECK_ADDRESS, CHECK_KEYS, GET_ACCOUNT_INFO,
    GET_ACCOUNT_OPERATION_RIGHT, KEY_SEPARATOR,
};
use shared_types::proto::{AccountInfo, AclResponse, AddressProto, HaveRight};
use shared_types::{Address, ChaincodeStub};

use crate::domain::AuthError;

fn call<M: Message + Default>(
    stub: &mut dyn ChaincodeStub,
    method: &str,
    params: &[&str],
) -> Result<M, AuthError> {
    let response = stub.invoke_chaincode(ACL_CHAINCODE, &acl_args(method, params), ACL_CHANNEL);
    if !response.is_ok() {
        debug!(method, status = response.status, "acl rejected call");
        return Err(AuthError::UnknownSigner(response.message));
    }
    M::decode(response.payload.as_slice()).map_err(|e| AuthError::Acl(e.to_string()))
}

/// Resolve a key set to its address, policy, key types and account flags.
pub fn check_keys<S: AsRef<str>>(
    stub: &mut dyn ChaincodeStub,
    public_keys: &[S],
) -> Result<AclResponse, AuthError> {
    let joined = public_keys
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(KEY_SEPARATOR);
    call(stub, CHECK_KEYS, &[&joined])
}

/// ACL record of `address`.
pub fn check_address(stub: &mut dyn ChaincodeStub, address: &Address) -> Result<AddressProto, AuthError> {
    call(stub, CHECK_ADDRESS, &[&address.to_base58()])
}

/// KYC and list flags of `address`.
pub fn account_info(stub: &mut dyn ChaincodeStub, address: &Address) -> Result<AccountInfo, AuthError> {
    call(stub, GET_ACCOUNT_INFO, &[&address.to_base58()])
}

/// Whether `address` holds `role` for `operation` on `channel`/`chaincode`.
pub fn operation_right(
    stub: &mut dyn ChaincodeStub,
    channel: &str,
    chaincode: &str,
    role: &str,
    operation: &str,
    address: &Address,
) -> Result<bool, AuthError> {
    let right: HaveRight = call(
        stub,
        GET_ACCOUNT_OPERATION_RIGHT,
        &[channel, chaincode, role, operation, &address.to_base58()],
    )?;
    Ok(right.have_right)
}
