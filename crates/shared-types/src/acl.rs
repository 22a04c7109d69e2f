//! ACL collaborator call surface.
//!
//! The ACL is a separate chaincode reached over `invoke_chaincode`. Every call
//! is `[method, args...]` on chaincode [`ACL_CHAINCODE`], channel
//! [`ACL_CHANNEL`]; payloads are protobuf.

use prost::Message;

use crate::entities::Address;
use crate::errors::ContractError;
use crate::proto::{AccountInfo, AclResponse};

pub const ACL_CHAINCODE: &str = "acl";
pub const ACL_CHANNEL: &str = "acl";

pub const CHECK_KEYS: &str = "checkKeys";
pub const CHECK_ADDRESS: &str = "checkAddress";
pub const GET_ACCOUNT_INFO: &str = "getAccountInfo";
pub const GET_ACCOUNTS_INFO: &str = "getAccountsInfo";
pub const GET_ACCOUNT_OPERATION_RIGHT: &str = "getAccountOperationRight";
pub const ADD_RIGHTS: &str = "addRights";
pub const REMOVE_RIGHTS: &str = "removeRights";

/// Separator joining public keys in a `checkKeys` query.
pub const KEY_SEPARATOR: &str = "/";

/// Build the argument vector of an ACL call.
pub fn acl_args(method: &str, params: &[&str]) -> Vec<Vec<u8>> {
    std::iter::once(method.as_bytes().to_vec())
        .chain(params.iter().map(|p| p.as_bytes().to_vec()))
        .collect()
}

impl AclResponse {
    /// Decode a `checkKeys` payload.
    pub fn from_payload(payload: &[u8]) -> Result<Self, ContractError> {
        Ok(Self::decode(payload)?)
    }

    /// Canonical address of the signer set.
    pub fn signer_address(&self) -> Result<Address, ContractError> {
        let proto = self
            .address
            .as_ref()
            .and_then(|a| a.address.as_ref())
            .ok_or_else(|| ContractError::Unauthorized("acl response has no address".into()))?;
        Ok(Address::try_from(proto)?)
    }

    /// Signature threshold; zero when the ACL sets no policy.
    pub fn threshold(&self) -> u32 {
        self.address
            .as_ref()
            .and_then(|a| a.signature_policy.as_ref())
            .map_or(0, |p| p.n)
    }

    /// Account status, defaulting to a clean account.
    pub fn account_info(&self) -> AccountInfo {
        self.account.clone().unwrap_or_default()
    }
}
