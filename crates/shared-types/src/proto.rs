//! # Persisted and Wire Records
//!
//! Protobuf messages for every engine-internal record. Field tags are part of
//! the storage format and must never be renumbered.
//!
//! ## Groups
//!
//! - **Engine**: `PendingTx`, `Nonce`, `Batch`, `BatchResponse`, `BatchEvent`
//! - **Protocols**: `Swap`, `MultiSwap`, `SwapKey`, `CCTransfer`
//! - **Balances**: `AccountingRecord`, `BalanceLock`
//! - **ACL**: `AclResponse`, `AccountInfo`, `SignedAddress`, `HaveRight`

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTITY
// =============================================================================

/// Address with its ACL flags.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddressProto {
    #[prost(string, tag = "1")]
    pub user_id: String,
    #[prost(bytes = "vec", tag = "2")]
    pub address: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub is_industrial: bool,
    #[prost(bool, tag = "4")]
    pub is_multisig: bool,
}

// =============================================================================
// ENGINE RECORDS
// =============================================================================

/// One key/value pair of a propagated trace carrier.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CarrierEntry {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// A batched call captured for deferred execution.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingTx {
    #[prost(string, tag = "1")]
    pub method: String,
    #[prost(message, optional, tag = "2")]
    pub sender: Option<AddressProto>,
    #[prost(string, repeated, tag = "3")]
    pub args: Vec<String>,
    #[prost(int64, tag = "4")]
    pub timestamp: i64,
    #[prost(uint64, tag = "5")]
    pub nonce: u64,
    #[prost(message, repeated, tag = "6")]
    pub telemetry_carrier: Vec<CarrierEntry>,
}

/// Accepted nonce history of one address, ascending.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Nonce {
    #[prost(uint64, repeated, tag = "1")]
    pub nonce: Vec<u64>,
}

/// Driver-submitted batch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Batch {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub tx_ids: Vec<Vec<u8>>,
    #[prost(message, repeated, tag = "2")]
    pub swaps: Vec<Swap>,
    #[prost(message, repeated, tag = "3")]
    pub keys: Vec<SwapKey>,
    #[prost(message, repeated, tag = "4")]
    pub multi_swaps: Vec<MultiSwap>,
    #[prost(message, repeated, tag = "5")]
    pub multi_swap_keys: Vec<SwapKey>,
}

/// One write produced by a committed transaction.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct WriteElement {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub is_deleted: bool,
}

/// Error attached to a per-item response.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct ResponseError {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub error: String,
}

/// Result of one batched transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(string, tag = "2")]
    pub method: String,
    #[prost(message, optional, tag = "3")]
    pub error: Option<ResponseError>,
    #[prost(message, repeated, tag = "4")]
    pub writes: Vec<WriteElement>,
}

/// Result of one swap answer or key reveal inside a batch.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SwapResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub error: Option<ResponseError>,
}

/// Aggregated batch result returned as the success payload.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchResponse {
    #[prost(message, repeated, tag = "1")]
    pub tx_responses: Vec<TxResponse>,
    #[prost(message, repeated, tag = "2")]
    pub swap_responses: Vec<SwapResponse>,
    #[prost(message, repeated, tag = "3")]
    pub swap_key_responses: Vec<SwapResponse>,
    #[prost(message, repeated, tag = "4")]
    pub created_swaps: Vec<Swap>,
    #[prost(message, repeated, tag = "5")]
    pub created_multi_swaps: Vec<MultiSwap>,
    #[prost(message, repeated, tag = "6")]
    pub multi_swap_responses: Vec<SwapResponse>,
    #[prost(message, repeated, tag = "7")]
    pub multi_swap_key_responses: Vec<SwapResponse>,
}

/// Named event emitted inside a transaction.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct Event {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Balance movement recorded by the transaction cache.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AccountingRecord {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(string, tag = "2")]
    pub sender: String,
    #[prost(string, tag = "3")]
    pub recipient: String,
    #[prost(bytes = "vec", tag = "4")]
    pub amount: Vec<u8>,
    #[prost(string, tag = "5")]
    pub reason: String,
}

impl AccountingRecord {
    /// Canonical string form; accounting lists are sorted by it.
    pub fn canonical(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.token,
            self.sender,
            self.recipient,
            hex::encode(&self.amount),
            self.reason
        )
    }
}

/// Per-transaction entry of the `batchExecute` / `executeTasks` event.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchTxEvent {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(string, tag = "2")]
    pub method: String,
    #[prost(message, optional, tag = "3")]
    pub error: Option<ResponseError>,
    #[prost(message, repeated, tag = "4")]
    pub accounting: Vec<AccountingRecord>,
    #[prost(message, repeated, tag = "5")]
    pub events: Vec<Event>,
    #[prost(bytes = "vec", tag = "6")]
    pub result: Vec<u8>,
}

/// Payload of the `batchExecute` / `executeTasks` event.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BatchEvent {
    #[prost(message, repeated, tag = "1")]
    pub events: Vec<BatchTxEvent>,
}

/// One fully signed invocation executed by `executeTasks`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Task {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub method: String,
    #[prost(string, repeated, tag = "3")]
    pub args: Vec<String>,
}

/// Driver request for `executeTasks`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ExecuteTasksRequest {
    #[prost(message, repeated, tag = "1")]
    pub tasks: Vec<Task>,
}

// =============================================================================
// PROTOCOL RECORDS
// =============================================================================

/// Single-asset hashlocked swap.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Swap {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub creator: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub owner: Vec<u8>,
    #[prost(string, tag = "4")]
    pub token: String,
    #[prost(bytes = "vec", tag = "5")]
    pub amount: Vec<u8>,
    #[prost(string, tag = "6")]
    pub from: String,
    #[prost(string, tag = "7")]
    pub to: String,
    #[prost(bytes = "vec", tag = "8")]
    pub hash: Vec<u8>,
    #[prost(int64, tag = "9")]
    pub timeout: i64,
}

/// One asset of a multi-asset swap.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AssetGroup {
    #[prost(string, tag = "1")]
    pub group: String,
    #[prost(bytes = "vec", tag = "2")]
    pub amount: Vec<u8>,
}

/// Multi-asset hashlocked swap.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MultiSwap {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub creator: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub owner: Vec<u8>,
    #[prost(string, tag = "4")]
    pub token: String,
    #[prost(message, repeated, tag = "5")]
    pub assets: Vec<AssetGroup>,
    #[prost(string, tag = "6")]
    pub from: String,
    #[prost(string, tag = "7")]
    pub to: String,
    #[prost(bytes = "vec", tag = "8")]
    pub hash: Vec<u8>,
    #[prost(int64, tag = "9")]
    pub timeout: i64,
}

/// Preimage key revealed for a swap.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SwapKey {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(string, tag = "2")]
    pub key: String,
}

/// One item of a multi-asset cross-channel transfer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ::prost::Message)]
#[serde(default)]
pub struct CCTransferItem {
    #[prost(string, tag = "1")]
    pub token: String,
    #[prost(string, tag = "2")]
    pub amount: String,
}

/// Cross-channel transfer record.
///
/// Accepted as protobuf or, for older drivers, as JSON.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ::prost::Message)]
#[serde(default, rename_all = "camelCase")]
pub struct CCTransfer {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub from: String,
    #[prost(string, tag = "3")]
    pub to: String,
    #[prost(string, tag = "4")]
    pub token: String,
    #[prost(string, tag = "5")]
    pub user: String,
    #[prost(string, tag = "6")]
    pub amount: String,
    #[prost(bool, tag = "7")]
    pub forward_direction: bool,
    #[prost(bool, tag = "8")]
    pub is_commit: bool,
    #[prost(int64, tag = "9")]
    pub time_as_nanos: i64,
    #[prost(message, repeated, tag = "10")]
    pub items: Vec<CCTransferItem>,
}

/// Locked portion of a balance, keyed by lock id.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct BalanceLock {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub address: String,
    #[prost(string, tag = "3")]
    pub token: String,
    #[prost(bytes = "vec", tag = "4")]
    pub initial_amount: Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub current_amount: Vec<u8>,
    #[prost(string, tag = "6")]
    pub reason: String,
}

// =============================================================================
// ACL RECORDS
// =============================================================================

/// Key algorithm advertised by the ACL for each signer key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum KeyTypeProto {
    Ed25519 = 0,
    Secp256k1 = 1,
    Gost = 2,
}

/// Account status held by the ACL.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct AccountInfo {
    #[prost(string, tag = "1")]
    pub kyc_hash: String,
    #[prost(bool, tag = "2")]
    pub gray_listed: bool,
    #[prost(bool, tag = "3")]
    pub black_listed: bool,
}

/// Threshold of valid signatures required for a signer set.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct SignaturePolicy {
    #[prost(uint32, tag = "1")]
    pub n: u32,
}

/// Canonical address plus its signature policy.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedAddress {
    #[prost(message, optional, tag = "1")]
    pub address: Option<AddressProto>,
    #[prost(message, optional, tag = "2")]
    pub signature_policy: Option<SignaturePolicy>,
}

/// ACL `checkKeys` response.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AclResponse {
    #[prost(message, optional, tag = "1")]
    pub account: Option<AccountInfo>,
    #[prost(message, optional, tag = "2")]
    pub address: Option<SignedAddress>,
    #[prost(enumeration = "KeyTypeProto", repeated, tag = "3")]
    pub key_types: Vec<i32>,
}

/// ACL `getAccountOperationRight` response.
#[derive(Clone, PartialEq, Eq, ::prost::Message)]
pub struct HaveRight {
    #[prost(bool, tag = "1")]
    pub have_right: bool,
}
