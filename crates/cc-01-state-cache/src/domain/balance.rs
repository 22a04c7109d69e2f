//! # Balance Store
//!
//! Typed balance namespaces used by the swap and cross-channel engines.
//!
//! | Type | Prefix | Attributes |
//! |------|--------|------------|
//! | token | `2b` | `[address]` or `[address, group]` |
//! | token locked | `2c` | same as token |
//! | allowed | `2d` | `[address, token]` |
//! | allowed locked | `2e` | `[address, token]` |
//! | given | `2f` | `[channel]` |
//!
//! Every movement records an accounting entry through the stub. Only a
//! transaction cache keeps them; other stubs drop them.

use prost::Message;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shared_types::keys::{create_composite_key, split_composite_key};
use shared_types::proto::{AccountingRecord, BalanceLock};
use shared_types::{amount_from_bytes, amount_to_bytes, ChaincodeStub, U256};

use super::errors::BalanceError;
use super::holder_index;

/// Namespace of lock records.
pub const LOCK_PREFIX: &str = "balance_lock";

/// A balance namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BalanceType {
    Token,
    TokenLocked,
    Allowed,
    AllowedLocked,
    Given,
}

impl BalanceType {
    pub const ALL: [BalanceType; 5] = [
        BalanceType::Token,
        BalanceType::TokenLocked,
        BalanceType::Allowed,
        BalanceType::AllowedLocked,
        BalanceType::Given,
    ];

    /// Composite key type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Token => "2b",
            Self::TokenLocked => "2c",
            Self::Allowed => "2d",
            Self::AllowedLocked => "2e",
            Self::Given => "2f",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::TokenLocked => "token locked",
            Self::Allowed => "allowed",
            Self::AllowedLocked => "allowed locked",
            Self::Given => "given",
        }
    }

    /// Parse a name or a prefix.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.prefix() == s || t.name() == s || t.name().replace(' ', "_") == s)
    }

    /// Locked counterpart, if the type can be locked.
    pub fn locked(&self) -> Option<Self> {
        match self {
            Self::Token => Some(Self::TokenLocked),
            Self::Allowed => Some(Self::AllowedLocked),
            _ => None,
        }
    }

    fn attributes(&self, address: &str, token: &str) -> Vec<String> {
        match self {
            Self::Token | Self::TokenLocked => match token.split_once('_') {
                Some((_, group)) if !group.is_empty() => {
                    vec![address.to_string(), group.to_string()]
                }
                _ => vec![address.to_string()],
            },
            Self::Allowed | Self::AllowedLocked => vec![address.to_string(), token.to_string()],
            Self::Given => vec![address.to_uppercase()],
        }
    }

    /// Split stored attributes back into `(address, token-or-group)`.
    pub(crate) fn owner_and_token(&self, attrs: &[String]) -> (String, String) {
        let address = attrs.first().cloned().unwrap_or_default();
        let token = attrs.get(1).cloned().unwrap_or_default();
        (address, token)
    }
}

/// Composite key of a balance.
pub fn balance_key(ty: BalanceType, address: &str, token: &str) -> Result<String, BalanceError> {
    Ok(create_composite_key(ty.prefix(), &ty.attributes(address, token))?)
}

/// Current balance; zero when absent.
pub fn get_balance(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    address: &str,
    token: &str,
) -> Result<U256, BalanceError> {
    let key = balance_key(ty, address, token)?;
    decode_amount(&key, stub.get_state(&key)?)
}

fn decode_amount(key: &str, raw: Option<Vec<u8>>) -> Result<U256, BalanceError> {
    match raw {
        None => Ok(U256::zero()),
        Some(bytes) => amount_from_bytes(&bytes).map_err(|e| BalanceError::Corrupted {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn put_balance(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    address: &str,
    token: &str,
    amount: U256,
) -> Result<(), BalanceError> {
    let key = balance_key(ty, address, token)?;
    if amount.is_zero() {
        stub.del_state(&key)?;
    } else {
        stub.put_state(&key, amount_to_bytes(&amount))?;
    }
    holder_index::on_balance_write(stub, ty, &key, amount)
}

/// All balances of `address` in a namespace, as `(token-or-group, amount)`.
pub fn list_balances(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    address: &str,
) -> Result<Vec<(String, U256)>, BalanceError> {
    let entries = stub.get_state_by_partial_composite_key(ty.prefix(), &[address.to_string()])?;
    let mut out = Vec::with_capacity(entries.len());
    for kv in entries {
        let (_, attrs) = split_composite_key(&kv.key)?;
        let (_, token) = ty.owner_and_token(&attrs);
        out.push((token, decode_amount(&kv.key, Some(kv.value))?));
    }
    Ok(out)
}

/// Credit a balance.
pub fn add(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    address: &str,
    token: &str,
    amount: &U256,
    reason: &str,
) -> Result<(), BalanceError> {
    if amount.is_zero() {
        return Ok(());
    }
    let current = get_balance(stub, ty, address, token)?;
    let next = current
        .checked_add(*amount)
        .ok_or_else(|| BalanceError::Corrupted {
            key: balance_key(ty, address, token).unwrap_or_default(),
            reason: "overflow".into(),
        })?;
    put_balance(stub, ty, address, token, next)?;
    record(stub, ty, token, "", address, amount, reason);
    Ok(())
}

/// Debit a balance; fails without writing when it would go negative.
pub fn sub(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    address: &str,
    token: &str,
    amount: &U256,
    reason: &str,
) -> Result<(), BalanceError> {
    if amount.is_zero() {
        return Ok(());
    }
    let current = get_balance(stub, ty, address, token)?;
    let next = current
        .checked_sub(*amount)
        .ok_or(BalanceError::InsufficientBalance)?;
    put_balance(stub, ty, address, token, next)?;
    record(stub, ty, token, address, "", amount, reason);
    Ok(())
}

/// Move value between two holders of the same namespace.
pub fn transfer(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    from: &str,
    to: &str,
    token: &str,
    amount: &U256,
    reason: &str,
) -> Result<(), BalanceError> {
    if amount.is_zero() {
        return Ok(());
    }
    let from_balance = get_balance(stub, ty, from, token)?;
    let from_next = from_balance
        .checked_sub(*amount)
        .ok_or(BalanceError::InsufficientBalance)?;
    put_balance(stub, ty, from, token, from_next)?;
    let to_balance = if from == to {
        from_next
    } else {
        get_balance(stub, ty, to, token)?
    };
    put_balance(stub, ty, to, token, to_balance.saturating_add(*amount))?;
    record(stub, ty, token, from, to, amount, reason);
    Ok(())
}

fn record(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    token: &str,
    sender: &str,
    recipient: &str,
    amount: &U256,
    reason: &str,
) {
    let token = if token.is_empty() && ty == BalanceType::Given {
        recipient.to_string()
    } else {
        token.to_string()
    };
    stub.add_accounting_record(AccountingRecord {
        token,
        sender: sender.to_string(),
        recipient: recipient.to_string(),
        amount: amount_to_bytes(amount),
        reason: reason.to_string(),
    });
}

// =============================================================================
// LOCKS
// =============================================================================

/// Request to lock part of a balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LockRequest {
    pub id: String,
    pub address: String,
    pub token: String,
    pub amount: U256,
    pub reason: String,
}

/// Request to release part of a lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnlockRequest {
    pub id: String,
    pub amount: U256,
    pub reason: String,
    /// Release whatever remains and close the lock.
    pub complete: bool,
}

/// Payload of the lock and unlock events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    pub id: String,
    pub address: String,
    pub token: String,
    pub amount: String,
    pub reason: String,
    pub complete_operation: bool,
}

fn lock_event_name(ty: BalanceType, locked: bool) -> &'static str {
    match (ty, locked) {
        (BalanceType::Token, true) => "BalanceTokenLocked",
        (BalanceType::Token, false) => "BalanceTokenUnlocked",
        (_, true) => "BalanceAllowedLocked",
        (_, false) => "BalanceAllowedUnlocked",
    }
}

fn lock_key(locked: BalanceType, id: &str) -> Result<String, BalanceError> {
    Ok(create_composite_key(LOCK_PREFIX, &[locked.prefix(), id])?)
}

/// Stored lock record.
pub fn get_lock(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    id: &str,
) -> Result<Option<BalanceLock>, BalanceError> {
    let locked = ty.locked().ok_or(BalanceError::NotLockable(ty.name()))?;
    let key = lock_key(locked, id)?;
    stub.get_state(&key)?
        .map(|raw| {
            BalanceLock::decode(raw.as_slice()).map_err(|e| BalanceError::Corrupted {
                key: key.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Move `amount` from a balance into its locked counterpart.
pub fn lock(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    req: &LockRequest,
) -> Result<(), BalanceError> {
    let locked = ty.locked().ok_or(BalanceError::NotLockable(ty.name()))?;
    if get_lock(stub, ty, &req.id)?.is_some() {
        return Err(BalanceError::LockAlreadyExists);
    }

    sub(stub, ty, &req.address, &req.token, &req.amount, &req.reason)?;
    add(stub, locked, &req.address, &req.token, &req.amount, &req.reason)?;

    let record = BalanceLock {
        id: req.id.clone(),
        address: req.address.clone(),
        token: req.token.clone(),
        initial_amount: amount_to_bytes(&req.amount),
        current_amount: amount_to_bytes(&req.amount),
        reason: req.reason.clone(),
    };
    stub.put_state(&lock_key(locked, &req.id)?, record.encode_to_vec())?;

    emit_lock_event(
        stub,
        lock_event_name(ty, true),
        LockEvent {
            id: req.id.clone(),
            address: req.address.clone(),
            token: req.token.clone(),
            amount: req.amount.to_string(),
            reason: req.reason.clone(),
            complete_operation: false,
        },
    )?;
    debug!(id = %req.id, ty = ty.name(), "balance locked");
    Ok(())
}

/// Release part of a lock back to the balance. Returns the amount still
/// locked.
pub fn unlock(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    req: &UnlockRequest,
) -> Result<U256, BalanceError> {
    let locked = ty.locked().ok_or(BalanceError::NotLockable(ty.name()))?;
    let mut record = get_lock(stub, ty, &req.id)?.ok_or(BalanceError::LockNotFound)?;
    let key = lock_key(locked, &req.id)?;
    let current = decode_amount(&key, Some(record.current_amount.clone()))?;

    let remaining = current
        .checked_sub(req.amount)
        .ok_or(BalanceError::InsufficientLockedBalance)?;
    let (released, remaining) = if req.complete {
        (current, U256::zero())
    } else {
        (req.amount, remaining)
    };

    sub(stub, locked, &record.address, &record.token, &released, &req.reason)?;
    add(stub, ty, &record.address, &record.token, &released, &req.reason)?;

    let complete = remaining.is_zero();
    if complete {
        stub.del_state(&key)?;
    } else {
        record.current_amount = amount_to_bytes(&remaining);
        stub.put_state(&key, record.encode_to_vec())?;
    }

    emit_lock_event(
        stub,
        lock_event_name(ty, false),
        LockEvent {
            id: record.id.clone(),
            address: record.address.clone(),
            token: record.token.clone(),
            amount: released.to_string(),
            reason: req.reason.clone(),
            complete_operation: complete,
        },
    )?;
    Ok(remaining)
}

fn emit_lock_event(
    stub: &mut dyn ChaincodeStub,
    name: &str,
    event: LockEvent,
) -> Result<(), BalanceError> {
    let payload = serde_json::to_vec(&event).map_err(|e| BalanceError::Corrupted {
        key: event.id.clone(),
        reason: e.to_string(),
    })?;
    stub.set_event(name, payload)?;
    Ok(())
}
