//! Inverse balance index: `(type, token, address) -> amount`.
//!
//! Built once per balance type by `createIndex`; afterwards every write to
//! that balance type keeps it current.

use tracing::info;

use shared_types::keys::{create_composite_key, split_composite_key};
use shared_types::{amount_from_bytes, amount_to_bytes, ChaincodeStub, U256};

use super::balance::BalanceType;
use super::errors::BalanceError;

/// Namespace of index entries.
pub const INVERSE_BALANCE_PREFIX: &str = "inverse_balance";

/// Namespace of "index built" markers.
pub const INDEX_CREATED_PREFIX: &str = "index_created";

fn marker_key(ty: BalanceType) -> Result<String, BalanceError> {
    Ok(create_composite_key(INDEX_CREATED_PREFIX, &[ty.prefix()])?)
}

fn inverse_key(ty: BalanceType, token: &str, address: &str) -> Result<String, BalanceError> {
    Ok(create_composite_key(
        INVERSE_BALANCE_PREFIX,
        &[ty.prefix(), token, address],
    )?)
}

/// True once `create_index` ran for `ty`.
pub fn index_created(stub: &mut dyn ChaincodeStub, ty: BalanceType) -> Result<bool, BalanceError> {
    Ok(stub.get_state(&marker_key(ty)?)?.is_some())
}

/// Build the index from every stored balance of `ty`. Returns the number of
/// entries written.
pub fn create_index(stub: &mut dyn ChaincodeStub, ty: BalanceType) -> Result<usize, BalanceError> {
    if index_created(stub, ty)? {
        return Err(BalanceError::IndexAlreadyExists(ty.name()));
    }
    let entries = stub.get_state_by_partial_composite_key(ty.prefix(), &[])?;
    let mut written = 0;
    for kv in entries {
        let (_, attrs) = split_composite_key(&kv.key)?;
        let (address, token) = ty.owner_and_token(&attrs);
        stub.put_state(&inverse_key(ty, &token, &address)?, kv.value)?;
        written += 1;
    }
    stub.put_state(&marker_key(ty)?, vec![1])?;
    info!(ty = ty.name(), entries = written, "holder index created");
    Ok(written)
}

pub(crate) fn on_balance_write(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    balance_key: &str,
    amount: U256,
) -> Result<(), BalanceError> {
    if !index_created(stub, ty)? {
        return Ok(());
    }
    let (_, attrs) = split_composite_key(balance_key)?;
    let (address, token) = ty.owner_and_token(&attrs);
    let key = inverse_key(ty, &token, &address)?;
    if amount.is_zero() {
        stub.del_state(&key)?;
    } else {
        stub.put_state(&key, amount_to_bytes(&amount))?;
    }
    Ok(())
}

/// Holders of `token` (group for token balances) with their amounts.
pub fn holders(
    stub: &mut dyn ChaincodeStub,
    ty: BalanceType,
    token: &str,
) -> Result<Vec<(String, U256)>, BalanceError> {
    if !index_created(stub, ty)? {
        return Err(BalanceError::IndexNotCreated(ty.name()));
    }
    let entries = stub.get_state_by_partial_composite_key(
        INVERSE_BALANCE_PREFIX,
        &[ty.prefix().to_string(), token.to_string()],
    )?;
    entries
        .into_iter()
        .map(|kv| {
            let (_, attrs) = split_composite_key(&kv.key)?;
            let address = attrs.get(2).cloned().unwrap_or_default();
            let amount = amount_from_bytes(&kv.value).map_err(|e| BalanceError::Corrupted {
                key: kv.key.clone(),
                reason: e.to_string(),
            })?;
            Ok((address, amount))
        })
        .collect()
}
