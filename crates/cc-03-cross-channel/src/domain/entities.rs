//! # Domain Entities
//!
//! Transfer requests and the direction model.
//!
//! | Direction | Token native to | Debit on source | Credit on target |
//! |-----------|-----------------|-----------------|------------------|
//! | Forward | source | token balance, given[target] += | allowed balance |
//! | Reverse | target | allowed balance | token balance, given[source] -= |

use serde::{Deserialize, Serialize};

use shared_types::proto::{CCTransfer, CCTransferItem};
use shared_types::{Address, U256};

use super::errors::CrossChannelError;

/// Which side the token is native to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Token is native to the source channel.
    Forward,
    /// Token is native to the target channel.
    Reverse,
}

impl Direction {
    /// Wire flag.
    pub fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// One token amount moved by a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferItem {
    /// Token name, e.g. `TOK` or `TOK_GROUP`.
    pub token: String,
    /// Amount moved.
    pub amount: U256,
}

impl TransferItem {
    /// Parse a decimal amount.
    pub fn parse(token: &str, amount: &str) -> Result<Self, CrossChannelError> {
        let amount = U256::from_dec_str(amount)
            .map_err(|_| CrossChannelError::InvalidAmount(amount.to_string()))?;
        if amount.is_zero() {
            return Err(CrossChannelError::InvalidAmount("0".into()));
        }
        Ok(Self {
            token: token.to_string(),
            amount,
        })
    }
}

/// A transfer requested on the source channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTransfer {
    /// Caller-chosen id.
    pub id: String,
    /// Target channel.
    pub to: String,
    /// Owner of the moved balances.
    pub user: Address,
    /// Moved tokens, debited in this order.
    pub items: Vec<TransferItem>,
    /// Store as a multi-asset record.
    pub multi: bool,
}

/// Items carried by a stored record, in declared order.
pub fn record_items(record: &CCTransfer) -> Result<Vec<TransferItem>, CrossChannelError> {
    if record.items.is_empty() {
        return Ok(vec![TransferItem::parse(&record.token, &record.amount)?]);
    }
    record
        .items
        .iter()
        .map(|item| TransferItem::parse(&item.token, &item.amount))
        .collect()
}

/// Build the record stored on the source channel.
pub fn new_record(
    transfer: &NewTransfer,
    from: &str,
    direction: Direction,
    time_as_nanos: i64,
) -> CCTransfer {
    let (token, amount, items) = match (transfer.multi, transfer.items.as_slice()) {
        (false, [single]) => (single.token.clone(), single.amount.to_string(), Vec::new()),
        _ => (
            String::new(),
            String::new(),
            transfer
                .items
                .iter()
                .map(|i| CCTransferItem {
                    token: i.token.clone(),
                    amount: i.amount.to_string(),
                })
                .collect(),
        ),
    };
    CCTransfer {
        id: transfer.id.clone(),
        from: from.to_uppercase(),
        to: transfer.to.to_uppercase(),
        token,
        user: transfer.user.to_base58(),
        amount,
        forward_direction: direction.is_forward(),
        is_commit: false,
        time_as_nanos,
        items,
    }
}

/// One page of `channelTransfersFrom`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfersPage {
    /// Key to pass for the next page; empty when exhausted.
    pub bookmark: String,
    /// Records on this page, ordered by key.
    pub cc_transfers: Vec<CCTransfer>,
}
