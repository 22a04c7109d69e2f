//! # Cross-Channel Service
//!
//! Two-phase transfer between the channel this chaincode runs on and a peer
//! channel. All operations read and write through the stub they are given,
//! normally a transaction cache.
//!
//! ```text
//! source (A)                         target (B)
//! create_from   is_commit=false
//!                                    create_to   is_commit=true
//! commit_from   is_commit=true
//!                                    delete_to
//! delete_from
//! ```
//!
//! `cancel_from` replaces everything after `create_from` while the source
//! record is still uncommitted.

use prost::Message;
use tracing::{debug, info, instrument};

use cc_01_state_cache::balance::{self, BalanceType};
use shared_types::keys::{create_composite_key, partial_key_range};
use shared_types::keys::{CC_TRANSFER_FROM_PREFIX, CC_TRANSFER_TO_PREFIX};
use shared_types::proto::CCTransfer;
use shared_types::config::DEFAULT_MAX_CHANNEL_TRANSFER_ITEMS;
use shared_types::{same_channel, ChaincodeStub};

use crate::domain::{
    invariant_distinct_channels, invariant_items, new_record, record_items, CrossChannelError,
    Direction, NewTransfer, TransferItem, TransfersPage,
};

const REASON_FROM: &str = "cc transfer from";
const REASON_TO: &str = "cc transfer to";
const REASON_CANCEL: &str = "cc transfer cancel";

/// Side of the protocol a record is stored on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    From,
    To,
}

impl Side {
    fn prefix(self) -> &'static str {
        match self {
            Self::From => CC_TRANSFER_FROM_PREFIX,
            Self::To => CC_TRANSFER_TO_PREFIX,
        }
    }
}

/// Cross-channel transfer engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CrossChannelService {
    max_items: usize,
}

impl Default for CrossChannelService {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHANNEL_TRANSFER_ITEMS as usize)
    }
}

impl CrossChannelService {
    /// `max_items` bounds multi-asset transfers.
    pub fn new(max_items: usize) -> Self {
        Self { max_items }
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    // =========================================================================
    // SOURCE CHANNEL
    // =========================================================================

    /// Open a transfer on the source channel and debit the user.
    #[instrument(skip(self, stub, transfer), fields(id = %transfer.id, to = %transfer.to))]
    pub fn create_from(
        &self,
        stub: &mut dyn ChaincodeStub,
        transfer: &NewTransfer,
    ) -> Result<CCTransfer, CrossChannelError> {
        let from = stub.channel_id();
        invariant_distinct_channels(&from, &transfer.to)?;
        let direction = invariant_items(&transfer.items, &from, &transfer.to, self.max_items)?;

        let key = record_key(Side::From, &transfer.id)?;
        if stub.get_state(&key)?.is_some() {
            return Err(CrossChannelError::AlreadyExists);
        }

        let user = transfer.user.to_base58();
        let to = transfer.to.to_uppercase();
        for item in &transfer.items {
            debit_source(stub, direction, &user, &to, item)?;
        }

        let record = new_record(transfer, &from, direction, stub.tx_timestamp().as_nanos());
        stub.put_state(&key, record.encode_to_vec())?;
        info!(?direction, items = transfer.items.len(), "transfer opened");
        Ok(record)
    }

    /// Unwind an uncommitted transfer and drop its record.
    #[instrument(skip(self, stub))]
    pub fn cancel_from(
        &self,
        stub: &mut dyn ChaincodeStub,
        id: &str,
    ) -> Result<CCTransfer, CrossChannelError> {
        let record = self.load(stub, Side::From, id)?;
        if record.is_commit {
            return Err(CrossChannelError::AlreadyCommit);
        }
        let direction = direction_of(&record);
        for item in record_items(&record)? {
            match direction {
                Direction::Forward => {
                    balance::add(stub, BalanceType::Token, &record.user, &item.token, &item.amount, REASON_CANCEL)?;
                    balance::sub(stub, BalanceType::Given, &record.to, "", &item.amount, REASON_CANCEL)?;
                }
                Direction::Reverse => {
                    balance::add(stub, BalanceType::Allowed, &record.user, &item.token, &item.amount, REASON_CANCEL)?;
                }
            }
        }
        stub.del_state(&record_key(Side::From, id)?)?;
        info!("transfer cancelled");
        Ok(record)
    }

    /// Mark the source record committed.
    #[instrument(skip(self, stub))]
    pub fn commit_from(&self, stub: &mut dyn ChaincodeStub, id: &str) -> Result<(), CrossChannelError> {
        let mut record = self.load(stub, Side::From, id)?;
        if record.is_commit {
            return Err(CrossChannelError::AlreadyCommit);
        }
        record.is_commit = true;
        stub.put_state(&record_key(Side::From, id)?, record.encode_to_vec())?;
        debug!("transfer committed");
        Ok(())
    }

    /// Remove a committed source record.
    pub fn delete_from(&self, stub: &mut dyn ChaincodeStub, id: &str) -> Result<(), CrossChannelError> {
        self.delete(stub, Side::From, id)
    }

    // =========================================================================
    // TARGET CHANNEL
    // =========================================================================

    /// Accept a transfer on the target channel and credit the user.
    ///
    /// `raw` is a protobuf `CCTransfer`; JSON is accepted as a fallback.
    #[instrument(skip(self, stub, raw))]
    pub fn create_to(
        &self,
        stub: &mut dyn ChaincodeStub,
        raw: &[u8],
    ) -> Result<CCTransfer, CrossChannelError> {
        let mut record = decode_transfer(raw)?;
        let channel = stub.channel_id();
        if !same_channel(&record.to, &channel) {
            return Err(CrossChannelError::InvalidChannel(record.to));
        }
        invariant_distinct_channels(&record.from, &record.to)?;

        let items = record_items(&record)?;
        let direction = invariant_items(&items, &record.from, &record.to, self.max_items)?;
        if direction.is_forward() != record.forward_direction {
            return Err(CrossChannelError::IncorrectDirection);
        }

        let key = record_key(Side::To, &record.id)?;
        if stub.get_state(&key)?.is_some() {
            return Err(CrossChannelError::AlreadyExists);
        }

        let from = record.from.to_uppercase();
        for item in &items {
            credit_target(stub, direction, &record.user, &from, item)?;
        }

        record.is_commit = true;
        stub.put_state(&key, record.encode_to_vec())?;
        info!(id = %record.id, ?direction, "transfer accepted");
        Ok(record)
    }

    /// Remove a committed target record.
    pub fn delete_to(&self, stub: &mut dyn ChaincodeStub, id: &str) -> Result<(), CrossChannelError> {
        self.delete(stub, Side::To, id)
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn get_from(&self, stub: &mut dyn ChaincodeStub, id: &str) -> Result<CCTransfer, CrossChannelError> {
        self.load(stub, Side::From, id)
    }

    pub fn get_to(&self, stub: &mut dyn ChaincodeStub, id: &str) -> Result<CCTransfer, CrossChannelError> {
        self.load(stub, Side::To, id)
    }

    /// One page of source records ordered by id.
    pub fn list_from(
        &self,
        stub: &mut dyn ChaincodeStub,
        page_size: usize,
        bookmark: &str,
    ) -> Result<TransfersPage, CrossChannelError> {
        let (start, end) = partial_key_range::<&str>(CC_TRANSFER_FROM_PREFIX, &[])?;
        if !bookmark.is_empty() && !bookmark.starts_with(&start) {
            return Err(CrossChannelError::IncorrectBookmark);
        }
        let (entries, next) =
            stub.get_state_by_range_with_pagination(&start, &end, page_size, bookmark)?;
        let cc_transfers = entries
            .into_iter()
            .map(|kv| {
                CCTransfer::decode(kv.value.as_slice())
                    .map_err(|e| CrossChannelError::Decode(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TransfersPage {
            bookmark: next,
            cc_transfers,
        })
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn load(&self, stub: &mut dyn ChaincodeStub, side: Side, id: &str) -> Result<CCTransfer, CrossChannelError> {
        let raw = stub
            .get_state(&record_key(side, id)?)?
            .ok_or(CrossChannelError::NotFound)?;
        CCTransfer::decode(raw.as_slice()).map_err(|e| CrossChannelError::Decode(e.to_string()))
    }

    fn delete(&self, stub: &mut dyn ChaincodeStub, side: Side, id: &str) -> Result<(), CrossChannelError> {
        let record = self.load(stub, side, id)?;
        if !record.is_commit {
            return Err(CrossChannelError::NotCommit);
        }
        stub.del_state(&record_key(side, id)?)?;
        debug!(id, ?side, "transfer record deleted");
        Ok(())
    }
}

fn record_key(side: Side, id: &str) -> Result<String, CrossChannelError> {
    Ok(create_composite_key(side.prefix(), &[id])?)
}

fn direction_of(record: &CCTransfer) -> Direction {
    if record.forward_direction {
        Direction::Forward
    } else {
        Direction::Reverse
    }
}

fn debit_source(
    stub: &mut dyn ChaincodeStub,
    direction: Direction,
    user: &str,
    to: &str,
    item: &TransferItem,
) -> Result<(), CrossChannelError> {
    match direction {
        Direction::Forward => {
            balance::sub(stub, BalanceType::Token, user, &item.token, &item.amount, REASON_FROM)?;
            balance::add(stub, BalanceType::Given, to, "", &item.amount, REASON_FROM)?;
        }
        Direction::Reverse => {
            balance::sub(stub, BalanceType::Allowed, user, &item.token, &item.amount, REASON_FROM)?;
        }
    }
    Ok(())
}

fn credit_target(
    stub: &mut dyn ChaincodeStub,
    direction: Direction,
    user: &str,
    from: &str,
    item: &TransferItem,
) -> Result<(), CrossChannelError> {
    match direction {
        Direction::Forward => {
            balance::add(stub, BalanceType::Allowed, user, &item.token, &item.amount, REASON_TO)?;
        }
        Direction::Reverse => {
            balance::add(stub, BalanceType::Token, user, &item.token, &item.amount, REASON_TO)?;
            balance::sub(stub, BalanceType::Given, from, "", &item.amount, REASON_TO)?;
        }
    }
    Ok(())
}

/// Decode an incoming record: protobuf when it carries an id, JSON otherwise.
pub fn decode_transfer(raw: &[u8]) -> Result<CCTransfer, CrossChannelError> {
    if let Ok(record) = CCTransfer::decode(raw) {
        if !record.id.is_empty() {
            return Ok(record);
        }
    }
    let record: CCTransfer =
        serde_json::from_slice(raw).map_err(|e| CrossChannelError::Decode(e.to_string()))?;
    if record.id.is_empty() {
        return Err(CrossChannelError::Decode("empty transfer id".into()));
    }
    Ok(record)
}
