//! # Swap Service
//!
//! Hashlocked swap state machine. The origin channel (A) debits the owner and
//! waits for the key; the responder channel (B) receives the swap from the
//! driver and credits the owner when the key is revealed.
//!
//! | Step | Channel | Forward | Reverse |
//! |------|---------|---------|---------|
//! | begin | A | token -= | allowed -= |
//! | answer | B | | given[A] -= |
//! | user done | B | allowed += | token += |
//! | robot done | A | given[B] += | |
//! | cancel by owner | A | token += | allowed += |
//! | cancel answered | B | | given[A] += |

use tracing::{debug, info, instrument};

use cc_01_state_cache::balance::{self, BalanceType};
use shared_types::keys::create_composite_key;
use shared_types::proto::{MultiSwap, Swap};
use shared_types::{amount_to_bytes, same_channel, token_symbol, Address, ChaincodeOptions, ChaincodeStub};

use crate::domain::{
    invariant_cancel_allowed, invariant_distinct_channels, invariant_hash_length,
    invariant_key_matches, Direction, MultiSwapRequest, SwapError, SwapRecord, SwapRequest,
    ROBOT_SIDE_TIMEOUT, USER_SIDE_TIMEOUT,
};

const REASON_BEGIN: &str = "swap begin";
const REASON_CANCEL: &str = "swap cancel";
const REASON_ANSWER: &str = "swap answer";
const REASON_DONE: &str = "swap done";

/// Swap engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapService {
    user_timeout: i64,
    robot_timeout: i64,
    unsafe_cancel: bool,
}

impl Default for SwapService {
    fn default() -> Self {
        Self {
            user_timeout: USER_SIDE_TIMEOUT,
            robot_timeout: ROBOT_SIDE_TIMEOUT,
            unsafe_cancel: false,
        }
    }
}

impl SwapService {
    /// Service honouring `unsafe_swap_cancel` from the contract options.
    pub fn from_options(options: &ChaincodeOptions) -> Self {
        Self {
            unsafe_cancel: options.unsafe_swap_cancel,
            ..Self::default()
        }
    }

    // =========================================================================
    // ORIGIN CHANNEL
    // =========================================================================

    /// `swapBegin`: debit the sender and store a swap keyed by the tx id.
    #[instrument(skip(self, stub, request), fields(token = %request.token, to = %request.contract_to))]
    pub fn begin(
        &self,
        stub: &mut dyn ChaincodeStub,
        sender: &Address,
        request: &SwapRequest,
    ) -> Result<Swap, SwapError> {
        if request.amount.is_zero() {
            return Err(SwapError::IncorrectSwap);
        }
        let (id, from, timeout) = self.origin(stub, &request.contract_to, &request.hash)?;
        let swap = Swap {
            id,
            creator: sender.as_bytes().to_vec(),
            owner: sender.as_bytes().to_vec(),
            token: request.token.clone(),
            amount: amount_to_bytes(&request.amount),
            from,
            to: request.contract_to.to_uppercase(),
            hash: request.hash.clone(),
            timeout,
        };
        self.open(stub, swap)
    }

    /// `multiSwapBegin`: like [`begin`](Self::begin) for a list of asset groups
    /// sharing one symbol.
    #[instrument(skip(self, stub, request), fields(token = %request.token, to = %request.contract_to))]
    pub fn multi_begin(
        &self,
        stub: &mut dyn ChaincodeStub,
        sender: &Address,
        request: &MultiSwapRequest,
    ) -> Result<MultiSwap, SwapError> {
        let assets = request.assets.to_groups()?;
        let root = token_symbol(&request.token);
        if assets.iter().any(|a| token_symbol(&a.group) != root) {
            return Err(SwapError::IncorrectSwap);
        }
        let (id, from, timeout) = self.origin(stub, &request.contract_to, &request.hash)?;
        let swap = MultiSwap {
            id,
            creator: sender.as_bytes().to_vec(),
            owner: sender.as_bytes().to_vec(),
            token: request.token.clone(),
            assets,
            from,
            to: request.contract_to.to_uppercase(),
            hash: request.hash.clone(),
            timeout,
        };
        self.open(stub, swap)
    }

    /// Driver completion on the origin channel: check the key, book the moved
    /// value as given to the responder, drop the swap.
    #[instrument(skip(self, stub, key), fields(id = %hex::encode(swap_id)))]
    pub fn robot_done<R: SwapRecord>(
        &self,
        stub: &mut dyn ChaincodeStub,
        swap_id: &[u8],
        key: &str,
    ) -> Result<R, SwapError> {
        let hex_id = hex::encode(swap_id);
        let record: R = load(stub, &hex_id)?;
        invariant_key_matches(key, record.hash())?;
        if record.direction()? == Direction::Forward {
            balance::add(stub, BalanceType::Given, record.to_channel(), "", &record.total()?, REASON_DONE)?;
        }
        stub.del_state(&swap_key::<R>(&hex_id)?)?;
        debug!("swap closed by driver");
        Ok(record)
    }

    // =========================================================================
    // RESPONDER CHANNEL
    // =========================================================================

    /// Driver takeover on the responder channel.
    #[instrument(skip(self, stub, record), fields(id = %record.hex_id()))]
    pub fn answer<R: SwapRecord>(
        &self,
        stub: &mut dyn ChaincodeStub,
        mut record: R,
    ) -> Result<R, SwapError> {
        if !same_channel(record.to_channel(), &stub.channel_id()) {
            return Err(SwapError::IncorrectSwap);
        }
        let direction = record.direction()?;
        let key = swap_key::<R>(&record.hex_id())?;
        if stub.get_state(&key)?.is_some() {
            return Err(SwapError::AlreadyExists);
        }
        if direction == Direction::Reverse {
            balance::sub(stub, BalanceType::Given, record.from_channel(), "", &record.total()?, REASON_ANSWER)?;
        }
        record.answer(stub.tx_timestamp().seconds + self.robot_timeout);
        stub.put_state(&key, record.encode_to_vec())?;
        debug!(timeout = record.timeout(), "swap answered");
        Ok(record)
    }

    /// `swapDone` / `multiSwapDone`: the owner reveals the key on the
    /// responder channel and receives the value.
    #[instrument(skip(self, stub, key))]
    pub fn user_done<R: SwapRecord>(
        &self,
        stub: &mut dyn ChaincodeStub,
        swap_id: &str,
        key: &str,
    ) -> Result<R, SwapError> {
        let record: R = load(stub, swap_id)?;
        invariant_key_matches(key, record.hash())?;
        if record.creator() == record.owner() {
            return Err(SwapError::IncorrectSwap);
        }
        let owner = owner_address(&record)?;
        let ty = match record.direction()? {
            Direction::Forward => BalanceType::Allowed,
            Direction::Reverse => BalanceType::Token,
        };
        for m in record.moves()? {
            balance::add(stub, ty, &owner, &m.token, &m.amount, REASON_DONE)?;
        }
        stub.del_state(&swap_key::<R>(swap_id)?)?;
        let payload = format!("{}\t{}\t{}", record.from_channel(), record.hex_id(), key);
        stub.set_event(R::KEY_EVENT, payload.into_bytes())?;
        info!("swap completed");
        Ok(record)
    }

    // =========================================================================
    // EITHER CHANNEL
    // =========================================================================

    /// `swapCancel` / `multiSwapCancel`: restore what this channel debited and
    /// drop the swap.
    #[instrument(skip(self, stub, sender))]
    pub fn cancel<R: SwapRecord>(
        &self,
        stub: &mut dyn ChaincodeStub,
        sender: &Address,
        swap_id: &str,
    ) -> Result<R, SwapError> {
        let record: R = load(stub, swap_id)?;
        let now = stub.tx_timestamp().seconds;
        invariant_cancel_allowed(&record, sender, now, self.unsafe_cancel)?;

        let direction = record.direction()?;
        if record.creator() == record.owner() {
            let owner = owner_address(&record)?;
            let ty = match direction {
                Direction::Forward => BalanceType::Token,
                Direction::Reverse => BalanceType::Allowed,
            };
            for m in record.moves()? {
                balance::add(stub, ty, &owner, &m.token, &m.amount, REASON_CANCEL)?;
            }
        } else if record.is_answered() {
            if direction == Direction::Reverse {
                balance::add(stub, BalanceType::Given, record.from_channel(), "", &record.total()?, REASON_CANCEL)?;
            }
        } else {
            return Err(SwapError::IncorrectSwap);
        }
        stub.del_state(&swap_key::<R>(swap_id)?)?;
        info!("swap cancelled");
        Ok(record)
    }

    /// Stored swap by hex id.
    pub fn get<R: SwapRecord>(&self, stub: &mut dyn ChaincodeStub, swap_id: &str) -> Result<R, SwapError> {
        load(stub, swap_id)
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn origin(
        &self,
        stub: &mut dyn ChaincodeStub,
        contract_to: &str,
        hash: &[u8],
    ) -> Result<(Vec<u8>, String, i64), SwapError> {
        let from = stub.channel_id().to_uppercase();
        invariant_distinct_channels(&from, contract_to)?;
        invariant_hash_length(hash)?;
        let id = hex::decode(stub.tx_id()).map_err(|e| SwapError::Decode(e.to_string()))?;
        let timeout = stub.tx_timestamp().seconds + self.user_timeout;
        Ok((id, from, timeout))
    }

    fn open<R: SwapRecord>(&self, stub: &mut dyn ChaincodeStub, record: R) -> Result<R, SwapError> {
        let direction = record.direction()?;
        let key = swap_key::<R>(&record.hex_id())?;
        if stub.get_state(&key)?.is_some() {
            return Err(SwapError::AlreadyExists);
        }
        let owner = owner_address(&record)?;
        let ty = match direction {
            Direction::Forward => BalanceType::Token,
            Direction::Reverse => BalanceType::Allowed,
        };
        for m in record.moves()? {
            balance::sub(stub, ty, &owner, &m.token, &m.amount, REASON_BEGIN)?;
        }
        stub.put_state(&key, record.encode_to_vec())?;
        info!(id = %record.hex_id(), ?direction, "swap opened");
        Ok(record)
    }
}

/// State key of a swap.
pub fn swap_key<R: SwapRecord>(hex_id: &str) -> Result<String, SwapError> {
    Ok(create_composite_key(R::PREFIX, &[hex_id])?)
}

fn load<R: SwapRecord>(stub: &mut dyn ChaincodeStub, hex_id: &str) -> Result<R, SwapError> {
    let raw = stub
        .get_state(&swap_key::<R>(hex_id)?)?
        .ok_or(SwapError::NotFound)?;
    R::decode(raw.as_slice()).map_err(|e| SwapError::Decode(e.to_string()))
}

fn owner_address<R: SwapRecord>(record: &R) -> Result<String, SwapError> {
    Address::from_slice(record.owner())
        .map(|a| a.to_base58())
        .map_err(|e| SwapError::Decode(e.to_string()))
}
