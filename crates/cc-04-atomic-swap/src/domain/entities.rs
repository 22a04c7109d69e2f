//! # Domain Entities
//!
//! Single and multi-asset swaps share one state machine. [`SwapRecord`]
//! exposes what the engine needs from either record.

use serde::{Deserialize, Serialize};

use shared_types::keys::{MULTI_SWAP_PREFIX, SWAP_PREFIX};
use shared_types::proto::{AssetGroup, MultiSwap, Swap};
use shared_types::{amount_from_bytes, amount_to_bytes, token_symbol, U256};

use super::errors::SwapError;

/// Seconds a user has to complete a swap on the origin channel.
pub const USER_SIDE_TIMEOUT: i64 = 10_800;

/// Seconds a driver-answered swap stays open on the responder channel.
pub const ROBOT_SIDE_TIMEOUT: i64 = 300;

/// Creator written by the driver when it answers a swap.
pub const ROBOT_CREATOR: &[u8] = b"0000";

/// Event carrying the revealed key of a single-asset swap.
pub const SWAP_KEY_EVENT: &str = "swapKey";

/// Event carrying the revealed key of a multi-asset swap.
pub const MULTI_SWAP_KEY_EVENT: &str = "multi_swap_key";

/// Which side the swapped token is native to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Token is native to the origin channel.
    Forward,
    /// Token is native to the responder channel.
    Reverse,
}

/// One balance moved by a swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapMove {
    /// Full token name used for the balance key.
    pub token: String,
    pub amount: U256,
}

/// Common view over [`Swap`] and [`MultiSwap`].
pub trait SwapRecord: prost::Message + Default + Clone {
    /// State namespace.
    const PREFIX: &'static str;
    /// Event emitted when the owner reveals the key.
    const KEY_EVENT: &'static str;

    fn id(&self) -> &[u8];
    fn creator(&self) -> &[u8];
    fn owner(&self) -> &[u8];
    fn token(&self) -> &str;
    fn from_channel(&self) -> &str;
    fn to_channel(&self) -> &str;
    fn hash(&self) -> &[u8];
    fn timeout(&self) -> i64;

    /// Driver takeover on the responder channel.
    fn answer(&mut self, timeout: i64);

    /// Balances moved, in declared order.
    fn moves(&self) -> Result<Vec<SwapMove>, SwapError>;

    /// Hex id, the form used in keys and events.
    fn hex_id(&self) -> String {
        hex::encode(self.id())
    }

    /// Total moved amount.
    fn total(&self) -> Result<U256, SwapError> {
        self.moves()?
            .iter()
            .try_fold(U256::zero(), |acc, m| acc.checked_add(m.amount))
            .ok_or_else(|| SwapError::Decode("amount overflow".into()))
    }

    /// Direction of the swap, from the token's symbol root.
    fn direction(&self) -> Result<Direction, SwapError> {
        let root = token_symbol(self.token());
        if root.eq_ignore_ascii_case(self.from_channel()) {
            Ok(Direction::Forward)
        } else if root.eq_ignore_ascii_case(self.to_channel()) {
            Ok(Direction::Reverse)
        } else {
            Err(SwapError::IncorrectSwap)
        }
    }

    /// True once the driver answered.
    fn is_answered(&self) -> bool {
        self.creator() == ROBOT_CREATOR
    }
}

fn decode_amount(bytes: &[u8]) -> Result<U256, SwapError> {
    amount_from_bytes(bytes).map_err(|e| SwapError::Decode(e.to_string()))
}

impl SwapRecord for Swap {
    const PREFIX: &'static str = SWAP_PREFIX;
    const KEY_EVENT: &'static str = SWAP_KEY_EVENT;

    fn id(&self) -> &[u8] {
        &self.id
    }
    fn creator(&self) -> &[u8] {
        &self.creator
    }
    fn owner(&self) -> &[u8] {
        &self.owner
    }
    fn token(&self) -> &str {
        &self.token
    }
    fn from_channel(&self) -> &str {
        &self.from
    }
    fn to_channel(&self) -> &str {
        &self.to
    }
    fn hash(&self) -> &[u8] {
        &self.hash
    }
    fn timeout(&self) -> i64 {
        self.timeout
    }

    fn answer(&mut self, timeout: i64) {
        self.creator = ROBOT_CREATOR.to_vec();
        self.timeout = timeout;
    }

    fn moves(&self) -> Result<Vec<SwapMove>, SwapError> {
        Ok(vec![SwapMove {
            token: self.token.clone(),
            amount: decode_amount(&self.amount)?,
        }])
    }
}

impl SwapRecord for MultiSwap {
    const PREFIX: &'static str = MULTI_SWAP_PREFIX;
    const KEY_EVENT: &'static str = MULTI_SWAP_KEY_EVENT;

    fn id(&self) -> &[u8] {
        &self.id
    }
    fn creator(&self) -> &[u8] {
        &self.creator
    }
    fn owner(&self) -> &[u8] {
        &self.owner
    }
    fn token(&self) -> &str {
        &self.token
    }
    fn from_channel(&self) -> &str {
        &self.from
    }
    fn to_channel(&self) -> &str {
        &self.to
    }
    fn hash(&self) -> &[u8] {
        &self.hash
    }
    fn timeout(&self) -> i64 {
        self.timeout
    }

    fn answer(&mut self, timeout: i64) {
        self.creator = ROBOT_CREATOR.to_vec();
        self.timeout = timeout;
    }

    fn moves(&self) -> Result<Vec<SwapMove>, SwapError> {
        self.assets
            .iter()
            .map(|a| {
                Ok(SwapMove {
                    token: a.group.clone(),
                    amount: decode_amount(&a.amount)?,
                })
            })
            .collect()
    }
}

// =============================================================================
// REQUESTS
// =============================================================================

/// `swapBegin` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub token: String,
    /// Responder channel.
    pub contract_to: String,
    pub amount: U256,
    /// SHA3-256 of the key.
    pub hash: Vec<u8>,
}

/// One asset of a `multiSwapBegin` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSpec {
    /// Full token name, e.g. `TOK_GROUP1`.
    pub group: String,
    /// Decimal amount.
    pub amount: String,
}

/// JSON asset list of `multiSwapBegin`: `{"assets":[{"group":..,"amount":..}]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSwapAssets {
    pub assets: Vec<AssetSpec>,
}

impl MultiSwapAssets {
    /// Parsed asset groups, rejecting empty lists and zero or malformed amounts.
    pub fn to_groups(&self) -> Result<Vec<AssetGroup>, SwapError> {
        if self.assets.is_empty() {
            return Err(SwapError::IncorrectSwap);
        }
        self.assets
            .iter()
            .map(|a| {
                let amount = U256::from_dec_str(&a.amount)
                    .map_err(|_| SwapError::Decode(format!("invalid amount {:?}", a.amount)))?;
                if amount.is_zero() {
                    return Err(SwapError::Decode("zero amount".into()));
                }
                Ok(AssetGroup {
                    group: a.group.clone(),
                    amount: amount_to_bytes(&amount),
                })
            })
            .collect()
    }
}

/// `multiSwapBegin` arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiSwapRequest {
    /// Symbol every asset belongs to.
    pub token: String,
    pub assets: MultiSwapAssets,
    pub contract_to: String,
    pub hash: Vec<u8>,
}
