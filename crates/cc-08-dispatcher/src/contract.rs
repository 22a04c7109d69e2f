//! # Contract Port
//!
//! A chaincode is the base method set plus what a [`Contract`] adds. The
//! contract never sees the stub directly outside a [`Context`].

use shared_types::proto::{MultiSwap, Swap};
use shared_types::ContractError;

use cc_05_method_registry::{Context, Method};

/// A swap closed on this channel by `swapDone` or `multiSwapDone`.
#[derive(Clone, Debug, PartialEq)]
pub enum CompletedSwap {
    Single(Swap),
    Multi(MultiSwap),
}

impl CompletedSwap {
    /// Hex swap id.
    pub fn hex_id(&self) -> String {
        match self {
            Self::Single(s) => hex::encode(&s.id),
            Self::Multi(s) => hex::encode(&s.id),
        }
    }
}

/// User contract plugged into the dispatcher.
pub trait Contract: Send + Sync {
    /// Methods added to the base set. Names must not collide with it.
    fn methods(&self) -> Vec<Method> {
        Vec::new()
    }

    /// Called in the same transaction after the owner revealed the key.
    fn on_swap_done(
        &self,
        _ctx: &mut Context<'_>,
        _swap: &CompletedSwap,
    ) -> Result<(), ContractError> {
        Ok(())
    }
}

/// Contract with only the base methods.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseContract;

impl Contract for BaseContract {}
