//! Per-transaction results and the wire records built from them.

use std::any::Any;

use prost::Message;

use cc_01_state_cache::TxCommit;
use shared_types::keys::{split_composite_key, MULTI_SWAP_PREFIX, SWAP_PREFIX};
use shared_types::proto::{
    BatchTxEvent, MultiSwap, ResponseError, Swap, SwapResponse, TxResponse, WriteElement,
};

use super::errors::BatchError;

/// What one transaction of a batch produced.
#[derive(Clone, Debug, PartialEq)]
pub enum TxOutcome {
    Committed { result: Vec<u8>, commit: TxCommit },
    Failed(BatchError),
}

impl TxOutcome {
    fn error(&self) -> Option<ResponseError> {
        match self {
            Self::Committed { .. } => None,
            Self::Failed(e) => Some(response_error(e)),
        }
    }

    /// Entry of `BatchResponse.tx_responses`.
    pub fn to_response(&self, id: &[u8], method: &str) -> TxResponse {
        TxResponse {
            id: id.to_vec(),
            method: method.to_string(),
            error: self.error(),
            writes: match self {
                Self::Committed { commit, .. } => commit.writes.clone(),
                Self::Failed(_) => Vec::new(),
            },
        }
    }

    /// Entry of `BatchEvent.events`.
    pub fn to_event(&self, id: &[u8], method: &str) -> BatchTxEvent {
        let mut event = BatchTxEvent {
            id: id.to_vec(),
            method: method.to_string(),
            error: self.error(),
            ..Default::default()
        };
        if let Self::Committed { result, commit } = self {
            event.accounting = commit.accounting.clone();
            event.events = commit.events.clone();
            event.result = result.clone();
        }
        event
    }
}

pub fn response_error(err: &BatchError) -> ResponseError {
    ResponseError {
        code: err.code(),
        error: err.to_string(),
    }
}

/// Result entry for one swap answer or key.
pub fn swap_response<T>(id: &[u8], result: &Result<T, BatchError>) -> SwapResponse {
    SwapResponse {
        id: id.to_vec(),
        error: result.as_ref().err().map(response_error),
    }
}

/// Swaps and multi-swaps stored by committed writes.
pub fn created_swaps(writes: &[WriteElement]) -> (Vec<Swap>, Vec<MultiSwap>) {
    let mut swaps = Vec::new();
    let mut multi = Vec::new();
    for write in writes.iter().filter(|w| !w.is_deleted) {
        let Ok((prefix, _)) = split_composite_key(&write.key) else {
            continue;
        };
        match prefix.as_str() {
            SWAP_PREFIX => swaps.extend(Swap::decode(write.value.as_slice()).ok()),
            MULTI_SWAP_PREFIX => multi.extend(MultiSwap::decode(write.value.as_slice()).ok()),
            _ => {}
        }
    }
    (swaps, multi)
}

/// Text of a caught panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
