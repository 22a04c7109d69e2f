//! # cc-07-batch-engine
//!
//! Two-phase execution of batched methods.
//!
//! ## Phases
//!
//! ```text
//! user tx ──► authenticate + decode ──► PendingTx under (batchTransactions, tx_id)
//!
//! driver ──► batchExecute(Batch) ──► BatchCache
//!               │  for each tx id, in order:
//!               │    TxCache(ts = batch secs, nanos + i)
//!               │    load + delete preimage, re-check, invoke
//!               │    commit into BatchCache on success
//!               │  swap answers / keys, multi-swap answers / keys
//!               ▼
//!          event `batchExecute`, BatchResponse payload, single commit
//! ```
//!
//! A failing or panicking transaction only produces an error entry; the
//! batch itself fails only when decoding the request or committing the
//! cache fails.
//!
//! `executeTasks` follows the same shape for fully signed invocations that
//! skip the preimage phase.
//!
//! ## Module Structure
//!
//! ```text
//! cc-07-batch-engine/
//! ├── domain/     # preimage rules, TxOutcome, BatchError
//! ├── ports/      # BatchedMethodInvoker
//! └── service.rs  # BatchEngine
//! ```

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::*;
pub use ports::{BatchedMethodInvoker, MethodSignature};
pub use service::{
    decode_batch, decode_tasks, BatchEngine, BATCH_EXECUTE_EVENT, EXECUTE_TASKS_EVENT,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
