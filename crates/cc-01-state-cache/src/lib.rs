//! # cc-01-state-cache
//!
//! Layered key-value views of ledger state.
//!
//! ## Layers
//!
//! ```text
//! Ledger (host) ← BatchCache ← TxCache
//!        ↑
//!    QueryStub (drops every mutation)
//! ```
//!
//! - **BatchCache**: batch-wide overlay, memoized reads and cross-contract
//!   calls, replayed onto the ledger on commit.
//! - **TxCache**: per-transaction overlay, collects events and accounting
//!   records, returns sorted writes on commit.
//! - **QueryStub**: read-through view for query methods.
//!
//! The crate also owns the balance namespaces the protocol engines move value
//! through, and an in-memory [`MockLedger`] with host semantics.

pub mod adapters;
pub mod domain;

pub use adapters::*;
pub use domain::*;
