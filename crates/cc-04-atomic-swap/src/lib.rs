//! # cc-04-atomic-swap
//!
//! Hashlocked swaps between two channels, single or multi-asset.
//!
//! ## Lifecycle
//!
//! ```text
//! Origin (A):    ∅ ─begin─▶ pending ─cancel─▶ ∅
//! Responder (B): ∅ ─answer (driver)─▶ answered ─user done (key)─▶ ∅
//! Origin (A):    pending ─robot done (key)─▶ ∅
//! ```
//!
//! The lock is `SHA3-256(key)`. The owner has [`USER_SIDE_TIMEOUT`] seconds
//! on the origin channel; a driver-answered swap lives
//! [`ROBOT_SIDE_TIMEOUT`] seconds on the responder. Cancellation requires
//! the owner and an expired timeout unless the contract enables
//! `unsafeSwapCancel`.
//!
//! ## Module Structure
//!
//! ```text
//! cc-04-atomic-swap/
//! ├── domain/     # SwapRecord, requests, invariants, errors
//! └── service.rs  # SwapService
//! ```

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::{swap_key, SwapService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
