//! # Domain Layer
//!
//! Core types for cross-channel transfers.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
