//! # Domain Layer
//!
//! Swap records, requests, invariants and errors.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
