//! # Domain Layer
//!
//! Routing rules, entry-point errors and startup resolution.

pub mod errors;
pub mod routing;
pub mod startup;

pub use errors::*;
pub use routing::*;
pub use startup::*;
