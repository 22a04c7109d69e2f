//! # cc-05-method-registry
//!
//! Explicit method table for chaincode entry points.
//!
//! Each method is declared once with its name, [`MethodKind`], whether it
//! needs an authenticated sender, and one [`ParamDecoder`] per positional
//! argument:
//!
//! ```text
//! Method::batched("transfer", handler)
//!     .with_auth()
//!     .param(AddressArg)
//!     .param(BigIntArg)
//! ```
//!
//! The dispatcher owns the resulting [`MethodTable`] behind an `Arc`; it is
//! never mutated after construction.

pub mod domain;

pub use domain::*;
