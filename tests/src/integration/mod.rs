//! # Integration Flows
//!
//! Each module drives whole invocations through [`crate::fixtures::Channel`].

pub mod concurrency;
pub mod flows;
pub mod swaps;
pub mod transfers;
