//! # Shared Types Crate
//!
//! Identifiers, persisted records and the host ledger port shared by every
//! chaincode subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Stable Storage Format**: protobuf tags in [`proto`] are never renumbered.
//! - **Host Isolation**: subsystems reach the ledger only through
//!   [`ChaincodeStub`].

pub mod acl;
pub mod config;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod proto;
pub mod stub;

pub use config::{ChaincodeOptions, Config, ConfigError, ContractConfig, TokenConfig};
pub use entities::*;
pub use errors::*;
pub use stub::{ChaincodeStub, KeyValue, Response};
