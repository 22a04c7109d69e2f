//! # Chaincode Dispatcher
//!
//! Entry point of a chaincode: turns a host invocation into a routed call and
//! a [`shared_types::Response`].
//!
//! ## Module Structure
//!
//! ```text
//! cc-08-dispatcher/
//! ├── domain/
//! │   ├── errors.rs    # DispatchError
//! │   ├── routing.rs   # Reserved method names, tx id and robot checks
//! │   └── startup.rs   # Chaincode vs server mode, TLS material
//! ├── methods/         # Base methods every chaincode exposes
//! ├── adapters/
//! │   └── invoker.rs   # Method table seen by the batch engine
//! ├── contract.rs      # Contract port (extra methods, swap-done callback)
//! ├── telemetry.rs     # Logging setup
//! └── service.rs       # Chaincode: init / invoke
//! ```
//!
//! ## Invocation Flow
//!
//! ```text
//! host ──▶ Chaincode::invoke
//!            │
//!            ├─ system method ──▶ cc-07 batch engine / cc-04 swaps / cc-03 transfers
//!            │
//!            └─ table method  ──▶ cc-06 authenticator ──▶ cc-05 decode ──▶ handler
//!                                                                   │
//!                                       batched: preimage (cc-07) ◀─┘
//! ```

pub mod adapters;
pub mod contract;
pub mod domain;
pub mod methods;
pub mod service;
pub mod telemetry;

pub use contract::{BaseContract, CompletedSwap, Contract};
pub use domain::*;
pub use service::Chaincode;
pub use telemetry::{init_logging, LoggingConfig};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
