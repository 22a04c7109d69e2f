//! # Chaincode Test Suite
//!
//! End-to-end flows that drive a full [`cc_08_dispatcher::Chaincode`] over
//! in-memory ledgers, one ledger per channel.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/
//! │   ├── fixtures.rs      # Demo token contract, signer, channel setup
//! │   └── integration/
//! │       ├── flows.rs        # Batched calls, nonces, queries, panics
//! │       ├── swaps.rs        # Swap round trip across two channels
//! │       ├── transfers.rs    # Cross-channel transfer round trip
//! │       └── concurrency.rs  # One chaincode, many threads
//! └── benches/
//!     └── chaincode_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::swaps::
//! cargo bench -p cc-tests
//! ```

pub mod fixtures;
pub mod integration;
