//! # cc-03-cross-channel
//!
//! Two-phase balance transfers between two channels, driven by a privileged
//! relay.
//!
//! ## Direction
//!
//! A token is native to the channel named by its symbol root (`TOK_GROUP`
//! belongs to `TOK`). A transfer out of the native channel is **forward**:
//! the source debits the token balance and books it as given to the target,
//! the target credits a mirror (allowed) balance. A transfer back home is
//! **reverse**: the source debits the mirror, the target restores the token
//! balance and reduces what it had given.
//!
//! ## Module Structure
//!
//! ```text
//! cc-03-cross-channel/
//! ├── domain/     # NewTransfer, Direction, invariants, errors
//! └── service.rs  # CrossChannelService
//! ```

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::{decode_transfer, CrossChannelService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
