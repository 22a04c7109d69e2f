pub mod balance;
pub mod errors;
pub mod holder_index;
pub mod write_set;

pub use balance::{BalanceType, LockEvent, LockRequest, UnlockRequest};
pub use errors::*;
pub use write_set::{PendingWrite, WriteSet};
