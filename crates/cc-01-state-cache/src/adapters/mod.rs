pub mod batch_cache;
pub mod mock_ledger;
pub mod query_stub;
pub mod tx_cache;

pub use batch_cache::BatchCache;
pub use mock_ledger::{InvokeHandler, MockLedger};
pub use query_stub::QueryStub;
pub use tx_cache::{TxCache, TxCommit};
