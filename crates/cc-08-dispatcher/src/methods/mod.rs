//! # Base Methods
//!
//! Methods every chaincode exposes, registered before the contract's own.
//!
//! | Group | Methods |
//! |-------|---------|
//! | swaps | `swapBegin`, `swapCancel`, `swapGet`, `multiSwapBegin`, `multiSwapCancel`, `multiSwapGet` |
//! | transfers | `channelTransferByCustomer`, `channelTransferByAdmin`, `channelMultiTransferByCustomer`, `channelMultiTransferByAdmin`, `channelTransferFrom`, `channelTransferTo`, `channelTransfersFrom` |
//! | documents | `addDocs`, `deleteDoc`, `documentsList` |
//! | balances | `balanceOf`, `lockedBalanceOf`, `allowedBalanceOf`, `givenBalance` |

pub mod balances;
pub mod documents;
pub mod swaps;
pub mod transfers;

use cc_05_method_registry::Method;

pub use documents::Document;
pub use swaps::SwapAssets;
pub use transfers::TransferItemSpec;

/// Every base method.
pub fn base_methods() -> Vec<Method> {
    let mut methods = swaps::methods();
    methods.extend(transfers::methods());
    methods.extend(documents::methods());
    methods.extend(balances::methods());
    methods
}
