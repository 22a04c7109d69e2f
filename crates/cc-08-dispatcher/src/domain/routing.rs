//! # Routing
//!
//! Reserved system methods are matched before the method table is consulted.
//!
//! | Method | Robot only | Handled by |
//! |--------|------------|------------|
//! | `batchExecute` | yes | batch engine |
//! | `executeTasks` | yes | batch engine |
//! | `swapDone` | no | swap engine, then the contract callback |
//! | `multiSwapDone` | no | swap engine, then the contract callback |
//! | `createCCTransferTo` | yes | cross-channel engine |
//! | `deleteCCTransferTo` | yes | cross-channel engine |
//! | `commitCCTransferFrom` | yes | cross-channel engine |
//! | `cancelCCTransferFrom` | yes | cross-channel engine |
//! | `deleteCCTransferFrom` | yes | cross-channel engine |
//! | `createIndex` | yes | holder index |

use shared_crypto::sha256;

use super::errors::DispatchError;

/// Entry points that bypass the method table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemMethod {
    BatchExecute,
    ExecuteTasks,
    SwapDone,
    MultiSwapDone,
    CreateTransferTo,
    DeleteTransferTo,
    CommitTransferFrom,
    CancelTransferFrom,
    DeleteTransferFrom,
    CreateIndex,
}

impl SystemMethod {
    pub const ALL: [SystemMethod; 10] = [
        Self::BatchExecute,
        Self::ExecuteTasks,
        Self::SwapDone,
        Self::MultiSwapDone,
        Self::CreateTransferTo,
        Self::DeleteTransferTo,
        Self::CommitTransferFrom,
        Self::CancelTransferFrom,
        Self::DeleteTransferFrom,
        Self::CreateIndex,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// External name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BatchExecute => "batchExecute",
            Self::ExecuteTasks => "executeTasks",
            Self::SwapDone => "swapDone",
            Self::MultiSwapDone => "multiSwapDone",
            Self::CreateTransferTo => "createCCTransferTo",
            Self::DeleteTransferTo => "deleteCCTransferTo",
            Self::CommitTransferFrom => "commitCCTransferFrom",
            Self::CancelTransferFrom => "cancelCCTransferFrom",
            Self::DeleteTransferFrom => "deleteCCTransferFrom",
            Self::CreateIndex => "createIndex",
        }
    }

    /// Only the driver may call it.
    pub fn requires_robot(&self) -> bool {
        !matches!(self, Self::SwapDone | Self::MultiSwapDone)
    }

    /// Number of positional arguments.
    pub fn arity(&self) -> usize {
        match self {
            Self::SwapDone | Self::MultiSwapDone => 2,
            _ => 1,
        }
    }

    /// Check the argument count.
    pub fn check_args<S>(&self, args: &[S]) -> Result<(), DispatchError> {
        if args.len() != self.arity() {
            return Err(DispatchError::ArgCount {
                method: self.name(),
                got: args.len(),
                expected: self.arity(),
            });
        }
        Ok(())
    }
}

/// Invariant: the transaction id is hexadecimal.
pub fn invariant_hex_tx_id(tx_id: &str) -> Result<(), DispatchError> {
    hex::decode(tx_id)
        .map(|_| ())
        .map_err(|_| DispatchError::InvalidTxId(tx_id.to_string()))
}

/// Invariant: the caller is the driver, by certificate SKI or by the SHA-256
/// of the serialized creator.
pub fn invariant_robot(ski: &[u8], creator: &[u8], robot_ski: &[u8]) -> Result<(), DispatchError> {
    if ski == robot_ski || sha256(creator).as_slice() == robot_ski {
        return Ok(());
    }
    Err(DispatchError::RobotOnly)
}

/// Bytes of a binary system argument: hex when it decodes as hex, the raw
/// text otherwise.
pub fn payload_bytes(arg: &str) -> Vec<u8> {
    hex::decode(arg).unwrap_or_else(|_| arg.as_bytes().to_vec())
}
