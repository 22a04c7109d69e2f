//! # Domain Layer
//!
//! Methods, decoders, decoded values and the method table.

pub mod decoder;
pub mod errors;
pub mod method;
pub mod table;
pub mod value;

pub use decoder::{
    decode_arg, AddressArg, BigIntArg, BoolArg, Capability, Check, HexBytesArg, I64Arg, JsonArg,
    ParamDecoder, StringArg, U64Arg,
};
pub use errors::RegistryError;
pub use method::{Context, Handler, Method, MethodKind};
pub use table::{is_enabled, MethodTable, MethodTableBuilder, MULTI_SWAP_METHODS, SWAP_METHODS};
pub use value::{ArgValue, Args};
