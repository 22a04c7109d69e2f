//! # Adapters
//!
//! - `invoker`: the method table behind the batch engine's invoker port

pub mod invoker;

pub use invoker::RegistryInvoker;
