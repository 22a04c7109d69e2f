//! Domain layer: argument layout, outcome and errors.

pub mod entities;
pub mod errors;
pub mod layout;

pub use entities::{invariant_account_clean, Authenticated};
pub use errors::AuthError;
pub use layout::{signing_message, SignedArgs, FIXED_ARGS, MIN_SIGNED_ARGS};
