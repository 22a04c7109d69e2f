//! Domain layer: preimages, outcomes, errors.

pub mod errors;
pub mod outcome;
pub mod preimage;

pub use errors::BatchError;
pub use outcome::{created_swaps, panic_message, response_error, swap_response, TxOutcome};
pub use preimage::{
    decode_preimage, invariant_nonce_accepted, invariant_not_expired, preimage_key,
    preimage_sender, trace_carrier, TRACE_KEYS,
};
