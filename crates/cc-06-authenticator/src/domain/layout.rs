//! # Signed Argument Layout
//!
//! A signed invocation of a method with `N` user arguments carries:
//!
//! ```text
//! [req_id, chaincode, channel, arg_1 .. arg_N, nonce, pk_1 .. pk_K, sig_1 .. sig_K]
//! ```
//!
//! Everything before the signatures is signed, prefixed by the method name.

use super::errors::AuthError;

/// Fixed positions: request id, chaincode, channel, nonce.
pub const FIXED_ARGS: usize = 4;

/// Smallest valid call: fixed positions plus one key and one signature.
pub const MIN_SIGNED_ARGS: usize = FIXED_ARGS + 2;

/// A signed argument vector split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedArgs<'a> {
    pub request_id: &'a str,
    pub chaincode: &'a str,
    pub channel: &'a str,
    pub args: &'a [String],
    pub nonce: &'a str,
    pub public_keys: &'a [String],
    pub signatures: &'a [String],
    /// Positions covered by the signatures.
    pub signed: &'a [String],
}

impl<'a> SignedArgs<'a> {
    /// Split `raw` for a method taking `arity` user arguments.
    pub fn split(raw: &'a [String], arity: usize) -> Result<Self, AuthError> {
        let len = raw.len();
        if len < arity + MIN_SIGNED_ARGS {
            return Err(AuthError::ArgCount {
                got: len,
                expected: arity + MIN_SIGNED_ARGS,
            });
        }
        let tail = len - arity - FIXED_ARGS;
        if tail % 2 != 0 {
            return Err(AuthError::KeySignatureMismatch);
        }
        let keys = tail / 2;
        let nonce_at = 3 + arity;
        let keys_at = nonce_at + 1;
        let sigs_at = keys_at + keys;
        Ok(Self {
            request_id: &raw[0],
            chaincode: &raw[1],
            channel: &raw[2],
            args: &raw[3..nonce_at],
            nonce: &raw[nonce_at],
            public_keys: &raw[keys_at..sigs_at],
            signatures: &raw[sigs_at..],
            signed: &raw[..sigs_at],
        })
    }

    /// Bytes the signers committed to.
    pub fn message(&self, function: &str) -> Vec<u8> {
        signing_message(function, self.signed)
    }
}

/// `function` followed by every signed position, unseparated.
pub fn signing_message<S: AsRef<str>>(function: &str, signed: &[S]) -> Vec<u8> {
    let mut message = function.as_bytes().to_vec();
    for part in signed {
        message.extend_from_slice(part.as_ref().as_bytes());
    }
    message
}
