//! Authentication outcome.

use shared_types::proto::AccountInfo;
use shared_types::Sender;

/// A verified invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authenticated {
    pub sender: Sender,
    /// User arguments, without the signing envelope.
    pub args: Vec<String>,
    pub nonce: u64,
    pub request_id: String,
    /// Signatures that verified.
    pub valid_signatures: usize,
}

/// Reject black- or graylisted accounts.
pub fn invariant_account_clean(address: &str, info: &AccountInfo) -> Result<(), super::AuthError> {
    if info.black_listed {
        return Err(super::AuthError::Blacklisted(address.to_string()));
    }
    if info.gray_listed {
        return Err(super::AuthError::Graylisted(address.to_string()));
    }
    Ok(())
}
