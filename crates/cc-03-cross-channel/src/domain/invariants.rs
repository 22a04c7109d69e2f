//! # Domain Invariants
//!
//! Preconditions checked before any balance moves.

use shared_types::{same_channel, token_symbol, Address};

use super::entities::{Direction, TransferItem};
use super::errors::CrossChannelError;

/// Invariant: source and target differ.
pub fn invariant_distinct_channels(from: &str, to: &str) -> Result<(), CrossChannelError> {
    if to.is_empty() || same_channel(from, to) {
        return Err(CrossChannelError::InvalidChannel(to.to_string()));
    }
    Ok(())
}

/// Invariant: the token is native to one of the two channels. Its side
/// decides the direction.
pub fn invariant_direction(token: &str, from: &str, to: &str) -> Result<Direction, CrossChannelError> {
    let root = token_symbol(token);
    if same_channel(&root, from) {
        Ok(Direction::Forward)
    } else if same_channel(&root, to) {
        Ok(Direction::Reverse)
    } else {
        Err(CrossChannelError::IncorrectToken {
            token: token.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Invariant: item count within `1..=max` and every item shares one root.
/// Returns the common direction.
pub fn invariant_items(
    items: &[TransferItem],
    from: &str,
    to: &str,
    max: usize,
) -> Result<Direction, CrossChannelError> {
    let Some(first) = items.first() else {
        return Err(CrossChannelError::InvalidItemCount { count: 0, max });
    };
    if items.len() > max {
        return Err(CrossChannelError::InvalidItemCount {
            count: items.len(),
            max,
        });
    }
    let root = token_symbol(&first.token);
    if items.iter().any(|i| token_symbol(&i.token) != root) {
        return Err(CrossChannelError::MixedTokens);
    }
    invariant_direction(&first.token, from, to)
}

/// Invariant: admin paths are called by the configured admin.
pub fn invariant_admin(sender: &Address, admin: Option<&Address>) -> Result<(), CrossChannelError> {
    match admin {
        Some(admin) if admin == sender => Ok(()),
        _ => Err(CrossChannelError::Unauthorized),
    }
}
