//! # Core Domain Entities
//!
//! Identifiers and value types shared by every chaincode subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`, `Sender`
//! - **Time**: `Timestamp`
//! - **Amounts**: `U256` with minimal big-endian byte encoding

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;
use std::str::FromStr;

use crate::errors::AddressError;
use crate::proto::AddressProto;

// Re-export U256 from primitive-types for use across all subsystems
pub use primitive_types::U256;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 32-byte digest (SHA3-256, Keccak-256 or Streebog-256).
pub type Hash = [u8; 32];

/// Length of an address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// A 32-byte opaque account identifier derived from public keys.
///
/// The external form is Base58Check over all 32 bytes: the first byte plays
/// the role of the version byte, followed by a 4-byte double SHA-256 checksum.
/// Equality is bytewise and every external form round-trips to the same bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// The all-zero address. Never a valid signer.
    pub const ZERO: Self = Self([0u8; ADDRESS_LENGTH]);

    /// Wrap raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build from a byte slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; ADDRESS_LENGTH] =
            bytes
                .try_into()
                .map_err(|_| AddressError::InvalidLength {
                    expected: ADDRESS_LENGTH,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    /// Derive an address from one or more public keys.
    ///
    /// A single key hashes directly; a multisig set hashes the bytewise-sorted
    /// concatenation so the result does not depend on key order.
    pub fn from_public_keys<K: AsRef<[u8]>>(keys: &[K]) -> Self {
        let mut sorted: Vec<&[u8]> = keys.iter().map(AsRef::as_ref).collect();
        sorted.sort_unstable();
        let mut hasher = Sha3_256::new();
        for key in sorted {
            hasher.update(key);
        }
        Self(hasher.finalize().into())
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// True for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LENGTH]
    }

    /// Base58Check external form.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }

    /// Parse the Base58Check external form.
    pub fn from_base58(s: &str) -> Result<Self, AddressError> {
        if s.is_empty() {
            return Err(AddressError::Empty);
        }
        let bytes = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base58(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Address> for AddressProto {
    fn from(address: Address) -> Self {
        AddressProto {
            user_id: String::new(),
            address: address.0.to_vec(),
            is_industrial: false,
            is_multisig: false,
        }
    }
}

impl TryFrom<&AddressProto> for Address {
    type Error = AddressError;

    fn try_from(proto: &AddressProto) -> Result<Self, Self::Error> {
        Self::from_slice(&proto.address)
    }
}

/// The authenticated caller of a method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Sender(Address);

impl Sender {
    /// Wrap an authenticated address.
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// The underlying address.
    pub fn address(&self) -> &Address {
        &self.0
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Address> for Sender {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

// =============================================================================
// CLUSTER B: TIME
// =============================================================================

/// Host transaction timestamp (protobuf `Timestamp` shape).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds. Batches may push this past 1e9 to keep
    /// sibling transactions strictly ordered.
    pub nanos: i64,
}

impl Timestamp {
    /// Create a timestamp.
    pub const fn new(seconds: i64, nanos: i64) -> Self {
        Self { seconds, nanos }
    }

    /// Nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i64 {
        self.seconds
            .saturating_mul(1_000_000_000)
            .saturating_add(self.nanos)
    }

    /// Whole seconds, clamped at zero.
    pub fn unix_secs(&self) -> u64 {
        u64::try_from(self.seconds).unwrap_or(0)
    }
}

// =============================================================================
// CLUSTER C: AMOUNTS
// =============================================================================

/// Encode an amount as minimal big-endian bytes (zero encodes as empty).
pub fn amount_to_bytes(amount: &U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    amount.to_big_endian(&mut buf);
    let first = buf.iter().position(|b| *b != 0).unwrap_or(buf.len());
    buf[first..].to_vec()
}

/// Decode big-endian bytes into an amount.
pub fn amount_from_bytes(bytes: &[u8]) -> Result<U256, AddressError> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > 32 {
        return Err(AddressError::InvalidLength {
            expected: 32,
            actual: significant.len(),
        });
    }
    Ok(U256::from_big_endian(significant))
}

// =============================================================================
// CLUSTER D: TOKENS AND CHANNELS
// =============================================================================

/// Native channel symbol of a token: the text before the first `_`,
/// upper-cased. `"tok_group1"` belongs to channel `"TOK"`.
pub fn token_symbol(token: &str) -> String {
    token
        .split('_')
        .next()
        .unwrap_or_default()
        .to_uppercase()
}

/// Channel names compare case-insensitively.
pub fn same_channel(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_base58_round_trip() {
        let address = Address::new([7u8; 32]);
        let encoded = address.to_base58();
        let decoded = Address::from_base58(&encoded).unwrap();
        assert_eq!(decoded, address);
        assert_eq!(decoded.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn test_address_checksum_detects_typo() {
        let encoded = Address::new([9u8; 32]).to_base58();
        let mut chars: Vec<char> = encoded.chars().collect();
        chars[3] = if chars[3] == '2' { '3' } else { '2' };
        let tampered: String = chars.into_iter().collect();
        assert!(Address::from_base58(&tampered).is_err());
    }

    #[test]
    fn test_address_empty_string_rejected() {
        assert!(matches!(Address::from_base58(""), Err(AddressError::Empty)));
    }

    #[test]
    fn test_multisig_address_is_order_independent() {
        let a = [1u8; 32];
        let b = [2u8; 32];
        assert_eq!(
            Address::from_public_keys(&[a, b]),
            Address::from_public_keys(&[b, a])
        );
        assert_ne!(Address::from_public_keys(&[a]), Address::from_public_keys(&[b]));
    }

    #[test]
    fn test_amount_bytes_minimal() {
        assert!(amount_to_bytes(&U256::zero()).is_empty());
        assert_eq!(amount_to_bytes(&U256::from(256u64)), vec![1, 0]);
        assert_eq!(amount_from_bytes(&[0, 0, 1, 0]).unwrap(), U256::from(256u64));
    }

    #[test]
    fn test_amount_from_oversized_bytes_fails() {
        assert!(amount_from_bytes(&[1u8; 33]).is_err());
    }

    #[test]
    fn test_token_symbol_root() {
        assert_eq!(token_symbol("tok_group1"), "TOK");
        assert_eq!(token_symbol("USD"), "USD");
        assert!(same_channel("usd", "USD"));
    }

    #[test]
    fn test_timestamp_nanos() {
        let ts = Timestamp::new(2, 5);
        assert_eq!(ts.as_nanos(), 2_000_000_005);
        assert_eq!(Timestamp::new(-1, 0).unix_secs(), 0);
    }
}
