//! # Decoded Arguments
//!
//! [`ArgValue`] is the typed result of decoding one positional argument;
//! [`Args`] is the ordered list a handler receives.

use serde::de::DeserializeOwned;

use shared_types::{Address, ContractError, U256};

/// One decoded argument.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Str(String),
    Address(Address),
    BigInt(U256),
    U64(u64),
    I64(i64),
    Bool(bool),
    Bytes(Vec<u8>),
    Json(serde_json::Value),
}

impl ArgValue {
    /// Kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Address(_) => "address",
            Self::BigInt(_) => "big int",
            Self::U64(_) => "u64",
            Self::I64(_) => "i64",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
        }
    }
}

/// Decoded arguments in declared order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Args(Vec<ArgValue>);

macro_rules! accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Argument `i` as `", stringify!($ty), "`.")]
        pub fn $name(&self, i: usize) -> Result<$ty, ContractError> {
            match self.get(i)? {
                ArgValue::$variant(v) => Ok(v.clone()),
                other => Err(mismatch(i, stringify!($variant), other)),
            }
        }
    };
}

impl Args {
    pub fn new(values: Vec<ArgValue>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.0.iter()
    }

    /// Raw decoded value at `i`.
    pub fn get(&self, i: usize) -> Result<&ArgValue, ContractError> {
        self.0
            .get(i)
            .ok_or_else(|| ContractError::InvalidArgument(format!("missing argument {i}")))
    }

    /// Argument `i` as a string slice.
    pub fn str(&self, i: usize) -> Result<&str, ContractError> {
        match self.get(i)? {
            ArgValue::Str(s) => Ok(s),
            other => Err(mismatch(i, "Str", other)),
        }
    }

    accessor!(address, Address, Address);
    accessor!(big_int, BigInt, U256);
    accessor!(u64, U64, u64);
    accessor!(i64, I64, i64);
    accessor!(bool, Bool, bool);
    accessor!(bytes, Bytes, Vec<u8>);

    /// Argument `i` deserialized into `T`.
    pub fn json<T: DeserializeOwned>(&self, i: usize) -> Result<T, ContractError> {
        match self.get(i)? {
            ArgValue::Json(v) => serde_json::from_value(v.clone())
                .map_err(|e| ContractError::InvalidArgument(e.to_string())),
            other => Err(mismatch(i, "Json", other)),
        }
    }
}

fn mismatch(i: usize, expected: &str, got: &ArgValue) -> ContractError {
    ContractError::InvalidArgument(format!(
        "argument {i}: expected {expected}, got {}",
        got.kind()
    ))
}

impl From<Vec<ArgValue>> for Args {
    fn from(values: Vec<ArgValue>) -> Self {
        Self(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let args = Args::new(vec![
            ArgValue::Str("a".into()),
            ArgValue::BigInt(U256::from(5u64)),
            ArgValue::Json(serde_json::json!([1, 2])),
        ]);
        assert_eq!(args.str(0).unwrap(), "a");
        assert_eq!(args.big_int(1).unwrap(), U256::from(5u64));
        assert_eq!(args.json::<Vec<u8>>(2).unwrap(), vec![1, 2]);
        assert!(args.u64(0).is_err());
        assert_eq!(
            args.str(3).unwrap_err().to_string(),
            "invalid argument value: missing argument 3"
        );
    }
}
