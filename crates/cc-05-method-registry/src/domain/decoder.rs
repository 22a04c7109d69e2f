//! # Argument Decoders
//!
//! A [`ParamDecoder`] turns one positional string into an [`ArgValue`].
//! Decoders opt into capabilities by overriding the matching method;
//! [`decode_arg`] tries them in a fixed order and the first capability a
//! decoder provides decides the outcome:
//!
//! 1. `passthrough`   - the raw string is the value
//! 2. `decode_bytes`  - parse the raw bytes
//! 3. `decode_json`   - only when the raw string is valid JSON
//! 4. `decode_text`   - parse as text
//! 5. `decode_binary` - parse as an encoded byte string
//!
//! `check` runs on the decoded value afterwards.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use shared_types::{Address, U256};

use super::errors::RegistryError;
use super::value::ArgValue;

/// Outcome of a capability: `None` when the decoder does not provide it.
pub type Capability = Option<Result<ArgValue, String>>;

/// Decoder for one parameter type.
pub trait ParamDecoder: Send + Sync {
    /// Type name used in error messages.
    fn type_name(&self) -> &'static str;

    fn passthrough(&self, _raw: &str) -> Option<ArgValue> {
        None
    }

    fn decode_bytes(&self, _raw: &[u8]) -> Capability {
        None
    }

    fn decode_json(&self, _value: &Value) -> Capability {
        None
    }

    fn decode_text(&self, _raw: &str) -> Capability {
        None
    }

    fn decode_binary(&self, _raw: &str) -> Capability {
        None
    }

    /// Validate a decoded value.
    fn check(&self, _value: &ArgValue) -> Result<(), String> {
        Ok(())
    }
}

/// Run the capability chain of `decoder` on `raw`.
pub fn decode_arg(decoder: &dyn ParamDecoder, raw: &str) -> Result<ArgValue, RegistryError> {
    let decoded = if let Some(value) = decoder.passthrough(raw) {
        Ok(value)
    } else if let Some(result) = decoder.decode_bytes(raw.as_bytes()) {
        result
    } else if let Some(result) = serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|v| decoder.decode_json(&v))
    {
        result
    } else if let Some(result) = decoder.decode_text(raw) {
        result
    } else if let Some(result) = decoder.decode_binary(raw) {
        result
    } else {
        Err(format!("{raw:?} is not a valid {}", decoder.type_name()))
    };
    let value = decoded.and_then(|value| decoder.check(&value).map(|()| value));
    if let Err(reason) = &value {
        debug!(kind = decoder.type_name(), %reason, "argument rejected");
    }
    value.map_err(RegistryError::InvalidArgument)
}

/// Validation hook for JSON argument types.
pub trait Check {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Check for Value {}
impl<T: Check> Check for Vec<T> {
    fn check(&self) -> Result<(), String> {
        self.iter().try_for_each(Check::check)
    }
}
impl Check for String {}

// =============================================================================
// BUILT-IN DECODERS
// =============================================================================

/// Plain string.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringArg;

impl ParamDecoder for StringArg {
    fn type_name(&self) -> &'static str {
        "string"
    }

    fn passthrough(&self, raw: &str) -> Option<ArgValue> {
        Some(ArgValue::Str(raw.to_string()))
    }
}

/// Base58Check address.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddressArg;

impl ParamDecoder for AddressArg {
    fn type_name(&self) -> &'static str {
        "address"
    }

    fn decode_bytes(&self, raw: &[u8]) -> Capability {
        let text = match std::str::from_utf8(raw) {
            Ok(text) => text,
            Err(e) => return Some(Err(e.to_string())),
        };
        Some(
            Address::from_base58(text)
                .map(ArgValue::Address)
                .map_err(|e| e.to_string()),
        )
    }

    fn check(&self, value: &ArgValue) -> Result<(), String> {
        match value {
            ArgValue::Address(a) if a.is_zero() => Err("zero address".into()),
            _ => Ok(()),
        }
    }
}

/// Non-negative 256-bit integer, as JSON number, JSON string or decimal text.
#[derive(Clone, Copy, Debug, Default)]
pub struct BigIntArg;

impl BigIntArg {
    fn parse(text: &str) -> Result<ArgValue, String> {
        if text.starts_with('-') {
            return Err(format!("negative value {text}"));
        }
        U256::from_dec_str(text)
            .map(ArgValue::BigInt)
            .map_err(|_| format!("{text:?} is not a decimal integer"))
    }
}

impl ParamDecoder for BigIntArg {
    fn type_name(&self) -> &'static str {
        "big int"
    }

    fn decode_json(&self, value: &Value) -> Capability {
        match value {
            // Numbers past u64 arrive as floats; the raw text keeps every digit.
            Value::Number(n) => n.as_u64().map(|v| Ok(ArgValue::BigInt(U256::from(v)))),
            Value::String(s) => Some(Self::parse(s)),
            _ => Some(Err(format!("{value} is not a number"))),
        }
    }

    fn decode_text(&self, raw: &str) -> Capability {
        Some(Self::parse(raw))
    }
}

/// Unsigned 64-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct U64Arg;

impl ParamDecoder for U64Arg {
    fn type_name(&self) -> &'static str {
        "u64"
    }

    fn decode_text(&self, raw: &str) -> Capability {
        Some(raw.parse().map(ArgValue::U64).map_err(|e| format!("{raw:?}: {e}")))
    }
}

/// Signed 64-bit integer.
#[derive(Clone, Copy, Debug, Default)]
pub struct I64Arg;

impl ParamDecoder for I64Arg {
    fn type_name(&self) -> &'static str {
        "i64"
    }

    fn decode_text(&self, raw: &str) -> Capability {
        Some(raw.parse().map(ArgValue::I64).map_err(|e| format!("{raw:?}: {e}")))
    }
}

/// `true` / `false`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolArg;

impl ParamDecoder for BoolArg {
    fn type_name(&self) -> &'static str {
        "bool"
    }

    fn decode_json(&self, value: &Value) -> Capability {
        Some(
            value
                .as_bool()
                .map(ArgValue::Bool)
                .ok_or_else(|| format!("{value} is not a bool")),
        )
    }
}

/// Hex-encoded bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct HexBytesArg;

impl ParamDecoder for HexBytesArg {
    fn type_name(&self) -> &'static str {
        "hex bytes"
    }

    fn decode_binary(&self, raw: &str) -> Capability {
        Some(
            hex::decode(raw)
                .map(ArgValue::Bytes)
                .map_err(|e| format!("{raw:?}: {e}")),
        )
    }
}

/// JSON document deserializing into `T`; `T::check` validates it.
pub struct JsonArg<T>(PhantomData<fn() -> T>);

impl<T> JsonArg<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for JsonArg<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Check + 'static> ParamDecoder for JsonArg<T> {
    fn type_name(&self) -> &'static str {
        "json"
    }

    fn decode_json(&self, value: &Value) -> Capability {
        Some(
            serde_json::from_value::<T>(value.clone())
                .map(|_| ArgValue::Json(value.clone()))
                .map_err(|e| e.to_string()),
        )
    }

    fn check(&self, value: &ArgValue) -> Result<(), String> {
        match value {
            ArgValue::Json(v) => serde_json::from_value::<T>(v.clone())
                .map_err(|e| e.to_string())?
                .check(),
            other => Err(format!("expected json, got {}", other.kind())),
        }
    }
}
