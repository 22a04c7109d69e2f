//! # Contract Configuration
//!
//! JSON configuration supplied at `init` and stored under [`CONFIG_KEY`].
//! Keys are camelCase on the wire.
//!
//! ```json
//! {
//!   "contract": {
//!     "symbol": "TOK",
//!     "robotSKI": "ab01...",
//!     "admin": "2dLk...",
//!     "options": { "disabledFunctions": ["transfer"], "unsafeSwapCancel": false },
//!     "nonceTTL": 10
//!   },
//!   "token": { "name": "Token", "decimals": 8 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::Address;
use crate::errors::{ContractError, StubError};
use crate::keys::CONFIG_KEY;
use crate::stub::ChaincodeStub;

/// Default nonce TTL in seconds.
pub const DEFAULT_NONCE_TTL: u64 = 10;

/// Default cap on items of a multi-asset cross-channel transfer.
pub const DEFAULT_MAX_CHANNEL_TRANSFER_ITEMS: u32 = 100;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Nothing stored under the config key.
    #[error("config not set")]
    NotSet,

    /// Malformed JSON.
    #[error("config parse error: {0}")]
    Parse(String),

    /// Symbol is empty or contains forbidden characters.
    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Robot SKI is missing or not hex.
    #[error("invalid robot SKI: {0}")]
    InvalidRobotSki(String),

    /// State access failed.
    #[error(transparent)]
    Stub(#[from] StubError),
}

impl From<ConfigError> for ContractError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Stub(e) => ContractError::Stub(e),
            other => ContractError::Invocation(other.to_string()),
        }
    }
}

/// Full configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Chaincode-level settings.
    pub contract: ContractConfig,

    /// Token settings for token contracts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenConfig>,

    /// Contract-specific extension, passed through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub ext: serde_json::Value,
}

/// Settings every chaincode carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractConfig {
    /// Channel symbol (upper-case).
    pub symbol: String,

    /// Hex Subject Key Identifier of the driver certificate.
    #[serde(rename = "robotSKI")]
    pub robot_ski: String,

    /// Administrator address for admin-only paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<Address>,

    /// Feature switches.
    #[serde(default)]
    pub options: ChaincodeOptions,

    /// Maximum preimage age in seconds before `batchExecute` refuses it. Zero
    /// disables the check.
    #[serde(default, rename = "txTTL")]
    pub tx_ttl: u32,

    /// Nonce window in seconds.
    #[serde(default = "default_nonce_ttl", rename = "nonceTTL")]
    pub nonce_ttl: u64,

    /// Cap on multi-asset transfer items.
    #[serde(default = "default_max_items")]
    pub max_channel_transfer_items: u32,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            robot_ski: String::new(),
            admin: None,
            options: ChaincodeOptions::default(),
            tx_ttl: 0,
            nonce_ttl: DEFAULT_NONCE_TTL,
            max_channel_transfer_items: DEFAULT_MAX_CHANNEL_TRANSFER_ITEMS,
        }
    }
}

fn default_nonce_ttl() -> u64 {
    DEFAULT_NONCE_TTL
}

fn default_max_items() -> u32 {
    DEFAULT_MAX_CHANNEL_TRANSFER_ITEMS
}

/// Feature switches under `contract.options`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChaincodeOptions {
    /// Registry methods hidden from routing.
    pub disabled_functions: Vec<String>,
    /// Hide single-asset swap methods.
    pub disable_swaps: bool,
    /// Hide multi-asset swap methods.
    pub disable_multi_swaps: bool,
    /// Allow any caller to cancel a swap at any time.
    pub unsafe_swap_cancel: bool,
}

/// Token metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenConfig {
    pub name: String,
    pub decimals: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_setter: Option<Address>,
}

impl Config {
    /// Parse and validate a JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Config =
            serde_json::from_slice(bytes).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check symbol format and robot SKI encoding.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_symbol(&self.contract.symbol) {
            return Err(ConfigError::InvalidSymbol(self.contract.symbol.clone()));
        }
        self.robot_ski()?;
        Ok(())
    }

    /// Decoded robot SKI.
    pub fn robot_ski(&self) -> Result<Vec<u8>, ConfigError> {
        if self.contract.robot_ski.is_empty() {
            return Err(ConfigError::InvalidRobotSki("empty".into()));
        }
        hex::decode(&self.contract.robot_ski)
            .map_err(|e| ConfigError::InvalidRobotSki(e.to_string()))
    }

    /// Channel symbol.
    pub fn symbol(&self) -> &str {
        &self.contract.symbol
    }

    /// Read the stored configuration.
    pub fn load(stub: &mut dyn ChaincodeStub) -> Result<Self, ConfigError> {
        let raw = stub.get_state(CONFIG_KEY)?.ok_or(ConfigError::NotSet)?;
        Self::from_json(&raw)
    }

    /// Validate and store the configuration.
    pub fn store(&self, stub: &mut dyn ChaincodeStub) -> Result<(), ConfigError> {
        self.validate()?;
        stub.put_state(CONFIG_KEY, self.to_json()?)?;
        Ok(())
    }
}

/// Upper-case alphanumerics, optionally joined by single `_` or `-`.
fn is_valid_symbol(symbol: &str) -> bool {
    if symbol.is_empty() {
        return false;
    }
    let mut prev_sep = true;
    for c in symbol.chars() {
        match c {
            'A'..='Z' | '0'..='9' => prev_sep = false,
            '_' | '-' if !prev_sep => prev_sep = true,
            _ => return false,
        }
    }
    !prev_sep
}
