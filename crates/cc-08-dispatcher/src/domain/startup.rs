//! # Startup Modes
//!
//! A chaincode either dials the peer (`Chaincode`) or runs as an external
//! service the peer dials (`Server`). Server mode is selected by
//! `CHAINCODE_SERVER_ADDRESS`.
//!
//! TLS material for server mode comes from the environment or from
//! [`TlsOptions`]; every value found in the environment replaces its
//! programmatic counterpart. Each variable may instead be given as a file
//! path through the `_FILE` suffixed name.
//!
//! | Variable | Content |
//! |----------|---------|
//! | `CHAINCODE_TLS_KEY` | private key (PEM) |
//! | `CHAINCODE_TLS_CERT` | certificate (PEM) |
//! | `CHAINCODE_TLS_CLIENT_CA_CERTS` | client CA bundle (PEM) |

use thiserror::Error;

pub const SERVER_ADDRESS_ENV: &str = "CHAINCODE_SERVER_ADDRESS";
pub const TLS_KEY_ENV: &str = "CHAINCODE_TLS_KEY";
pub const TLS_CERT_ENV: &str = "CHAINCODE_TLS_CERT";
pub const TLS_CLIENT_CA_CERTS_ENV: &str = "CHAINCODE_TLS_CLIENT_CA_CERTS";

/// Suffix of the file-path form of a variable.
const FILE_SUFFIX: &str = "_FILE";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("reading {var}: {reason}")]
    Read { var: String, reason: String },

    /// Key without certificate or the reverse.
    #[error("TLS key and certificate must be set together")]
    IncompleteTls,
}

/// Programmatic TLS material.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TlsOptions {
    pub key: Option<Vec<u8>>,
    pub cert: Option<Vec<u8>>,
    pub client_ca_certs: Option<Vec<u8>>,
}

/// Resolved TLS material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsConfig {
    pub key: Vec<u8>,
    pub cert: Vec<u8>,
    /// Client authentication is required when present.
    pub client_ca_certs: Option<Vec<u8>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartupMode {
    /// Connect to the peer.
    Chaincode,
    /// Listen on `address`.
    Server {
        address: String,
        tls: Option<TlsConfig>,
    },
}

impl StartupMode {
    /// Resolve the mode from `env` (variable lookup) and `read` (file
    /// loader), falling back to `options` for TLS values the environment
    /// does not set.
    pub fn resolve<E, R>(env: E, read: R, options: &TlsOptions) -> Result<Self, StartupError>
    where
        E: Fn(&str) -> Option<String>,
        R: Fn(&str) -> std::io::Result<Vec<u8>>,
    {
        let Some(address) = env(SERVER_ADDRESS_ENV).filter(|a| !a.is_empty()) else {
            return Ok(Self::Chaincode);
        };
        let key = lookup(&env, &read, TLS_KEY_ENV)?.or_else(|| options.key.clone());
        let cert = lookup(&env, &read, TLS_CERT_ENV)?.or_else(|| options.cert.clone());
        let client_ca_certs = lookup(&env, &read, TLS_CLIENT_CA_CERTS_ENV)?
            .or_else(|| options.client_ca_certs.clone());

        let tls = match (key, cert) {
            (Some(key), Some(cert)) => Some(TlsConfig {
                key,
                cert,
                client_ca_certs,
            }),
            (None, None) => None,
            _ => return Err(StartupError::IncompleteTls),
        };
        Ok(Self::Server { address, tls })
    }

    /// Resolve from the process environment and the file system.
    pub fn from_env(options: &TlsOptions) -> Result<Self, StartupError> {
        Self::resolve(|var| std::env::var(var).ok(), |path| std::fs::read(path), options)
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server { .. })
    }
}

/// Inline value of `var`, else the content of the file named by `var_FILE`.
fn lookup<E, R>(env: &E, read: &R, var: &str) -> Result<Option<Vec<u8>>, StartupError>
where
    E: Fn(&str) -> Option<String>,
    R: Fn(&str) -> std::io::Result<Vec<u8>>,
{
    if let Some(value) = env(var).filter(|v| !v.is_empty()) {
        return Ok(Some(value.into_bytes()));
    }
    let file_var = format!("{var}{FILE_SUFFIX}");
    match env(&file_var).filter(|v| !v.is_empty()) {
        Some(path) => read(&path).map(Some).map_err(|e| StartupError::Read {
            var: file_var,
            reason: e.to_string(),
        }),
        None => Ok(None),
    }
}
