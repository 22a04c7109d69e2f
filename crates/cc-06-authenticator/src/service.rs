//! Signed-invocation verification against the ACL and the nonce store.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use cc_02_nonce::{parse_nonce, NonceService};
use shared_crypto::{GostVerifier, KeyType, SignatureVerifier};
use shared_types::config::DEFAULT_NONCE_TTL;
use shared_types::{ChaincodeStub, Sender};

use crate::acl;
use crate::domain::{invariant_account_clean, AuthError, Authenticated, SignedArgs};

/// Verifies the signing envelope of an invocation.
#[derive(Clone, Debug)]
pub struct Authenticator {
    verifier: SignatureVerifier,
    nonce: NonceService,
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new(SignatureVerifier::new(), NonceService::new(DEFAULT_NONCE_TTL))
    }
}

impl Authenticator {
    pub fn new(verifier: SignatureVerifier, nonce: NonceService) -> Self {
        Self { verifier, nonce }
    }

    /// Authenticator with the given nonce window, in seconds.
    pub fn with_nonce_ttl(ttl: u64) -> Self {
        Self::new(SignatureVerifier::new(), NonceService::new(ttl))
    }

    /// Enable GOST signatures.
    pub fn with_gost(mut self, gost: Arc<dyn GostVerifier>) -> Self {
        self.verifier = self.verifier.with_gost(gost);
        self
    }

    /// Verify `raw` for `function` taking `arity` user arguments and record
    /// the nonce under the signer's address.
    #[instrument(skip(self, stub, raw), fields(args = raw.len()))]
    pub fn authenticate(
        &self,
        stub: &mut dyn ChaincodeStub,
        function: &str,
        raw: &[String],
        arity: usize,
    ) -> Result<Authenticated, AuthError> {
        let signed = SignedArgs::split(raw, arity)?;

        let chaincode = stub.chaincode_name();
        if signed.chaincode != chaincode {
            return Err(AuthError::WrongChaincode {
                expected: chaincode,
                got: signed.chaincode.to_string(),
            });
        }
        let channel = stub.channel_id();
        if signed.channel != channel {
            return Err(AuthError::WrongChannel {
                expected: channel,
                got: signed.channel.to_string(),
            });
        }
        let nonce = parse_nonce(signed.nonce)?;

        let acl = acl::check_keys(stub, signed.public_keys)?;
        let address = acl
            .signer_address()
            .map_err(|e| AuthError::Acl(e.to_string()))?;
        invariant_account_clean(&address.to_base58(), &acl.account_info())?;

        let message = signed.message(function);
        let mut valid = 0usize;
        for (i, (key, signature)) in signed
            .public_keys
            .iter()
            .zip(signed.signatures)
            .enumerate()
        {
            if signature.is_empty() {
                continue;
            }
            let key_type = match acl.key_types.get(i) {
                Some(&raw_type) => {
                    KeyType::from_i32(raw_type).map_err(|e| AuthError::key_type(key, e))?
                }
                None => KeyType::Ed25519,
            };
            let key_bytes = decode_base58(key)?;
            let sig_bytes = decode_base58(signature)?;
            if let Err(e) = self
                .verifier
                .verify(key_type, &key_bytes, &message, &sig_bytes)
            {
                warn!(key = %key, %key_type, error = %e, "signature rejected");
                return Err(AuthError::InvalidSignature(key.clone()));
            }
            valid += 1;
        }

        let need = match acl.threshold() {
            0 => signed.public_keys.len(),
            n => n as usize,
        };
        if valid < need {
            return Err(AuthError::Insufficient { got: valid, need });
        }

        self.nonce.check_and_store(stub, &address, nonce)?;
        debug!(address = %address, signatures = valid, "sender authenticated");

        Ok(Authenticated {
            sender: Sender::new(address),
            args: signed.args.to_vec(),
            nonce,
            request_id: signed.request_id.to_string(),
            valid_signatures: valid,
        })
    }
}

fn decode_base58(value: &str) -> Result<Vec<u8>, AuthError> {
    bs58::decode(value)
        .into_vec()
        .map_err(|_| AuthError::Encoding(value.to_string()))
}
