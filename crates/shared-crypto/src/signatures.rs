//! # Ed25519
//!
//! ACL keys of type `ed25519` sign the SHA3-256 digest of the signing message;
//! see [`crate::KeyType::digest`]. Nothing here hashes on its own.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use crate::CryptoError;

const PUBLIC_KEY_LENGTH: usize = 32;
const SIGNATURE_LENGTH: usize = 64;

/// Decoded Ed25519 verifying key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    key: VerifyingKey,
}

impl Ed25519PublicKey {
    /// Decode a key as presented in a signed invocation (base58 already
    /// stripped). Rejects points off the curve.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: &[u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        let key = VerifyingKey::from_bytes(raw).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.key.as_bytes()
    }

    pub fn verify(&self, digest: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        self.key
            .verify(digest, &signature.0)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// Ed25519 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature(Signature);

impl Ed25519Signature {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(CryptoError::InvalidSignature);
        }
        Signature::from_slice(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidSignature)
    }

    pub fn as_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }
}

/// Signing half, for drivers and tests.
pub struct Ed25519KeyPair {
    signing_key: SigningKey,
}

impl Ed25519KeyPair {
    /// Deterministic key pair from a 32-byte seed. The seed copy is wiped.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        let seed = Zeroizing::new(seed);
        Self {
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            key: self.signing_key.verifying_key(),
        }
    }

    /// Sign `digest` as is.
    pub fn sign(&self, digest: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key.sign(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sha3_256;

    #[test]
    fn test_digest_roundtrip() {
        let keys = Ed25519KeyPair::from_seed([1u8; 32]);
        let digest = sha3_256(b"transfer");
        let signature = keys.sign(&digest);

        assert!(keys.public_key().verify(&digest, &signature).is_ok());
        assert_eq!(
            keys.public_key().verify(&sha3_256(b"transfer2"), &signature),
            Err(CryptoError::SignatureVerificationFailed)
        );
    }

    #[test]
    fn test_other_signer_rejected() {
        let alice = Ed25519KeyPair::from_seed([3u8; 32]);
        let bob = Ed25519KeyPair::from_seed([4u8; 32]);
        let signature = alice.sign(b"digest");
        assert!(bob.public_key().verify(b"digest", &signature).is_err());
    }

    #[test]
    fn test_encoding_lengths() {
        assert_eq!(
            Ed25519PublicKey::from_slice(&[0u8; 31]).unwrap_err(),
            CryptoError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        );
        assert!(Ed25519Signature::from_slice(&[0u8; 63]).is_err());

        let keys = Ed25519KeyPair::from_seed([5u8; 32]);
        let public = Ed25519PublicKey::from_slice(keys.public_key().as_bytes()).unwrap();
        assert_eq!(public, keys.public_key());
        let signature = keys.sign(b"d");
        assert_eq!(Ed25519Signature::from_slice(&signature.as_bytes()).unwrap(), signature);
    }
}
