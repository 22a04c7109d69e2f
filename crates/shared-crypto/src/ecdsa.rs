//! # ECDSA Signatures (secp256k1)
//!
//! Verification over a Keccak-256 prehash. Public keys are SEC1 (compressed
//! or uncompressed); signatures are 64-byte `r||s`. High-S signatures are
//! normalised before verification so both forms of the same signature pass.

use crate::CryptoError;
use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};
use zeroize::Zeroize;

/// secp256k1 public key in SEC1 encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey(Vec<u8>);

impl Secp256k1PublicKey {
    /// Create from SEC1 bytes (33 or 65 bytes).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        // Validate it's a valid point
        VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes.to_vec()))
    }

    /// Get raw SEC1 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Verify a signature over a 32-byte prehash.
    pub fn verify_prehash(
        &self,
        prehash: &[u8; 32],
        signature: &Secp256k1Signature,
    ) -> Result<(), CryptoError> {
        let verifying_key =
            VerifyingKey::from_sec1_bytes(&self.0).map_err(|_| CryptoError::InvalidPublicKey)?;

        let sig = Signature::from_slice(&signature.0).map_err(|_| CryptoError::InvalidSignature)?;
        let sig = sig.normalize_s().unwrap_or(sig);

        verifying_key
            .verify_prehash(prehash, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// ECDSA signature (64 bytes, r||s format).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Secp256k1Signature([u8; 64]);

impl Secp256k1Signature {
    /// Create from bytes (64 bytes).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Create from a slice. A trailing recovery byte is ignored.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let body = match bytes.len() {
            64 => bytes,
            65 => &bytes[..64],
            _ => return Err(CryptoError::InvalidSignature),
        };
        let mut arr = [0u8; 64];
        arr.copy_from_slice(body);
        Ok(Self(arr))
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let signing_key =
            SigningKey::from_bytes((&bytes).into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Get public key (compressed SEC1, 33 bytes).
    pub fn public_key(&self) -> Secp256k1PublicKey {
        let verifying_key = self.signing_key.verifying_key();
        Secp256k1PublicKey(verifying_key.to_sec1_bytes().to_vec())
    }

    /// Sign a 32-byte prehash (deterministic RFC 6979, low-S).
    pub fn sign_prehash(&self, prehash: &[u8; 32]) -> Result<Secp256k1Signature, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(prehash)
            .map_err(|_| CryptoError::InvalidSignature)?;
        let bytes: [u8; 64] = sig.to_bytes().into();
        Ok(Secp256k1Signature(bytes))
    }
}

impl Drop for Secp256k1KeyPair {
    fn drop(&mut self) {
        // Zeroize secret key material
        let mut bytes: [u8; 32] = self.signing_key.to_bytes().into();
        bytes.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::keccak256;

    #[test]
    fn test_sign_verify_prehash() {
        let keypair = Secp256k1KeyPair::from_bytes([0xABu8; 32]).unwrap();
        let digest = keccak256(b"Hello, secp256k1!");

        let signature = keypair.sign_prehash(&digest).unwrap();
        let result = keypair.public_key().verify_prehash(&digest, &signature);

        assert!(result.is_ok());
    }

    #[test]
    fn test_wrong_digest_fails() {
        let keypair = Secp256k1KeyPair::from_bytes([0x11u8; 32]).unwrap();

        let signature = keypair.sign_prehash(&keccak256(b"message1")).unwrap();
        let result = keypair
            .public_key()
            .verify_prehash(&keccak256(b"message2"), &signature);

        assert!(result.is_err());
    }

    #[test]
    fn test_high_s_signature_accepted() {
        let keypair = Secp256k1KeyPair::from_bytes([0x22u8; 32]).unwrap();
        let digest = keccak256(b"normalise");
        let low = keypair.sign_prehash(&digest).unwrap();

        // s' = n - s
        let sig = Signature::from_slice(low.as_bytes()).unwrap();
        let (r, s) = sig.split_scalars();
        let s_high = -(*s);
        let high = Signature::from_scalars(r.to_bytes(), s_high.to_bytes()).unwrap();
        assert!(high.normalize_s().is_some());
        let high_bytes: [u8; 64] = high.to_bytes().into();

        let result = keypair
            .public_key()
            .verify_prehash(&digest, &Secp256k1Signature::from_bytes(high_bytes));
        assert!(result.is_ok());
    }

    #[test]
    fn test_recovery_byte_ignored() {
        let mut raw = [7u8; 65];
        raw[64] = 1;
        let sig = Secp256k1Signature::from_slice(&raw).unwrap();
        assert_eq!(sig.as_bytes(), &[7u8; 64]);
        assert!(Secp256k1Signature::from_slice(&[0u8; 10]).is_err());
    }
}
