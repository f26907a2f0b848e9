//! Signer credential handling
//!
//! Exactly one accepted encoding: base64 of the 64-byte ed25519 keypair
//! (secret key followed by public key). Anything else is rejected up front
//! as `SignerNotConfigured` rather than sniffed against alternative formats.

use crate::error::AnchorError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use ed25519_dalek::{Signature, Signer, SigningKey, KEYPAIR_LENGTH};

/// A parsed signing credential for ledger transactions.
///
/// Holds the ed25519 keypair used to sign proof memos. The debug
/// representation never exposes key material.
#[derive(Clone)]
pub struct SignerCredential {
    key: SigningKey,
}

impl SignerCredential {
    /// Parse a credential from its documented encoding: base64 of the
    /// 64-byte ed25519 keypair (secret || public).
    pub fn from_base64(encoded: &str) -> Result<Self, AnchorError> {
        let bytes = BASE64.decode(encoded.trim()).map_err(|e| {
            AnchorError::signer_not_configured(format!("credential is not valid base64: {e}"))
        })?;
        let keypair: [u8; KEYPAIR_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
            AnchorError::signer_not_configured(format!(
                "credential must decode to {KEYPAIR_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        let key = SigningKey::from_keypair_bytes(&keypair).map_err(|e| {
            AnchorError::signer_not_configured(format!("inconsistent keypair: {e}"))
        })?;
        Ok(Self { key })
    }

    /// Build a credential directly from a signing key
    pub fn from_signing_key(key: SigningKey) -> Self {
        Self { key }
    }

    /// Render the credential in its documented base64 encoding
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.key.to_keypair_bytes())
    }

    /// The signer's public identity, hex-encoded
    pub fn public_identity(&self) -> String {
        hex::encode(self.key.verifying_key().as_bytes())
    }

    /// Sign a proof memo
    pub fn sign(&self, memo: &[u8]) -> Signature {
        self.key.sign(memo)
    }
}

impl std::fmt::Debug for SignerCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerCredential")
            .field("public_identity", &self.public_identity())
            .finish_non_exhaustive()
    }
}
