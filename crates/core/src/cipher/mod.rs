//! Authenticated encryption for individual secret strings.
//!
//! Secrets are sealed with AES-256-GCM under a key derived from the server
//! secret (its SHA-256 digest). The encoded form is
//! `base64(nonce || tag || ciphertext)` with a fresh random 96-bit nonce per
//! call, so the same plaintext never encrypts to the same string twice.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{generic_array::GenericArray, Aead, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha256};

use crate::errors::CipherError;
use crate::{Error, Result};

/// Nonce length for AES-GCM (96 bits).
const NONCE_LEN: usize = 12;
/// Authentication tag length for AES-GCM (128 bits).
const TAG_LEN: usize = 16;

/// Symmetric cipher for secret material, keyed by the server secret.
///
/// One instance is built at startup and shared; the derived key never leaves
/// this struct and is deliberately not printable.
pub struct SecretCipher {
    key: [u8; 32],
}

impl SecretCipher {
    /// Derives the AES key from the server secret.
    pub fn new(server_secret: &str) -> Self {
        let digest = Sha256::digest(server_secret.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key }
    }

    /// Encrypts a secret string into its transportable encoded form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let sealed = cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| Error::Unexpected("secret encryption failed".to_string()))?;
        // The AEAD output is ciphertext || tag; the stored layout is
        // nonce || tag || ciphertext, so the tag moves to the front.
        let (body, tag) = sealed.split_at(sealed.len() - TAG_LEN);

        let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(tag);
        out.extend_from_slice(body);
        Ok(BASE64.encode(out))
    }

    /// Decrypts an encoded secret, failing closed on any tamper or key
    /// mismatch.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let raw = BASE64
            .decode(encoded)
            .map_err(|e| CipherError::Malformed(format!("invalid base64: {e}")))?;
        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Malformed("ciphertext too short".to_string()).into());
        }

        let (nonce_bytes, rest) = raw.split_at(NONCE_LEN);
        let (tag, body) = rest.split_at(TAG_LEN);
        let mut sealed = Vec::with_capacity(rest.len());
        sealed.extend_from_slice(body);
        sealed.extend_from_slice(tag);

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&self.key));
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext = cipher
            .decrypt(nonce, sealed.as_ref())
            .map_err(|_| CipherError::Integrity)?;

        String::from_utf8(plaintext)
            .map_err(|_| CipherError::Malformed("plaintext is not valid UTF-8".to_string()).into())
    }
}
