// ABOUTME: Password hashing (bcrypt) and field encryption (AES-256-GCM) for secrets at rest
// ABOUTME: FieldCipher output is base64(nonce || ciphertext || tag), one fresh nonce per call
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CredVault Contributors

//! Cryptographic engine for the vault.
//!
//! Two independent concerns live here: bcrypt password hashing for user
//! credentials, and AES-256-GCM field encryption for secrets stored in the
//! database. Both are pure per call and safe for unbounded concurrent use.

use std::env;

use base64::engine::general_purpose;
use base64::Engine;
use bcrypt::DEFAULT_COST;
use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::errors::{AppError, AppResult};

/// Required length of the field-encryption key in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes, prepended to every ciphertext.
const NONCE_LEN: usize = 12;

/// Lowest cost bcrypt accepts.
const MIN_COST: u32 = 4;

/// Highest cost bcrypt accepts.
const MAX_COST: u32 = 31;

/// Resolves the bcrypt cost from the `BCRYPT_COST` env var.
///
/// Non-numeric values and values outside [`MIN_COST`, `MAX_COST`] fall back
/// to [`DEFAULT_COST`], so a misconfigured environment degrades to the
/// library default instead of rejecting registrations.
fn bcrypt_cost() -> u32 {
    env::var("BCRYPT_COST")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|cost| (MIN_COST..=MAX_COST).contains(cost))
        .unwrap_or(DEFAULT_COST)
}

/// Hashes a password with bcrypt at the configured cost.
///
/// The returned string embeds the salt and cost, so verification needs no
/// extra state.
///
/// # Errors
///
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt_cost())
        .map_err(|e| AppError::crypto(format!("Password hashing failed: {e}")))
}

/// Verifies a password against a stored bcrypt hash.
///
/// Malformed hashes and mismatches both return `false`; callers cannot tell
/// the two apart. Run through `tokio::task::spawn_blocking` on request paths.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// AES-256-GCM cipher for secret fields.
///
/// Holds optional key material so a server without `DATA_ENCRYPTION_KEY`
/// still starts; every encrypt/decrypt call then fails with a key error
/// instead. Key bytes are zeroized on drop.
#[derive(Clone)]
pub struct FieldCipher {
    key: Option<Zeroizing<Vec<u8>>>,
}

impl FieldCipher {
    /// Creates a cipher from explicit key material.
    #[must_use]
    pub fn new(key: Option<Vec<u8>>) -> Self {
        Self {
            key: key.map(Zeroizing::new),
        }
    }

    /// Creates a cipher from the `DATA_ENCRYPTION_KEY` env var.
    ///
    /// The key is the raw bytes of the variable's value and must be exactly
    /// 32 bytes long; length is checked per call, not here.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(env::var("DATA_ENCRYPTION_KEY").ok().map(String::into_bytes))
    }

    /// Returns the key bytes after checking presence and length.
    fn key_bytes(&self) -> AppResult<&[u8]> {
        let key = self
            .key
            .as_ref()
            .ok_or_else(|| AppError::key("Encryption key is not configured"))?;
        if key.len() != KEY_LEN {
            return Err(AppError::key(format!(
                "Encryption key must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        Ok(key)
    }

    /// Encrypts a plaintext field value.
    ///
    /// Output is base64 of `nonce || ciphertext || tag` with a fresh random
    /// nonce, so encrypting the same value twice yields different strings.
    ///
    /// # Errors
    ///
    /// Returns a key error if the key is unset or not 32 bytes, a crypto
    /// error if sealing fails.
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let key_bytes = self.key_bytes()?;

        let rng = SystemRandom::new();
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rng.fill(&mut nonce_bytes)
            .map_err(|e| AppError::crypto(format!("Failed to generate nonce: {e}")))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let unbound_key = UnboundKey::new(&AES_256_GCM, key_bytes)
            .map_err(|e| AppError::crypto(format!("Failed to create encryption key: {e}")))?;
        let key = LessSafeKey::new(unbound_key);

        let mut data = plaintext.as_bytes().to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut data)
            .map_err(|e| AppError::crypto(format!("Failed to encrypt field: {e}")))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(data);

        Ok(general_purpose::STANDARD.encode(combined))
    }

    /// Decrypts a stored field value.
    ///
    /// # Errors
    ///
    /// Returns a key error if the key is unset or not 32 bytes, a crypto
    /// error if the input is not base64, is shorter than a nonce, fails tag
    /// authentication (tampered data or wrong key), or decrypts to non-UTF-8.
    pub fn decrypt(&self, ciphertext: &str) -> AppResult<String> {
        let key_bytes = self.key_bytes()?;

        let combined = general_purpose::STANDARD
            .decode(ciphertext)
            .map_err(|e| AppError::crypto(format!("Failed to decode ciphertext: {e}")))?;

        if combined.len() < NONCE_LEN {
            return Err(AppError::crypto("Invalid ciphertext: too short"));
        }

        let (nonce_bytes, encrypted) = combined.split_at(NONCE_LEN);
        let nonce = Nonce::assume_unique_for_key(
            nonce_bytes
                .try_into()
                .map_err(|e| AppError::crypto(format!("Invalid nonce size: {e}")))?,
        );

        let unbound_key = UnboundKey::new(&AES_256_GCM, key_bytes)
            .map_err(|e| AppError::crypto(format!("Failed to create decryption key: {e}")))?;
        let key = LessSafeKey::new(unbound_key);

        let mut data = encrypted.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut data)
            .map_err(|e| AppError::crypto(format!("Failed to decrypt field: {e}")))?;

        String::from_utf8(plaintext.to_vec())
            .map_err(|e| AppError::crypto(format!("Decrypted field is not valid UTF-8: {e}")))
    }
}
