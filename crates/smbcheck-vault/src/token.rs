// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential tokens: encrypt a [`CredentialRecord`] under a passphrase and
//! recover it.
//!
//! A token is URL-safe base64 over one of two layouts:
//! - v1: `0x01 | iterations (u32 BE) | salt (16) | Fernet token text`, with a
//!   fresh salt per token. The iteration count travels with the token, so
//!   changing `vault.kdf_iterations` never strands tokens already issued.
//! - legacy: the Fernet token text alone, keyed with the shared salt at the
//!   fixed [`DEFAULT_ITERATIONS`](kdf::DEFAULT_ITERATIONS).
//!
//! The key is re-derived on every call and dropped (zeroed) afterwards.

use std::num::NonZeroU32;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use smbcheck_config::model::VaultConfig;
use smbcheck_core::{CredentialRecord, SmbError};
use tracing::debug;
use zeroize::Zeroizing;

use crate::fernet;
use crate::kdf::{self, DEFAULT_ITERATIONS, SALT_LEN};

const V1_TAG: u8 = 0x01;
const ITERATIONS_LEN: usize = 4;
const V1_HEADER_LEN: usize = 1 + ITERATIONS_LEN + SALT_LEN;

/// Upper bound on the iteration count read from a token, so a crafted token
/// cannot pin the CPU.
const MAX_TOKEN_ITERATIONS: u32 = 10_000_000;

/// First byte of every Fernet token text (`0x80` base64-encodes to `g`).
const FERNET_TEXT_START: u8 = b'g';

/// Layout of an encrypted credential token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    /// Random per-token salt carried in the token.
    V1,
    /// Shared fixed salt.
    Legacy,
}

impl TokenFormat {
    /// Identify a token's layout without decrypting it.
    pub fn detect(token: &str) -> Option<Self> {
        let data = URL_SAFE.decode(token.trim()).ok()?;
        Self::detect_bytes(&data)
    }

    fn detect_bytes(data: &[u8]) -> Option<Self> {
        match data.first()? {
            &V1_TAG if data.len() > V1_HEADER_LEN => Some(Self::V1),
            &FERNET_TEXT_START => Some(Self::Legacy),
            _ => None,
        }
    }
}

/// Encrypts and decrypts credential records.
///
/// Stateless apart from its settings; the same vault value can be used for
/// any number of independent calls. `iterations` only applies to new v1
/// tokens; decryption reads the count from the token.
#[derive(Debug, Clone)]
pub struct CredentialVault {
    iterations: NonZeroU32,
    legacy_fixed_salt: bool,
    ttl: Option<Duration>,
}

impl Default for CredentialVault {
    fn default() -> Self {
        Self::new(kdf::DEFAULT_ITERATIONS)
    }
}

impl CredentialVault {
    pub fn new(iterations: NonZeroU32) -> Self {
        Self {
            iterations,
            legacy_fixed_salt: false,
            ttl: None,
        }
    }

    /// Build a vault from the `[vault]` configuration section.
    pub fn from_config(config: &VaultConfig) -> Result<Self, SmbError> {
        let iterations = NonZeroU32::new(config.kdf_iterations).ok_or_else(|| {
            SmbError::Config("vault.kdf_iterations must be positive".to_string())
        })?;
        Ok(Self::new(iterations)
            .with_legacy_fixed_salt(config.legacy_fixed_salt)
            .with_ttl(config.token_ttl_secs.map(Duration::from_secs)))
    }

    /// Issue tokens with the shared salt instead of a per-token salt.
    pub fn with_legacy_fixed_salt(mut self, legacy: bool) -> Self {
        self.legacy_fixed_salt = legacy;
        self
    }

    /// Reject tokens older than `ttl` on decrypt.
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Encrypt `record` under `passphrase`.
    ///
    /// Each call yields a different token (fresh salt, IV and timestamp), all
    /// of which decrypt to the same record.
    pub fn encrypt(
        &self,
        record: &CredentialRecord,
        passphrase: &SecretString,
    ) -> Result<String, SmbError> {
        let payload =
            Zeroizing::new(serde_json::to_vec(record).map_err(|_| SmbError::Encryption)?);
        let passphrase = passphrase.expose_secret().as_bytes();

        let token = if self.legacy_fixed_salt {
            let key = kdf::derive_legacy_key(passphrase, DEFAULT_ITERATIONS);
            let inner = fernet::encrypt(&key, &payload)?;
            URL_SAFE.encode(inner.as_bytes())
        } else {
            let salt = kdf::generate_salt()?;
            let key = kdf::derive_key(passphrase, &salt, self.iterations);
            let inner = fernet::encrypt(&key, &payload)?;

            let mut framed = Vec::with_capacity(V1_HEADER_LEN + inner.len());
            framed.push(V1_TAG);
            framed.extend_from_slice(&self.iterations.get().to_be_bytes());
            framed.extend_from_slice(&salt);
            framed.extend_from_slice(inner.as_bytes());
            URL_SAFE.encode(framed)
        };

        debug!(legacy = self.legacy_fixed_salt, "credentials encrypted");
        Ok(token)
    }

    /// Decrypt a token produced by [`encrypt`](Self::encrypt) (either layout).
    ///
    /// Every failure (bad encoding, wrong passphrase, tampering, expiry, bad
    /// payload) is reported as the same [`SmbError::Decryption`].
    pub fn decrypt(
        &self,
        token: &str,
        passphrase: &SecretString,
    ) -> Result<CredentialRecord, SmbError> {
        let result = self.open(token, passphrase);
        if result.is_err() {
            debug!("credential token rejected");
        }
        result
    }

    fn open(&self, token: &str, passphrase: &SecretString) -> Result<CredentialRecord, SmbError> {
        let data = URL_SAFE.decode(token.trim()).map_err(|_| SmbError::Decryption)?;
        let passphrase = passphrase.expose_secret().as_bytes();

        let (key, inner) = match TokenFormat::detect_bytes(&data) {
            Some(TokenFormat::V1) => {
                let (count, rest) = data[1..].split_at(ITERATIONS_LEN);
                let (salt, inner) = rest.split_at(SALT_LEN);
                let iterations = token_iterations(count)?;
                (kdf::derive_key(passphrase, salt, iterations), inner)
            }
            Some(TokenFormat::Legacy) => {
                (kdf::derive_legacy_key(passphrase, DEFAULT_ITERATIONS), &data[..])
            }
            None => return Err(SmbError::Decryption),
        };

        let inner = std::str::from_utf8(inner).map_err(|_| SmbError::Decryption)?;
        let plaintext = Zeroizing::new(fernet::decrypt(&key, inner, self.ttl)?);
        serde_json::from_slice(&plaintext).map_err(|_| SmbError::Decryption)
    }
}

fn token_iterations(bytes: &[u8]) -> Result<NonZeroU32, SmbError> {
    let raw: [u8; ITERATIONS_LEN] = bytes.try_into().map_err(|_| SmbError::Decryption)?;
    let count = u32::from_be_bytes(raw);
    if count > MAX_TOKEN_ITERATIONS {
        return Err(SmbError::Decryption);
    }
    NonZeroU32::new(count).ok_or(SmbError::Decryption)
}

/// Unix time a token was sealed, read from its Fernet header without
/// decrypting. Not authenticated; only for display.
pub fn token_issued_at(token: &str) -> Option<u64> {
    let data = URL_SAFE.decode(token.trim()).ok()?;
    let inner = match TokenFormat::detect_bytes(&data)? {
        TokenFormat::V1 => &data[V1_HEADER_LEN..],
        TokenFormat::Legacy => &data[..],
    };
    fernet::token_timestamp(std::str::from_utf8(inner).ok()?)
}

/// First `len` characters of a token for display, with an ellipsis when cut.
pub fn token_preview(token: &str, len: usize) -> String {
    match token.char_indices().nth(len) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => token.to_string(),
    }
}
