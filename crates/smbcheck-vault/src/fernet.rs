// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fernet authenticated encryption.
//!
//! Token layout before URL-safe base64:
//!
//! ```text
//! 0x80 | timestamp (u64 BE) | IV (16) | AES-128-CBC ciphertext (PKCS7) | HMAC-SHA256 (32)
//! ```
//!
//! The HMAC covers everything before it and is verified before any
//! decryption. Every call to [`encrypt`] draws a fresh random IV.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use aes::Aes128;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ring::hmac;
use ring::rand::{SecureRandom, SystemRandom};
use smbcheck_core::SmbError;
use zeroize::Zeroizing;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// Length of a Fernet key: 16 bytes signing key + 16 bytes encryption key.
pub const KEY_LEN: usize = 32;

const VERSION: u8 = 0x80;
const TIMESTAMP_LEN: usize = 8;
const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;
const HMAC_LEN: usize = 32;
const HEADER_LEN: usize = 1 + TIMESTAMP_LEN + IV_LEN;

/// Tokens stamped further than this in the future are rejected when a TTL
/// is enforced.
const MAX_CLOCK_SKEW_SECS: u64 = 60;

/// A 32-byte Fernet key, zeroed on drop.
///
/// Debug output intentionally omits the key material.
pub struct FernetKey {
    bytes: Zeroizing<[u8; KEY_LEN]>,
}

impl std::fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FernetKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl FernetKey {
    pub fn from_bytes(bytes: Zeroizing<[u8; KEY_LEN]>) -> Self {
        Self { bytes }
    }

    /// Parse the text form (URL-safe base64 of the 32 key bytes).
    pub fn from_base64(text: &str) -> Result<Self, SmbError> {
        let decoded = Zeroizing::new(
            URL_SAFE
                .decode(text.trim())
                .map_err(|_| SmbError::Internal("Fernet key is not valid base64".to_string()))?,
        );
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        if decoded.len() != KEY_LEN {
            return Err(SmbError::Internal(format!(
                "Fernet key must be {KEY_LEN} bytes, got {}",
                decoded.len()
            )));
        }
        bytes.copy_from_slice(&decoded);
        Ok(Self { bytes })
    }

    /// Generate a random key.
    pub fn generate() -> Result<Self, SmbError> {
        let rng = SystemRandom::new();
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rng.fill(&mut bytes[..]).map_err(|_| SmbError::Encryption)?;
        Ok(Self { bytes })
    }

    /// Text form of the key, as Fernet implementations exchange it.
    pub fn to_base64(&self) -> String {
        URL_SAFE.encode(&self.bytes[..])
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    fn signing_key(&self) -> hmac::Key {
        hmac::Key::new(hmac::HMAC_SHA256, &self.bytes[..16])
    }

    fn encryption_key(&self) -> &[u8] {
        &self.bytes[16..]
    }
}

/// Encrypt `plaintext`, stamping the current time and a random IV.
pub fn encrypt(key: &FernetKey, plaintext: &[u8]) -> Result<String, SmbError> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; IV_LEN];
    rng.fill(&mut iv).map_err(|_| SmbError::Encryption)?;
    let now = unix_now().ok_or(SmbError::Encryption)?;
    encrypt_with_parts(key, plaintext, now, iv)
}

/// Encrypt with an explicit timestamp and IV.
///
/// Reusing an IV under the same key leaks plaintext equality; outside of
/// known-answer tests use [`encrypt`].
pub fn encrypt_with_parts(
    key: &FernetKey,
    plaintext: &[u8],
    timestamp: u64,
    iv: [u8; IV_LEN],
) -> Result<String, SmbError> {
    let ciphertext = Aes128CbcEnc::new_from_slices(key.encryption_key(), &iv)
        .map_err(|_| SmbError::Encryption)?
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut token = Vec::with_capacity(HEADER_LEN + ciphertext.len() + HMAC_LEN);
    token.push(VERSION);
    token.extend_from_slice(&timestamp.to_be_bytes());
    token.extend_from_slice(&iv);
    token.extend_from_slice(&ciphertext);

    let tag = hmac::sign(&key.signing_key(), &token);
    token.extend_from_slice(tag.as_ref());

    Ok(URL_SAFE.encode(token))
}

/// Verify and decrypt a Fernet token.
///
/// With `ttl` set, tokens older than `ttl` (or stamped too far in the future)
/// are rejected. Every failure is [`SmbError::Decryption`].
pub fn decrypt(key: &FernetKey, token: &str, ttl: Option<Duration>) -> Result<Vec<u8>, SmbError> {
    let now = unix_now().ok_or(SmbError::Decryption)?;
    decrypt_at(key, token, ttl, now)
}

/// [`decrypt`] against an explicit clock, in seconds since the Unix epoch.
pub fn decrypt_at(
    key: &FernetKey,
    token: &str,
    ttl: Option<Duration>,
    now: u64,
) -> Result<Vec<u8>, SmbError> {
    let data = URL_SAFE.decode(token.trim()).map_err(|_| SmbError::Decryption)?;
    if data.len() < HEADER_LEN + BLOCK_LEN + HMAC_LEN || data[0] != VERSION {
        return Err(SmbError::Decryption);
    }

    let (signed, tag) = data.split_at(data.len() - HMAC_LEN);
    hmac::verify(&key.signing_key(), signed, tag).map_err(|_| SmbError::Decryption)?;

    let timestamp = read_timestamp(&data).ok_or(SmbError::Decryption)?;
    if let Some(ttl) = ttl {
        if timestamp.saturating_add(ttl.as_secs()) < now {
            return Err(SmbError::Decryption);
        }
        if now.saturating_add(MAX_CLOCK_SKEW_SECS) < timestamp {
            return Err(SmbError::Decryption);
        }
    }

    let iv = &signed[1 + TIMESTAMP_LEN..HEADER_LEN];
    let ciphertext = &signed[HEADER_LEN..];
    if ciphertext.len() % BLOCK_LEN != 0 {
        return Err(SmbError::Decryption);
    }

    Aes128CbcDec::new_from_slices(key.encryption_key(), iv)
        .map_err(|_| SmbError::Decryption)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| SmbError::Decryption)
}

/// Timestamp embedded in a token, without verifying it.
pub fn token_timestamp(token: &str) -> Option<u64> {
    let data = URL_SAFE.decode(token.trim()).ok()?;
    if data.first() != Some(&VERSION) {
        return None;
    }
    read_timestamp(&data)
}

/// Seal and open a throwaway record with a random key.
///
/// Confirms the cipher stack works on this host.
pub fn self_test() -> Result<(), SmbError> {
    let key = FernetKey::generate()?;
    let token = encrypt(&key, b"smbcheck self-test")?;
    let opened = decrypt(&key, &token, None)?;
    if opened == b"smbcheck self-test" {
        Ok(())
    } else {
        Err(SmbError::Internal("cipher self-test mismatch".to_string()))
    }
}

fn read_timestamp(data: &[u8]) -> Option<u64> {
    let bytes: [u8; TIMESTAMP_LEN] = data.get(1..1 + TIMESTAMP_LEN)?.try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}
