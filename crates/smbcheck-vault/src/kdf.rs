// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a passphrase.
//!
//! Produces the 32 bytes of a Fernet key. Derivation is deterministic: the
//! same passphrase, salt and iteration count always give the same key.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use smbcheck_core::SmbError;
use zeroize::Zeroizing;

use crate::fernet::{FernetKey, KEY_LEN};

/// Salt shared by every token issued before per-token salts existed.
///
/// Anyone holding such a token and the passphrase can decrypt it on any
/// installation. Only used to read old tokens, or to write them when
/// `vault.legacy_fixed_salt` is set.
pub const LEGACY_SALT: &[u8] = b"smb_tool_salt_2024";

/// Length of the random per-token salt.
pub const SALT_LEN: usize = 16;

/// Default PBKDF2 iteration count.
pub const DEFAULT_ITERATIONS: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Derive a Fernet key from `passphrase` and `salt`.
///
/// Empty passphrases are accepted (they just make a weak key).
pub fn derive_key(passphrase: &[u8], salt: &[u8], iterations: NonZeroU32) -> FernetKey {
    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        output.as_mut(),
    );
    FernetKey::from_bytes(output)
}

/// Derive a Fernet key with the shared [`LEGACY_SALT`].
pub fn derive_legacy_key(passphrase: &[u8], iterations: NonZeroU32) -> FernetKey {
    derive_key(passphrase, LEGACY_SALT, iterations)
}

/// Generate a random per-token salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], SmbError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| SmbError::Encryption)?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count keeps the tests fast.
    fn fast() -> NonZeroU32 {
        NonZeroU32::new(1_000).unwrap()
    }

    #[test]
    fn derive_key_produces_consistent_output() {
        let key1 = derive_key(b"hunter2", &[1u8; SALT_LEN], fast());
        let key2 = derive_key(b"hunter2", &[1u8; SALT_LEN], fast());
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn derive_key_different_passphrase_produces_different_output() {
        let key1 = derive_key(b"passphrase one", &[2u8; SALT_LEN], fast());
        let key2 = derive_key(b"passphrase two", &[2u8; SALT_LEN], fast());
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn derive_key_different_salt_produces_different_output() {
        let key1 = derive_key(b"same", &[1u8; SALT_LEN], fast());
        let key2 = derive_key(b"same", &[2u8; SALT_LEN], fast());
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn legacy_key_matches_known_vector() {
        // Reference PBKDF2-HMAC-SHA256 output for this passphrase and salt.
        let key = derive_legacy_key(b"hunter2", fast());
        assert_eq!(key.to_base64(), "Jt2TAdtT-Gs7BxlPqgP4maFjujkmZyeRl3lOYgGPpRc=");
    }

    #[test]
    fn legacy_key_at_default_iterations_matches_known_vector() {
        let key = derive_legacy_key(b"hunter2", DEFAULT_ITERATIONS);
        assert_eq!(key.to_base64(), "Vemu_IxH3FsyGkFnz8quXeDkmKQt0R4oYr7Oa5vmnqM=");
    }

    #[test]
    fn empty_passphrase_is_accepted() {
        let key = derive_key(b"", &[0u8; SALT_LEN], fast());
        assert_eq!(key.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn generate_salt_produces_random_values() {
        let salt1 = generate_salt().unwrap();
        let salt2 = generate_salt().unwrap();
        assert_ne!(salt1, salt2);
    }
}
