// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-protected credential tokens for smbcheck.
//!
//! A username/password record is serialized to JSON and sealed with Fernet
//! (AES-128-CBC + HMAC-SHA256, versioned and timestamped). The Fernet key is
//! derived from the operator's passphrase with PBKDF2-HMAC-SHA256. Tokens
//! carry their own random salt; tokens keyed with the old shared salt are
//! still accepted.

pub mod fernet;
pub mod kdf;
pub mod prompt;
pub mod token;

pub use fernet::FernetKey;
pub use kdf::{derive_key, derive_legacy_key};
pub use prompt::{get_vault_passphrase, get_vault_passphrase_with_confirm};
pub use token::{token_issued_at, token_preview, CredentialVault, TokenFormat};
