// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or the SMBCHECK_VAULT_PASSPHRASE
//! environment variable.

use std::io::{self, IsTerminal};

use secrecy::SecretString;
use smbcheck_core::SmbError;

/// Environment variable consulted before prompting.
pub const PASSPHRASE_ENV_VAR: &str = "SMBCHECK_VAULT_PASSPHRASE";

fn from_env() -> Option<SecretString> {
    match std::env::var(PASSPHRASE_ENV_VAR) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

fn read_hidden(prompt: &str) -> Result<String, SmbError> {
    eprint!("{prompt}");
    rpassword::read_password().map_err(read_error)
}

/// Ctrl-C or Ctrl-D at the hidden prompt cancels rather than failing.
fn read_error(e: io::Error) -> SmbError {
    match e.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => SmbError::Cancelled,
        _ => SmbError::Input(format!("failed to read passphrase: {e}")),
    }
}

fn no_source() -> SmbError {
    SmbError::Input(format!(
        "no passphrase provided; set {PASSPHRASE_ENV_VAR} or run interactively"
    ))
}

/// Get the vault passphrase from the environment or an interactive prompt.
///
/// Priority:
/// 1. `SMBCHECK_VAULT_PASSPHRASE` (scripts, CI)
/// 2. Hidden TTY prompt via `rpassword`
///
/// An empty passphrase from the prompt is rejected.
pub fn get_vault_passphrase() -> Result<SecretString, SmbError> {
    if let Some(secret) = from_env() {
        return Ok(secret);
    }

    if !std::io::stdin().is_terminal() {
        return Err(no_source());
    }

    let passphrase = read_hidden("Encryption passphrase: ")?;
    if passphrase.is_empty() {
        return Err(SmbError::Input("empty passphrase not allowed".to_string()));
    }
    Ok(SecretString::from(passphrase))
}

/// Like [`get_vault_passphrase`], but asks twice when prompting and requires
/// both entries to match. Used when issuing a new token.
pub fn get_vault_passphrase_with_confirm() -> Result<SecretString, SmbError> {
    if let Some(secret) = from_env() {
        return Ok(secret);
    }

    if !std::io::stdin().is_terminal() {
        return Err(no_source());
    }

    let first = zeroize::Zeroizing::new(read_hidden("New encryption passphrase: ")?);
    let second = zeroize::Zeroizing::new(read_hidden("Confirm passphrase: ")?);
    if *first != *second {
        return Err(SmbError::Input("passphrases do not match".to_string()));
    }
    if first.is_empty() {
        return Err(SmbError::Input("empty passphrase not allowed".to_string()));
    }
    Ok(SecretString::from(first.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    fn interrupted_read_cancels() {
        for kind in [io::ErrorKind::Interrupted, io::ErrorKind::UnexpectedEof] {
            assert!(matches!(read_error(io::Error::from(kind)), SmbError::Cancelled));
        }
        let err = read_error(io::Error::other("tty gone"));
        assert!(matches!(err, SmbError::Input(ref m) if m.contains("tty gone")));
    }

    #[test]
    #[serial]
    fn passphrase_from_env_var() {
        // SAFETY: serialized test; no other thread touches the environment.
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "test-passphrase") };
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "test-passphrase");
    }

    #[test]
    #[serial]
    fn confirm_variant_skips_confirmation_for_env_var() {
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "test-passphrase") };
        let result = get_vault_passphrase_with_confirm();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert!(result.is_ok());
    }

    #[test]
    #[serial]
    fn empty_env_var_without_terminal_is_rejected() {
        if std::io::stdin().is_terminal() {
            return;
        }
        unsafe { std::env::set_var(PASSPHRASE_ENV_VAR, "") };
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(PASSPHRASE_ENV_VAR) };

        assert!(matches!(result, Err(SmbError::Input(_))));
    }
}
