// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `smbcheck vault` subcommands: issue and open credential tokens.

use secrecy::SecretString;
use smbcheck_core::{CredentialRecord, InputProvider, SmbError};
use smbcheck_vault::{CredentialVault, TokenFormat, token_issued_at};
use tracing::info;
use zeroize::Zeroizing;

/// Ask for a username (unless given) and password, then seal them.
///
/// Returns the full token; the caller prints it.
pub async fn issue_token(
    vault: &CredentialVault,
    input: &dyn InputProvider,
    username: Option<String>,
    passphrase: &SecretString,
) -> Result<String, SmbError> {
    let username = match username {
        Some(name) => name,
        None => input.read_line("Username: ").await?,
    };
    let username = username.trim().to_string();
    if username.is_empty() {
        return Err(SmbError::Input("username is required".to_string()));
    }

    let password = Zeroizing::new(input.read_secret("Password: ").await?);
    let record = CredentialRecord::new(username, password.as_str());
    let token = vault.encrypt(&record, passphrase)?;
    info!(user = %record.username, "credential token issued");
    Ok(token)
}

/// What `vault decrypt` shows about a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSummary {
    pub username: String,
    pub masked_password: String,
    pub format: &'static str,
    /// Unix time the token was sealed.
    pub issued_at: Option<u64>,
}

/// Open `token` and summarise it without revealing the password.
pub fn inspect_token(
    vault: &CredentialVault,
    token: &str,
    passphrase: &SecretString,
) -> Result<TokenSummary, SmbError> {
    let record = vault.decrypt(token, passphrase)?;
    let format = match TokenFormat::detect(token) {
        Some(TokenFormat::V1) => "v1 (per-token salt)",
        Some(TokenFormat::Legacy) | None => "legacy (shared salt)",
    };
    Ok(TokenSummary {
        username: record.username.clone(),
        masked_password: mask_password(&record.password),
        format,
        issued_at: token_issued_at(token),
    })
}

/// One `*` per character, at least three so short passwords do not stand out.
pub fn mask_password(password: &str) -> String {
    "*".repeat(password.chars().count().max(3))
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;
    use smbcheck_test_utils::ScriptedInput;

    fn vault() -> CredentialVault {
        CredentialVault::new(NonZeroU32::new(1_000).unwrap())
    }

    fn pass(p: &str) -> SecretString {
        SecretString::from(p.to_string())
    }

    #[test]
    fn masking_hides_length_of_short_passwords() {
        assert_eq!(mask_password("S3cret!"), "*******");
        assert_eq!(mask_password("a"), "***");
        assert_eq!(mask_password(""), "***");
    }

    #[tokio::test]
    async fn issued_token_inspects_back() {
        let vault = vault();
        let input = ScriptedInput::with_answers(["alice", "S3cret!"]);
        let token = issue_token(&vault, &input, None, &pass("hunter2"))
            .await
            .unwrap();

        let summary = inspect_token(&vault, &token, &pass("hunter2")).unwrap();
        assert_eq!(summary.username, "alice");
        assert_eq!(summary.masked_password, "*******");
        assert!(summary.format.starts_with("v1"));
        assert!(summary.issued_at.is_some_and(|t| t > 1_700_000_000));

        let prompts = input.prompts().await;
        assert!(!prompts[0].secret);
        assert!(prompts[1].secret);
    }

    #[tokio::test]
    async fn given_username_skips_prompt() {
        let input = ScriptedInput::with_answers(["pw"]);
        let token = issue_token(&vault(), &input, Some("bob".into()), &pass("k"))
            .await
            .unwrap();
        assert!(!token.is_empty());
        assert_eq!(input.prompts().await.len(), 1);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let input = ScriptedInput::with_answers(["  "]);
        let err = issue_token(&vault(), &input, None, &pass("k"))
            .await
            .unwrap_err();
        assert!(matches!(err, SmbError::Input(_)));
    }

    #[test]
    fn wrong_passphrase_is_decryption_error() {
        let vault = vault();
        let token = vault
            .encrypt(&CredentialRecord::new("alice", "pw"), &pass("right"))
            .unwrap();
        let err = inspect_token(&vault, &token, &pass("wrong")).unwrap_err();
        assert!(matches!(err, SmbError::Decryption));
    }

    #[test]
    fn legacy_tokens_are_labelled() {
        let vault = vault().with_legacy_fixed_salt(true);
        let token = vault
            .encrypt(&CredentialRecord::new("alice", "pw"), &pass("k"))
            .unwrap();
        let summary = inspect_token(&vault, &token, &pass("k")).unwrap();
        assert!(summary.format.starts_with("legacy"));
    }
}
