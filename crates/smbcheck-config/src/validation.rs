// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: port and timeout ranges, the
//! PBKDF2 iteration floor, and non-empty mount roots.

use crate::diagnostic::ConfigError;
use crate::model::SmbCheckConfig;

/// Lowest PBKDF2 iteration count accepted from configuration.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Upper bound for every timeout setting, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 300;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected validation
/// error (does not fail fast).
pub fn validate_config(config: &SmbCheckConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.general.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "general.log_level `{}` is not one of {}",
            config.general.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.network.smb_port == 0 {
        fail("network.smb_port must not be 0".to_string());
    }

    let timeouts = [
        ("network.connect_timeout_secs", config.network.connect_timeout_secs),
        ("commands.query_timeout_secs", config.commands.query_timeout_secs),
        ("commands.mount_timeout_secs", config.commands.mount_timeout_secs),
    ];
    for (key, secs) in timeouts {
        if secs == 0 || secs > MAX_TIMEOUT_SECS {
            fail(format!(
                "{key} must be between 1 and {MAX_TIMEOUT_SECS}, got {secs}"
            ));
        }
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        fail(format!(
            "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }

    if config.vault.token_ttl_secs == Some(0) {
        fail("vault.token_ttl_secs must be positive when set".to_string());
    }

    if config.vault.preview_len == 0 {
        fail("vault.preview_len must be positive".to_string());
    }

    if config.mount.default_root_linux.trim().is_empty() {
        fail("mount.default_root_linux must not be empty".to_string());
    }

    if config.mount.default_root_macos.trim().is_empty() {
        fail("mount.default_root_macos must not be empty".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = SmbCheckConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_port_fails_validation() {
        let mut config = SmbCheckConfig::default();
        config.network.smb_port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "smb_port"));
    }

    #[test]
    fn timeouts_out_of_range_fail_validation() {
        let mut config = SmbCheckConfig::default();
        config.network.connect_timeout_secs = 0;
        config.commands.mount_timeout_secs = 3600;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "connect_timeout_secs"));
        assert!(has_error(&errors, "mount_timeout_secs"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn weak_kdf_iterations_fail_validation() {
        let mut config = SmbCheckConfig::default();
        config.vault.kdf_iterations = 1_000;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "kdf_iterations"));
    }

    #[test]
    fn bad_log_level_and_empty_root_are_both_reported() {
        let mut config = SmbCheckConfig::default();
        config.general.log_level = "verbose".to_string();
        config.mount.default_root_linux = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log_level"));
        assert!(has_error(&errors, "default_root_linux"));
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let mut config = SmbCheckConfig::default();
        config.vault.token_ttl_secs = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "token_ttl_secs"));
    }
}
