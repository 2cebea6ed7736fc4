// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for smbcheck.
//!
//! Every setting has a compiled default, so the tool runs with no file at all.
//! Optional TOML files follow the XDG hierarchy, `SMBCHECK_*` environment
//! variables override them, and unknown keys are rejected with "did you mean"
//! suggestions rendered through miette.
//!
//! # Usage
//!
//! ```no_run
//! use smbcheck_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("SMB port: {}", config.network.smb_port);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::SmbCheckConfig;

/// Load configuration from the XDG hierarchy and validate it.
///
/// On a Figment error the TOML sources are re-read so diagnostics can point
/// at the offending key.
pub fn load_and_validate() -> Result<SmbCheckConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let toml_sources = collect_toml_sources();
            Err(diagnostic::figment_to_config_errors(err, &toml_sources))
        }
    }
}

/// Load configuration from one explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<SmbCheckConfig, Vec<ConfigError>> {
    if !path.exists() {
        return Err(vec![ConfigError::Other(format!(
            "config file not found: {}",
            path.display()
        ))]);
    }
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<SmbCheckConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Collect TOML source file contents for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(loader::LOCAL_CONFIG) {
        let path = std::env::current_dir()
            .map(|d| d.join(loader::LOCAL_CONFIG).display().to_string())
            .unwrap_or_else(|_| loader::LOCAL_CONFIG.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path() {
        if let Ok(content) = std::fs::read_to_string(&path) {
            sources.push((path.display().to_string(), content));
        }
    }

    let system_path = Path::new(loader::SYSTEM_CONFIG);
    if let Ok(content) = std::fs::read_to_string(system_path) {
        sources.push((system_path.display().to_string(), content));
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_config_overrides_defaults() {
        let config = load_and_validate_str(
            r#"
[network]
smb_port = 1445
"#,
        )
        .unwrap();
        assert_eq!(config.network.smb_port, 1445);
        assert_eq!(config.network.connect_timeout_secs, 5);
    }

    #[test]
    fn typo_in_inline_config_is_reported_with_suggestion() {
        let errors = load_and_validate_str(
            r#"
[network]
smb_prot = 445
"#,
        )
        .unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "smb_prot" && s == "smb_port"
        )));
    }

    #[test]
    fn invalid_values_fail_validation() {
        let errors = load_and_validate_str(
            r#"
[vault]
kdf_iterations = 10
"#,
        )
        .unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations"))));
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let errors =
            load_and_validate_path(Path::new("/nonexistent/smbcheck-test-xyz.toml")).unwrap_err();
        assert!(matches!(&errors[0], ConfigError::Other(m) if m.contains("not found")));
    }
}
