// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./smbcheck.toml` > `~/.config/smbcheck/smbcheck.toml` >
//! `/etc/smbcheck/smbcheck.toml` with environment variable overrides via the
//! `SMBCHECK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SmbCheckConfig;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "smbcheck.toml";

/// System-wide config file.
pub const SYSTEM_CONFIG: &str = "/etc/smbcheck/smbcheck.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SMBCHECK_";

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("smbcheck").join(LOCAL_CONFIG))
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/smbcheck/smbcheck.toml` (system-wide)
/// 3. `~/.config/smbcheck/smbcheck.toml` (user XDG config)
/// 4. `./smbcheck.toml` (local directory)
/// 5. `SMBCHECK_*` environment variables
pub fn load_config() -> Result<SmbCheckConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SmbCheckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmbCheckConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SmbCheckConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SmbCheckConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SmbCheckConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SMBCHECK_NETWORK_SMB_PORT` must map to `network.smb_port`,
/// not `network.smb.port`.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        // The vault passphrase variable shares the prefix but is not config.
        .ignore(&["VAULT_PASSPHRASE"])
        .map(|key| {
            let mapped = map_env_key(key.as_str());
            mapped.into()
        })
}

/// Map a prefix-stripped env key to its lowercase dotted config path.
///
/// Figment hands keys over in their original case.
fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["general", "network", "commands", "vault", "mount"];
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("network_smb_port"), "network.smb_port");
        assert_eq!(map_env_key("vault_kdf_iterations"), "vault.kdf_iterations");
        assert_eq!(
            map_env_key("mount_default_root_linux"),
            "mount.default_root_linux"
        );
        assert_eq!(map_env_key("unknownkey"), "unknownkey");
    }

    #[test]
    fn uppercase_env_keys_map_to_sections() {
        assert_eq!(map_env_key("COMMANDS_USE_SUDO"), "commands.use_sudo");
        assert_eq!(map_env_key("NETWORK_SMB_PORT"), "network.smb_port");
        assert_eq!(map_env_key("General_Log_Level"), "general.log_level");
    }

    #[test]
    fn env_override_applies() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SMBCHECK_NETWORK_SMB_PORT", "1445");
            jail.set_env("SMBCHECK_COMMANDS_USE_SUDO", "false");
            jail.set_env("SMBCHECK_VAULT_PASSPHRASE", "not-a-config-key");
            let config = load_config()?;
            assert_eq!(config.network.smb_port, 1445);
            assert!(!config.commands.use_sudo);
            Ok(())
        });
    }

    #[test]
    fn local_file_is_merged() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                LOCAL_CONFIG,
                r#"
[network]
connect_timeout_secs = 2
"#,
            )?;
            let config = load_config()?;
            assert_eq!(config.network.connect_timeout_secs, 2);
            assert_eq!(config.network.smb_port, 445);
            Ok(())
        });
    }

    #[test]
    fn explicit_path_is_loaded() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
[mount]
default_root_linux = "/media"
"#,
            )?;
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.mount.default_root_linux, "/media");
            Ok(())
        });
    }
}
