// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! smbcheck - SMB diagnostics and share mapping.
//!
//! This is the binary entry point.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use smbcheck::console::ConsoleInput;
use smbcheck::shutdown::install_signal_handler;
use smbcheck::ui::{self, Ui};
use smbcheck::{MapArgs, Workflow, WorkflowSettings, exit, vault_cmd};
use smbcheck_config::SmbCheckConfig;
use smbcheck_core::{CommandRunner, Platform, SmbError};
use smbcheck_platform::{SystemRunner, detect_platform, host_info};
use smbcheck_vault::{
    CredentialVault, get_vault_passphrase, get_vault_passphrase_with_confirm, token_preview,
};

/// smbcheck - check SMB support, test a server and map its shares.
#[derive(Parser, Debug)]
#[command(name = "smbcheck", version, about, long_about = None)]
struct Cli {
    /// Disable coloured output.
    #[arg(long, global = true)]
    plain: bool,

    /// Read configuration from this file instead of the usual locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check whether this host can use SMB.
    Diagnose,
    /// Test a server's SMB port and optionally list its shares.
    Probe {
        /// Server IP address or hostname.
        host: String,
        /// Port to test instead of the configured one.
        #[arg(long)]
        port: Option<u16>,
        /// Also list the server's shares.
        #[arg(long)]
        list: bool,
    },
    /// Map or mount a share; missing values are prompted for.
    Map {
        #[arg(long)]
        server: Option<String>,
        #[arg(long)]
        share: Option<String>,
        #[arg(long, value_name = "PATH")]
        mount_point: Option<PathBuf>,
        /// Credential token from `smbcheck vault encrypt`.
        #[arg(long)]
        token: Option<String>,
    },
    /// Issue or check credential tokens.
    Vault {
        #[command(subcommand)]
        action: VaultCommands,
    },
}

#[derive(Subcommand, Debug)]
enum VaultCommands {
    /// Encrypt a username and password into a token.
    Encrypt {
        #[arg(long)]
        username: Option<String>,
    },
    /// Decrypt a token and show who it is for.
    Decrypt {
        token: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => smbcheck_config::load_and_validate_path(path),
        None => smbcheck_config::load_and_validate(),
    };
    let mut config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            smbcheck_config::render_errors(&errors);
            std::process::exit(exit::FAILURE);
        }
    };
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    let color = config.general.color && !cli.plain && std::io::stdout().is_terminal();
    smbcheck::init_tracing(
        &config.general.log_level,
        color && std::io::stderr().is_terminal(),
    );

    colored::control::set_override(color);
    let ui = Ui::new(color);

    let cancel = install_signal_handler();
    let code = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            println!();
            ui.warn("Operation cancelled by user.");
            exit::CANCELLED
        }
        code = run(cli.command, &config, ui) => code,
    };
    std::process::exit(code);
}

async fn run(command: Option<Commands>, config: &SmbCheckConfig, ui: Ui) -> i32 {
    let vault = match CredentialVault::from_config(&config.vault) {
        Ok(vault) => vault,
        Err(e) => {
            ui.fail(&e.to_string());
            return exit::FAILURE;
        }
    };

    let runner = Arc::new(SystemRunner::new());
    let platform = detect_platform(runner.clone(), config);
    let input = ConsoleInput::new();

    let mut settings = WorkflowSettings::from_config(config);
    if let Some(Commands::Probe { port: Some(port), .. }) = &command {
        settings.smb_port = *port;
    }
    let workflow = Workflow::new(platform.as_ref(), &input, vault.clone(), settings, ui);

    let result = match command {
        None => {
            print_banner(runner.as_ref(), platform.as_ref()).await;
            workflow
                .run_interactive()
                .await
                .map(|outcome| exit::exit_code(&outcome))
        }
        Some(Commands::Diagnose) => {
            print_banner(runner.as_ref(), platform.as_ref()).await;
            let report = workflow.diagnose().await;
            Ok(if report.ready {
                exit::SUCCESS
            } else {
                exit::DIAGNOSTICS_FAILED
            })
        }
        Some(Commands::Probe { host, list, .. }) => {
            let report = workflow.probe(&host, list).await;
            Ok(match report.listing {
                _ if !report.reachable => exit::UNREACHABLE_OR_MOUNT,
                Some(Err(_)) => exit::FAILURE,
                _ => exit::SUCCESS,
            })
        }
        Some(Commands::Map {
            server,
            share,
            mount_point,
            token,
        }) => workflow
            .map(MapArgs {
                server,
                share,
                mount_point,
                token,
            })
            .await
            .map(|outcome| exit::exit_code(&outcome)),
        Some(Commands::Vault { action }) => {
            vault_command(action, &vault, &input, config.vault.preview_len, ui).await
        }
    };

    match result {
        Ok(code) => code,
        Err(SmbError::Cancelled) => {
            println!();
            ui.warn("Operation cancelled by user.");
            exit::CANCELLED
        }
        Err(e) => {
            ui.fail(&e.to_string());
            exit::exit_code_for_error(&e)
        }
    }
}

async fn vault_command(
    action: VaultCommands,
    vault: &CredentialVault,
    input: &ConsoleInput,
    preview_len: usize,
    ui: Ui,
) -> Result<i32, SmbError> {
    match action {
        VaultCommands::Encrypt { username } => {
            let passphrase = passphrase(true).await?;
            let token = vault_cmd::issue_token(vault, input, username, &passphrase).await?;
            ui.ok("Credentials encrypted successfully.");
            eprintln!("Preview: {}", token_preview(&token, preview_len));
            println!("{token}");
        }
        VaultCommands::Decrypt { token } => {
            let passphrase = passphrase(false).await?;
            let summary = vault_cmd::inspect_token(vault, &token, &passphrase)?;
            ui.ok("Token decrypted successfully.");
            println!("Username: {}", summary.username);
            println!("Password: {}", summary.masked_password);
            println!("Format:   {}", summary.format);
            if let Some(issued) = summary.issued_at {
                println!("Issued:   {issued} (unix time)");
            }
        }
    }
    Ok(exit::SUCCESS)
}

/// Read the vault passphrase off the async thread.
async fn passphrase(confirm: bool) -> Result<SecretString, SmbError> {
    tokio::task::spawn_blocking(move || {
        if confirm {
            get_vault_passphrase_with_confirm()
        } else {
            get_vault_passphrase()
        }
    })
    .await
    .map_err(|e| SmbError::Internal(format!("passphrase prompt failed: {e}")))?
}

async fn print_banner(runner: &dyn CommandRunner, platform: &dyn Platform) {
    let host = host_info(runner, &platform.kind()).await;
    print!("{}", ui::banner(&host));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_runs_interactive_flow() {
        let cli = Cli::try_parse_from(["smbcheck"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.plain);
    }

    #[test]
    fn probe_flags_parse() {
        let cli =
            Cli::try_parse_from(["smbcheck", "probe", "nas", "--port", "4455", "--list"]).unwrap();
        match cli.command {
            Some(Commands::Probe { host, port, list }) => {
                assert_eq!(host, "nas");
                assert_eq!(port, Some(4455));
                assert!(list);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "smbcheck",
            "map",
            "--server",
            "nas",
            "--plain",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.plain);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(
            cli.command,
            Some(Commands::Map { server: Some(ref s), share: None, .. }) if s == "nas"
        ));
    }

    #[test]
    fn vault_decrypt_takes_token() {
        let cli = Cli::try_parse_from(["smbcheck", "vault", "decrypt", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Vault { action: VaultCommands::Decrypt { ref token } }) if token == "abc"
        ));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = smbcheck_config::load_and_validate_str("").unwrap();
        assert_eq!(config.network.smb_port, 445);
    }
}
