//! Lumen CLI - run the signing flows in a terminal
//!
//! Logs go to stderr so they never interleave with the screens on stdout.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lumen_cli::{CliConfig, TerminalFrontend};
use lumen_core::{parse_account_index, Ed25519Signer, MessageHash, SignHashRequest, StellarPath};
use lumen_flow::FlowController;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Air-gapped Stellar hash signer", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/lumen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start at the main menu
    Run,

    /// Start a hash-signing flow for a request
    SignHash {
        /// Derivation path, e.g. m/44'/148'/0'
        #[arg(short, long)]
        path: String,

        /// Hash to sign (hex)
        #[arg(long)]
        hash: String,
    },

    /// Print the account index a derivation path selects
    ParsePath {
        /// Derivation path
        path: String,
    },

    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The default file is optional; a broken one is reported once logging is up
    let (config, ignored) = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => (config, None),
        Err(e) if cli.config.is_none() => (CliConfig::default(), Some(e)),
        Err(e) => return Err(e.into()),
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    if let Some(e) = ignored {
        warn!("Ignoring config file: {}", e);
    }

    match cli.command {
        Commands::Run => run_flow(&config, None),
        Commands::SignHash { path, hash } => {
            let request = SignHashRequest::new(path, MessageHash::from_hex(&hash)?);
            run_flow(&config, Some(request))
        }
        Commands::ParsePath { path } => {
            let account = parse_account_index(&path)?;
            println!("Account index: {}", account);
            println!("Signing path:  {}", StellarPath::new(account));
            Ok(())
        }
        Commands::ShowConfig => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn run_flow(config: &CliConfig, request: Option<SignHashRequest>) -> Result<()> {
    let mut controller = FlowController::new(config.device.clone(), Box::new(Ed25519Signer::new()));
    if let Some(request) = request {
        controller.begin_sign_hash(request);
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut frontend = TerminalFrontend::new(stdin.lock(), io::stdout(), config.device.qr_density);
    if interactive {
        frontend = frontend.with_hidden_entry();
    }
    controller.run(&mut frontend)?;

    info!(
        key_sources = controller.key_sources().len(),
        "session ended, key sources discarded"
    );
    Ok(())
}
