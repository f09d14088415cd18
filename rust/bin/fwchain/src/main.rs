//! `fwchain` — run the firmware and device chaincode against a local world state.
//!
//! Usage:
//!   fwchain [--config fwchain.toml] invoke firmware:QueryFirmware FW001
//!   fwchain init
//!   fwchain functions

mod host;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fwchain_core::{Chaincode, ChaincodeConfig, ContractError, DecodePolicy};

/// Local chaincode host.
#[derive(Parser, Debug)]
#[command(name = "fwchain", about = "Firmware and device chaincode host")]
struct Cli {
    /// Path to the config file (default: ./fwchain.toml).
    #[arg(long = "config", global = true)]
    config: Option<PathBuf>,

    /// World-state database file (overrides the config file).
    #[arg(long = "world-state", global = true)]
    world_state: Option<PathBuf>,

    /// Fail on undecodable records instead of returning empty ones.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every contract's InitLedger hook.
    Init,

    /// Invoke an entry point, e.g. `invoke device:QueryDevice DEV001`.
    Invoke {
        /// Function name, optionally qualified as `<contract>:<Function>`.
        function: String,
        /// String arguments passed to the function.
        args: Vec<String>,
    },

    /// List contracts and their entry points.
    Functions,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ContractError>() {
                Some(e) => eprintln!("error [{}]: {}", e.error_code(), e),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(ChaincodeConfig::default_path);
    let mut config = ChaincodeConfig::load(&config_path)?;
    if let Some(path) = cli.world_state {
        config.world_state.path = path;
    }
    if cli.strict {
        config.decode = DecodePolicy::Strict;
    }

    // Initialize logging.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.as_str().into()),
        )
        .init();

    let chaincode = host::open(&config)?;

    match cli.command {
        Commands::Init => chaincode.init()?,
        Commands::Invoke { function, args } => invoke(&chaincode, &function, &args)?,
        Commands::Functions => print_functions(&chaincode),
    }
    Ok(())
}

fn invoke(chaincode: &Chaincode, function: &str, args: &[String]) -> anyhow::Result<()> {
    if let Some(payload) = chaincode.invoke(function, args)? {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

fn print_functions(chaincode: &Chaincode) {
    for contract in chaincode.contracts() {
        for function in contract.functions() {
            println!("{}:{}", contract.name(), function);
        }
    }
}
