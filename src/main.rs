//! MC Chat Server - Entry Point
//!
//! Runs the relay, or with `--connect` the interactive client.

use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use mc_chat_server::config::{DEFAULT_CONFIG_FILE, ServerConfig};
use mc_chat_server::console::{ClientExit, run_client};
use mc_chat_server::error::ChatServerError;
use mc_chat_server::server::Server;
use mc_chat_server::utils::logging::setup_logging;

#[derive(Parser, Debug)]
#[command(version, about = "Line-oriented chat relay")]
struct Args {
    /// Connect to the relay at this IP address instead of serving
    #[arg(long, value_name = "IP")]
    connect: Option<String>,

    /// Configuration file, without or with the .toml extension
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), ChatServerError> {
    let config = ServerConfig::load_from(&args.config)?;

    match args.connect {
        Some(ip) => {
            let addr = format!("{}:{}", ip, config.port);
            if run_client(&addr).await? == ClientExit::HandleTaken {
                info!("Handle rejected by {}", addr);
            }
            Ok(())
        }
        None => {
            info!("Launching chat server...");
            let server = Server::bind(config).await?;
            server.start().await;
            Ok(())
        }
    }
}
