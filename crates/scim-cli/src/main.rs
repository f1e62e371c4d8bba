//! # SCIM CLI
//!
//! Command-line entry point for managing users in a SCIM directory.
//!
//! Configuration is read from `--config-dir` (default `./config`) and
//! `SCIM__*` environment variables. Results are printed to stdout as JSON;
//! logs and errors go to stderr.

use clap::Parser;
use scim_config::ConfigLoader;
use scim_core::{DirectoryResult, ErrorResponse};
use scim_directory::UsersApi;
use scim_transport::{create_http_transport, RequestContext};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

mod cli;
mod commands;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let response = ErrorResponse::from(&e);
        match serde_json::to_string(&response) {
            Ok(body) => eprintln!("{}", body),
            Err(_) => eprintln!("{}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> DirectoryResult<()> {
    let loader = ConfigLoader::new(cli.config_dir)?;
    let config = loader.get();
    scim_core::init_logging(&config.logging)?;

    debug!("Configuration loaded from {}", loader.config_dir());
    debug!("Directory host: {}", config.directory.host);

    let token = CancellationToken::new();
    spawn_interrupt_watcher(token.clone());

    let transport = create_http_transport(&config.directory)?;
    let api = UsersApi::new(transport, RequestContext::new(token));

    let output = commands::execute(&api, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Cancels in-flight requests on Ctrl+C.
fn spawn_interrupt_watcher(token: CancellationToken) {
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling request");
            token.cancel();
        }
    });
}
