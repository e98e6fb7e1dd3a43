//! tg_send CLI - main entry point
//!
//! Sends a message and/or a file to a list of Telegram chats through the Bot API.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tg_send::cli::Cli;
use tg_send::{commands, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for local development
    config::load_dotenv();

    let cli = Cli::parse();

    // Initialize logging: silent unless --debug or RUST_LOG asks for it
    let filter = if cli.debug {
        EnvFilter::from_default_env().add_directive("tg_send=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = cli.into_config()?;
    commands::send::run(&config).await?;

    Ok(())
}
