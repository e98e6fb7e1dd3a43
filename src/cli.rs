//! Command-line surface of the `tg_send` binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{SendConfig, DEFAULT_API_URL};
use crate::Result;

#[derive(Parser, Debug)]
#[command(name = "tg_send")]
#[command(about = "Send messages or files to Telegram using the provided bot and chat IDs.")]
#[command(version)]
pub struct Cli {
    /// Bot ID (token) used for authentication
    #[arg(short = 'b', long = "bot_id")]
    pub bot_id: String,

    /// Chat IDs to send the message or file to, separated by commas
    #[arg(short = 'c', long = "chat_ids")]
    pub chat_ids: String,

    /// Message to send
    #[arg(short = 'm', long = "message")]
    pub message: Option<String>,

    /// Path to the file to send
    #[arg(short = 'f', long = "file_path")]
    pub file_path: Option<PathBuf>,

    /// Enable debug mode
    #[arg(short = 'd', long = "debug", default_value_t = false)]
    pub debug: bool,

    /// Bot API base URL
    #[arg(long = "api_url", env = "TELEGRAM_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Maximum number of chats served at once (1 = one after another)
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Validate flags and turn them into a run configuration.
    pub fn into_config(self) -> Result<SendConfig> {
        let mut config = SendConfig::new(&self.bot_id, &self.chat_ids)?
            .with_debug(self.debug)
            .with_api_url(self.api_url)
            .with_concurrency(self.concurrency)?
            .with_timeout(self.timeout.map(Duration::from_secs));

        // Empty values behave like absent ones.
        if let Some(message) = self.message.filter(|m| !m.is_empty()) {
            config = config.with_message(message);
        }
        if let Some(path) = self.file_path.filter(|p| !p.as_os_str().is_empty()) {
            config = config.with_file(path);
        }

        Ok(config)
    }
}
