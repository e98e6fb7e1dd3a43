//! Send a message and/or a file to every configured chat
//!
//! Отправка сообщения и/или файла во все указанные чаты

use tracing::{debug, info, warn};

use crate::bot_api::BotApiClient;
use crate::config::{mask_token, SendConfig};
use crate::dispatcher::{DeliveryReport, Dispatcher};
use crate::error::{Error, Result};

/// Totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub messages_sent: usize,
    pub files_sent: usize,
}

/// Build the dispatcher for a config.
pub fn build_dispatcher(config: &SendConfig) -> Result<Dispatcher> {
    let client = BotApiClient::new(config.bot_token.as_str(), &config.api_url, config.timeout)?;
    Ok(Dispatcher::new(client)
        .with_debug(config.debug)
        .with_concurrency(config.concurrency))
}

/// CLI entry point
pub async fn run(config: &SendConfig) -> Result<RunSummary> {
    run_with(config, &build_dispatcher(config)?).await
}

/// Run against a prepared dispatcher: text first, then the file.
///
/// Chats rejected by Telegram do not stop the run; they are reported together
/// at the end as `Error::PartialDelivery`.
pub async fn run_with(config: &SendConfig, dispatcher: &Dispatcher) -> Result<RunSummary> {
    if config.debug {
        let chat_ids: Vec<&str> = config.chat_ids.iter().map(|c| c.as_str()).collect();
        debug!(
            bot_id = %mask_token(&config.bot_token),
            chat_ids = %chat_ids.join(", "),
            message = ?config.message,
            file_path = ?config.file_path,
            "Run configuration"
        );
    }

    if config.is_noop() {
        warn!("Neither message nor file path given, nothing to send");
        return Ok(RunSummary::default());
    }

    // Fail before any request rather than after the text went out.
    if let Some(path) = &config.file_path {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| Error::io(path, e))?;
        if !metadata.is_file() {
            return Err(Error::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
    }

    let mut summary = RunSummary::default();
    let mut report = DeliveryReport::default();

    if let Some(message) = &config.message {
        let text = dispatcher.send_text(&config.chat_ids, message).await?;
        summary.messages_sent = text.succeeded();
        report.merge(text);
    }

    if let Some(path) = &config.file_path {
        let files = dispatcher.send_file(&config.chat_ids, path).await?;
        summary.files_sent = files.succeeded();
        report.merge(files);
    }

    report.into_result()?;

    info!(
        chats = config.chat_ids.len(),
        messages = summary.messages_sent,
        files = summary.files_sent,
        "Run complete"
    );
    Ok(summary)
}
