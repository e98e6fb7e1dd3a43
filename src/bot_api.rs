//! Telegram Bot API client (`sendMessage`, `sendDocument`).

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::{mask_token, ChatTarget};
use crate::{Error, Result};

/// Bot API client bound to one bot token.
#[derive(Clone)]
pub struct BotApiClient {
    http: Client,
    token: String,
    base_url: String,
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("token", &mask_token(&self.token))
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BotApiClient {
    /// Create client for a bot token and API base URL.
    pub fn new<S: Into<String>>(token: S, base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::InvalidArgument("bot token is empty".to_string()));
        }

        let mut builder = Client::builder().user_agent("tg_send/0.1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::InvalidArgument(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            http,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST `sendMessage` with `chat_id` and `text` form fields.
    pub async fn send_message(&self, chat_id: &ChatTarget, text: &str) -> Result<ApiReply> {
        let params = [("chat_id", chat_id.as_str()), ("text", text)];

        debug!(chat_id = %chat_id, len = text.len(), "sendMessage");
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .form(&params)
            .send()
            .await?;

        ApiReply::read(response).await
    }

    /// POST `sendDocument` as multipart with a fresh read of the file.
    pub async fn send_document(&self, chat_id: &ChatTarget, path: &Path) -> Result<ApiReply> {
        let file_bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::io(path, e))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        debug!(chat_id = %chat_id, bytes = file_bytes.len(), file = %file_name, "sendDocument");
        let form = Form::new()
            .text("chat_id", chat_id.as_str().to_string())
            .part("document", Part::bytes(file_bytes).file_name(file_name));

        let response = self
            .http
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        ApiReply::read(response).await
    }
}

/// Raw HTTP reply: status plus the body text exactly as received.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {}", e)))?;
        Ok(Self { status, body })
    }

    fn is_http_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Inspect the Telegram envelope; `ok: false` or an HTTP error becomes `Error::Remote`.
    pub fn check(&self, chat_id: &ChatTarget) -> Result<ApiResponse> {
        let parsed: std::result::Result<ApiResponse, _> = serde_json::from_str(&self.body);

        match parsed {
            Ok(envelope) if envelope.ok && self.is_http_success() => Ok(envelope),
            Ok(envelope) => Err(Error::Remote {
                chat_id: chat_id.to_string(),
                code: envelope.error_code.unwrap_or(i64::from(self.status)),
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
            }),
            Err(_) if !self.is_http_success() => Err(Error::Remote {
                chat_id: chat_id.to_string(),
                code: i64::from(self.status),
                description: self.body.clone(),
            }),
            Err(e) => Err(Error::InvalidResponse(format!("{}: {}", e, self.body))),
        }
    }
}

/// Telegram response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

impl ApiResponse {
    /// `message_id` of the sent message, when present.
    pub fn message_id(&self) -> Option<i64> {
        self.result
            .as_ref()
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64())
    }
}
