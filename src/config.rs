//! Run configuration for the sender
//!
//! Resolved from CLI flags; `.env` may only supply `TELEGRAM_API_URL` and `RUST_LOG`

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default Bot API base URL
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Default number of in-flight sends per operation (sequential)
pub const DEFAULT_CONCURRENCY: usize = 1;

/// A single chat identifier: numeric id or `@username`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatTarget(String);

impl ChatTarget {
    pub fn new(id: &str) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::InvalidArgument("empty chat id".to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a comma-separated chat list, keeping order and duplicates.
pub fn parse_chat_ids(raw: &str) -> Result<Vec<ChatTarget>> {
    raw.split(',')
        .map(|segment| {
            ChatTarget::new(segment).map_err(|_| {
                Error::InvalidArgument(format!("empty chat id in list '{}'", raw))
            })
        })
        .collect()
}

/// Mask a bot token for logs: keep a short prefix and suffix only.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Load `.env` from the working directory using dotenvy
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Everything one invocation needs.
#[derive(Debug, Clone)]
pub struct SendConfig {
    pub bot_token: String,
    pub chat_ids: Vec<ChatTarget>,
    pub message: Option<String>,
    pub file_path: Option<PathBuf>,
    pub debug: bool,
    pub api_url: String,
    pub concurrency: usize,
    pub timeout: Option<Duration>,
}

impl SendConfig {
    /// Build a config with defaults for the optional knobs.
    pub fn new(bot_token: &str, chat_ids: &str) -> Result<Self> {
        if bot_token.trim().is_empty() {
            return Err(Error::InvalidArgument("bot id is empty".to_string()));
        }

        Ok(Self {
            bot_token: bot_token.to_string(),
            chat_ids: parse_chat_ids(chat_ids)?,
            message: None,
            file_path: None,
            debug: false,
            api_url: DEFAULT_API_URL.to_string(),
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        })
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(Error::InvalidArgument(
                "concurrency must be at least 1".to_string(),
            ));
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Nothing to deliver: no message text and no file.
    pub fn is_noop(&self) -> bool {
        self.message.is_none() && self.file_path.is_none()
    }
}
