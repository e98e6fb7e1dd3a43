//! Error types for the Telegram sender

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Telegram API error for chat {chat_id} (code {code}): {description}")]
    Remote {
        chat_id: String,
        code: i64,
        description: String,
    },

    #[error("Invalid response from Telegram: {0}")]
    InvalidResponse(String),

    #[error("Delivery failed for {failed} of {total} chats (first: {first})")]
    PartialDelivery {
        failed: usize,
        total: usize,
        first: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl Error {
    /// Failures that end the run at once: the file or the network is gone.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Io { .. } | Error::Transport(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
