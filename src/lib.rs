//! Telegram Bot API sender
//!
//! This library provides tools to:
//! - Send a text message to one or more Telegram chats (`sendMessage`)
//! - Send a local file as a document to the same chats (`sendDocument`)
//! - Detect per-chat delivery failures reported by the Bot API
//! - Optionally fan out to many chats with bounded concurrency

pub mod bot_api;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;

// Re-export common types
pub use bot_api::{ApiReply, ApiResponse, BotApiClient};
pub use config::{parse_chat_ids, ChatTarget, SendConfig};
pub use dispatcher::{DeliveryReport, Dispatcher};
pub use error::{Error, Result};

pub mod commands;
