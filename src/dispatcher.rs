//! Per-chat delivery of text messages and documents
//!
//! One request per (chat, payload) pair, outcomes collected into a
//! [`DeliveryReport`]. Sequential by default: each send completes before the
//! next starts. A rejection from Telegram is recorded and the next chat is
//! still served; an I/O or transport failure aborts the rest. With
//! `concurrency > 1` every chat is attempted and all failures are recorded.

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::bot_api::{ApiResponse, BotApiClient};
use crate::config::ChatTarget;
use crate::{Error, Result};

/// What is being sent to each chat.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    Text(&'a str),
    Document(&'a Path),
}

impl Payload<'_> {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Text(_) => PayloadKind::Text,
            Payload::Document(_) => PayloadKind::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Text,
    Document,
}

/// Outcome of one send.
#[derive(Debug)]
pub struct Delivery {
    pub chat_id: ChatTarget,
    pub kind: PayloadKind,
    pub outcome: Result<ApiResponse>,
}

/// Outcomes of one operation, in target order.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub deliveries: Vec<Delivery>,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.deliveries.len()
    }

    pub fn succeeded(&self) -> usize {
        self.deliveries.iter().filter(|d| d.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Failed deliveries, in target order.
    pub fn failures(&self) -> impl Iterator<Item = (&Delivery, &Error)> {
        self.deliveries
            .iter()
            .filter_map(|d| d.outcome.as_ref().err().map(|e| (d, e)))
    }

    /// Append another operation's outcomes.
    pub fn merge(&mut self, other: DeliveryReport) {
        self.deliveries.extend(other.deliveries);
    }

    /// Errors become a single `PartialDelivery`, each failure is logged.
    pub fn into_result(self) -> Result<Self> {
        let failed = self.failed();
        if failed == 0 {
            return Ok(self);
        }

        let mut first = None;
        for (delivery, e) in self.failures() {
            error!(chat_id = %delivery.chat_id, kind = ?delivery.kind, error = %e, "Delivery failed");
            first.get_or_insert_with(|| e.to_string());
        }
        Err(Error::PartialDelivery {
            failed,
            total: self.total(),
            first: first.unwrap_or_default(),
        })
    }
}

type DebugSink = Mutex<Box<dyn Write + Send>>;

pub struct Dispatcher {
    client: BotApiClient,
    debug_out: Option<DebugSink>,
    concurrency: usize,
}

impl Dispatcher {
    pub fn new(client: BotApiClient) -> Self {
        Self {
            client,
            debug_out: None,
            concurrency: 1,
        }
    }

    /// Print request/response diagnostics to stdout.
    pub fn with_debug(self, debug: bool) -> Self {
        if debug {
            self.with_debug_output(Box::new(std::io::stdout()))
        } else {
            Self {
                debug_out: None,
                ..self
            }
        }
    }

    /// Print request/response diagnostics to an arbitrary writer.
    pub fn with_debug_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.debug_out = Some(Mutex::new(out));
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Send `message` to every chat via `sendMessage`.
    ///
    /// `Err` only for failures that stop the run; rejected chats are in the report.
    pub async fn send_text(&self, chat_ids: &[ChatTarget], message: &str) -> Result<DeliveryReport> {
        self.dispatch(chat_ids, Payload::Text(message)).await
    }

    /// Send the file at `path` to every chat via `sendDocument`, re-reading it per chat.
    pub async fn send_file(&self, chat_ids: &[ChatTarget], path: &Path) -> Result<DeliveryReport> {
        self.dispatch(chat_ids, Payload::Document(path)).await
    }

    async fn dispatch(&self, chat_ids: &[ChatTarget], payload: Payload<'_>) -> Result<DeliveryReport> {
        if self.concurrency <= 1 {
            let mut report = DeliveryReport::default();
            for chat_id in chat_ids {
                let outcome = match self.deliver(chat_id, payload).await {
                    Err(e) if e.is_fatal() => return Err(e),
                    outcome => outcome,
                };
                report.deliveries.push(Delivery {
                    chat_id: chat_id.clone(),
                    kind: payload.kind(),
                    outcome,
                });
            }
            return Ok(report);
        }

        let deliveries = stream::iter(chat_ids)
            .map(move |chat_id| async move {
                Delivery {
                    chat_id: chat_id.clone(),
                    kind: payload.kind(),
                    outcome: self.deliver(chat_id, payload).await,
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        Ok(DeliveryReport { deliveries })
    }

    async fn deliver(&self, chat_id: &ChatTarget, payload: Payload<'_>) -> Result<ApiResponse> {
        let (reply, summary) = match payload {
            Payload::Text(message) => (
                self.client.send_message(chat_id, message).await?,
                format!("Sent message to chat ID {}: {}", chat_id, message),
            ),
            Payload::Document(path) => (
                self.client.send_document(chat_id, path).await?,
                format!("Sent file to chat ID {}: {}", chat_id, path.display()),
            ),
        };

        self.print_debug(&summary, &reply.body);

        let response = reply.check(chat_id)?;
        info!(
            chat_id = %chat_id,
            kind = ?payload.kind(),
            message_id = ?response.message_id(),
            "Delivered"
        );
        Ok(response)
    }

    fn print_debug(&self, summary: &str, body: &str) {
        let Some(sink) = &self.debug_out else {
            return;
        };

        let mut out = match sink.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        let written = writeln!(out, "{}", summary)
            .and_then(|_| writeln!(out, "Response: {}", body))
            .and_then(|_| out.flush());
        if let Err(e) = written {
            warn!(error = %e, "Failed to write debug output");
        }
    }
}
