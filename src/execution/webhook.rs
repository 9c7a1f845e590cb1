//! Signal consumers running on their own tasks
//!
//! Forwards relay payloads to the notification relay's webhook, or prints
//! them as JSON lines when no relay is configured.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use super::signal::SignalEvent;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct WebhookForwarder {
    client: Client,
    url: String,
}

impl WebhookForwarder {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, url: url.into() })
    }

    pub async fn send(&self, event: &SignalEvent) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .with_context(|| format!("Failed to send signal to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Relay rejected signal ({}): {}", status, body));
        }
        Ok(())
    }

    /// Forward every event until the channel closes. Failed posts are
    /// logged and skipped. Returns the number delivered.
    pub async fn run(self, mut rx: broadcast::Receiver<SignalEvent>) -> u64 {
        let mut delivered = 0;
        loop {
            match rx.recv().await {
                Ok(event) => match self.send(&event).await {
                    Ok(()) => {
                        delivered += 1;
                        info!("Relayed {:?} {} @ {:.2}", event.action, event.symbol, event.price);
                    }
                    Err(e) => warn!("Relay error: {:#}", e),
                },
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Relay forwarder lagged, {} signal(s) dropped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
        delivered
    }
}

/// Print every event as one JSON line on stdout until the channel closes
pub async fn print_signals(mut rx: broadcast::Receiver<SignalEvent>) -> u64 {
    let mut printed = 0;
    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(line) => {
                    println!("{}", line);
                    printed += 1;
                }
                Err(e) => warn!("Failed to encode signal: {}", e),
            },
            Err(RecvError::Lagged(skipped)) => {
                warn!("Signal printer lagged, {} signal(s) dropped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }
    printed
}
