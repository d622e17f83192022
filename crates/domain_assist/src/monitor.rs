//! Connectivity monitor
//!
//! Polls the completion provider in the background and publishes the result
//! so status endpoints can answer without a network round trip.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::client::CompletionClient;
use crate::error::AssistError;

pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Unauthorized,
    Unreachable,
    NotConfigured,
}

impl ConnectionStatus {
    /// Status implied by a failed request, if the failure says anything
    /// about connectivity
    pub fn from_error(err: &AssistError) -> Option<Self> {
        match err {
            AssistError::NotConfigured => Some(Self::NotConfigured),
            AssistError::Authentication => Some(Self::Unauthorized),
            AssistError::Network(_) | AssistError::Timeout => Some(Self::Unreachable),
            _ => None,
        }
    }
}

pub type SharedStatus = Arc<RwLock<ConnectionStatus>>;

/// Runs one bounded connectivity check and records the outcome
pub async fn check_once(
    client: Option<&dyn CompletionClient>,
    status: &SharedStatus,
    limit: Duration,
) -> ConnectionStatus {
    let next = match client {
        None => ConnectionStatus::NotConfigured,
        Some(client) => match tokio::time::timeout(limit, client.check_connection()).await {
            Ok(Ok(())) => ConnectionStatus::Connected,
            Ok(Err(AssistError::RateLimited { .. })) => ConnectionStatus::Connected,
            Ok(Err(e)) => {
                warn!(error = %e, "AI connectivity check failed");
                ConnectionStatus::from_error(&e).unwrap_or(ConnectionStatus::Unreachable)
            }
            Err(_) => {
                warn!(timeout_ms = limit.as_millis() as u64, "AI connectivity check timed out");
                ConnectionStatus::Unreachable
            }
        },
    };

    let mut current = status.write().await;
    if *current != next {
        info!(from = ?*current, to = ?next, "AI connection status changed");
    }
    *current = next;
    next
}

/// Handle to the background polling task
pub struct ConnectionMonitor {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

impl ConnectionMonitor {
    pub fn spawn(
        client: Option<Arc<dyn CompletionClient>>,
        status: SharedStatus,
        interval: Duration,
        check_timeout: Duration,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let result = check_once(client.as_deref(), &status, check_timeout).await;
                        debug!(status = ?result, "AI connectivity polled");
                        if client.is_none() {
                            break;
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("AI connection monitor stopped");
        });

        Self { handle, shutdown }
    }

    /// Signals the task to stop and waits for it
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
