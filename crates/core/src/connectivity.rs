//! Periodic probe of backend reachability.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::{sync::mpsc, time};
use tracing::{debug, info, warn};

use crate::{
    api::{routes, ApiClient},
    config::ConnectivityConfig,
};

/// Result of one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// The backend answered successfully.
    Connected,
    /// The probe failed.
    Disconnected {
        /// Why the probe failed.
        reason: String,
    },
}

impl ConnectionStatus {
    /// Whether the backend answered.
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Short label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected { .. } => "Disconnected",
        }
    }
}

/// A probe result with the time it completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityReport {
    #[allow(missing_docs)]
    pub status: ConnectionStatus,
    #[allow(missing_docs)]
    pub checked_at: DateTime<Utc>,
}

/// Events emitted by [`ConnectivityMonitor::run`].
#[derive(Debug, Clone)]
pub enum ConnectivityEvent {
    /// A probe started.
    Checking,
    /// A probe finished.
    Checked(ConnectivityReport),
}

/// Probes `GET /jogos` on a fixed interval.
pub struct ConnectivityMonitor {
    client: ApiClient,
    interval: Duration,
    probe_timeout: Duration,
}

impl ConnectivityMonitor {
    /// Monitor probing every `interval` with a 5 second timeout.
    pub fn new(client: ApiClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            probe_timeout: Duration::from_secs(5),
        }
    }

    /// Monitor using the configured interval and timeout.
    pub fn from_config(client: ApiClient, config: &ConnectivityConfig) -> Self {
        Self::new(client, config.interval()).with_probe_timeout(config.probe_timeout())
    }

    /// Override the per-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Run one probe.
    pub async fn check(&self) -> ConnectivityReport {
        let status = match self
            .client
            .get_with_timeout::<Value>(routes::GAMES, self.probe_timeout)
            .await
        {
            Ok(_) => ConnectionStatus::Connected,
            Err(err) => {
                warn!(%err, "backend unreachable");
                ConnectionStatus::Disconnected {
                    reason: err.to_string(),
                }
            }
        };
        debug!(connected = status.is_connected(), "connectivity probe finished");
        ConnectivityReport {
            status,
            checked_at: Utc::now(),
        }
    }

    /// Probe immediately and then on every tick until the receiver is dropped.
    pub async fn run(self, sender: mpsc::Sender<ConnectivityEvent>) {
        info!(interval = ?self.interval, "connectivity monitor started");
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if sender.send(ConnectivityEvent::Checking).await.is_err() {
                break;
            }
            let report = self.check().await;
            if sender.send(ConnectivityEvent::Checked(report)).await.is_err() {
                break;
            }
        }
        info!("connectivity monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeBackend;
    use anyhow::Result;
    use serde_json::json;

    #[tokio::test]
    async fn check_reports_connected_and_disconnected() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let monitor = ConnectivityMonitor::new(backend.client(), Duration::from_secs(60));

        let report = monitor.check().await;
        assert_eq!(report.status, ConnectionStatus::Connected);

        backend.fail_next("/jogos", 500, json!({"message": "down"}));
        let report = monitor.check().await;
        assert!(!report.status.is_connected());
        assert_eq!(report.status.label(), "Disconnected");
        Ok(())
    }

    #[tokio::test]
    async fn run_emits_checking_then_checked_and_stops() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let monitor = ConnectivityMonitor::new(backend.client(), Duration::from_millis(20));
        let (sender, mut receiver) = mpsc::channel(8);
        let handle = tokio::spawn(monitor.run(sender));

        assert!(matches!(receiver.recv().await, Some(ConnectivityEvent::Checking)));
        match receiver.recv().await {
            Some(ConnectivityEvent::Checked(report)) => assert!(report.status.is_connected()),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(matches!(receiver.recv().await, Some(ConnectivityEvent::Checking)));

        drop(receiver);
        time::timeout(Duration::from_secs(5), handle).await??;
        assert!(!backend.requests_to("/jogos").is_empty());
        Ok(())
    }
}
