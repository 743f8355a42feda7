//! Poll loop driving session, snapshot, reconciliation and delivery

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::reconciler::reconcile;
use crate::common::clock::TokioSleeper;
use crate::common::errors::{MonitorError, Result};
use crate::common::traits::{Notifier, PositionSource, SessionProvider, Sleeper};
use crate::common::types::{PositionSnapshot, Session};
use crate::config::types::AppSettings;

/// Loop timing and recovery settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Delay before each poll
    pub poll_interval: Duration,
    /// Start over with a new session when the current one expires
    pub reauthenticate_on_expiry: bool,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            reauthenticate_on_expiry: false,
        }
    }
}

impl From<&AppSettings> for MonitorSettings {
    fn from(settings: &AppSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            reauthenticate_on_expiry: settings.reauthenticate_on_expiry,
        }
    }
}

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Open positions in the fresh snapshot
    pub open_positions: usize,
    /// Messages produced by reconciliation
    pub messages: usize,
    /// Messages the channel accepted
    pub delivered: usize,
}

impl CycleReport {
    pub fn failed(&self) -> usize {
        self.messages - self.delivered
    }
}

/// Watches one account and reports position changes
///
/// Strictly sequential: one fetch, one reconciliation and one send at a time.
/// The only state carried between cycles is the session and the baseline.
pub struct PositionMonitor<A, P, N> {
    sessions: A,
    positions: P,
    notifier: N,
    sleeper: Arc<dyn Sleeper>,
    settings: MonitorSettings,
}

impl<A, P, N> PositionMonitor<A, P, N>
where
    A: SessionProvider,
    P: PositionSource,
    N: Notifier,
{
    pub fn new(sessions: A, positions: P, notifier: N, settings: MonitorSettings) -> Self {
        Self {
            sessions,
            positions,
            notifier,
            sleeper: Arc::new(TokioSleeper),
            settings,
        }
    }

    /// Replace the sleeper used between polls
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Run until a terminal state is reached
    ///
    /// Never returns `Ok`. Session failures end in `AuthFailed`, snapshot
    /// failures in `FetchFailed`. Delivery failures are logged and skipped.
    pub async fn run(&self) -> std::result::Result<Infallible, MonitorError> {
        let (mut session, mut baseline) = self.start().await?;

        loop {
            self.sleeper.sleep(self.settings.poll_interval).await;

            match self.poll_once(&session, &baseline).await {
                Ok((current, _report)) => baseline = current,
                Err(e) if e.is_session_expired() && self.settings.reauthenticate_on_expiry => {
                    warn!(
                        "Session expired after {}s, re-authenticating: {}",
                        session.age().num_seconds(),
                        e
                    );
                    (session, baseline) = self.start().await?;
                }
                Err(e) => {
                    error!("Failed to get current positions, stopping execution: {}", e);
                    return Err(MonitorError::FetchFailed(e));
                }
            }
        }
    }

    /// Acquire a session and seed the baseline; the seed is never diffed
    async fn start(&self) -> std::result::Result<(Session, PositionSnapshot), MonitorError> {
        let session = self.sessions.acquire().await.map_err(|e| {
            error!("Failed to get session, stopping execution: {}", e);
            MonitorError::AuthFailed(e)
        })?;

        let baseline = self.positions.fetch_positions(&session).await.map_err(|e| {
            error!("Failed to get initial positions, stopping execution: {}", e);
            MonitorError::FetchFailed(e)
        })?;

        info!("Monitoring started with {} open positions", baseline.len());
        debug!(deal_ids = ?baseline.deal_ids().collect::<Vec<_>>(), "Baseline seeded");
        Ok((session, baseline))
    }

    /// Fetch a fresh snapshot, report changes against `baseline`, return the new baseline
    ///
    /// A failed snapshot fetch is returned untouched; nothing is sent in that case.
    pub async fn poll_once(
        &self,
        session: &Session,
        baseline: &PositionSnapshot,
    ) -> Result<(PositionSnapshot, CycleReport)> {
        let current = self.positions.fetch_positions(session).await?;
        let report = self.report_changes(session, baseline, &current).await;
        Ok((current, report))
    }

    /// Reconcile two snapshots and send every message in order
    pub async fn report_changes(
        &self,
        session: &Session,
        baseline: &PositionSnapshot,
        current: &PositionSnapshot,
    ) -> CycleReport {
        let messages = reconcile(baseline, current, &self.positions, session).await;

        let mut report = CycleReport {
            open_positions: current.len(),
            messages: messages.len(),
            delivered: 0,
        };

        for message in &messages {
            match self.notifier.send(message).await {
                Ok(()) => report.delivered += 1,
                Err(e) => error!("Failed to send message: {}", e),
            }
        }

        if report.messages > 0 {
            info!(
                open = report.open_positions,
                sent = report.delivered,
                failed = report.failed(),
                "Reported position changes"
            );
        } else {
            debug!(open = report.open_positions, "No position changes");
        }

        report
    }
}
