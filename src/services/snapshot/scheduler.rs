// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::error::AppError;
use crate::services::snapshot::recorder::CycleReport;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Uniform random delay window, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayWindow {
    pub min: Duration,
    pub max: Duration,
}

impl DelayWindow {
    pub fn minutes(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_secs(min.saturating_mul(60)),
            max: Duration::from_secs(max.saturating_mul(60)),
        }
    }

    pub fn sample<G: Rng>(&self, rng: &mut G) -> Duration {
        let lo = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let hi = u64::try_from(self.max.as_millis())
            .unwrap_or(u64::MAX)
            .max(lo);
        Duration::from_millis(rng.random_range(lo..=hi))
    }
}

pub trait SnapshotCycle {
    fn run_cycle(&self) -> impl Future<Output = Result<CycleReport, AppError>>;
}

/// Runs one cycle at a time and picks the next start from the previous outcome.
pub struct Scheduler<C> {
    cycle: C,
    success_delay: DelayWindow,
    failure_delay: DelayWindow,
    shutdown: CancellationToken,
}

impl<C: SnapshotCycle> Scheduler<C> {
    pub fn new(
        cycle: C,
        success_delay: DelayWindow,
        failure_delay: DelayWindow,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            cycle,
            success_delay,
            failure_delay,
            shutdown,
        }
    }

    pub fn next_delay(&self, outcome: &Result<CycleReport, AppError>) -> Duration {
        let window = match outcome {
            Ok(_) => self.success_delay,
            Err(_) => self.failure_delay,
        };
        window.sample(&mut rand::rng())
    }

    /// Loops until shutdown. A cycle in progress always runs to commit or rollback.
    pub async fn run(&self) {
        loop {
            if self.shutdown.is_cancelled() {
                tracing::info!(target: "snapshot", "Shutdown requested; stopping scheduler");
                return;
            }

            let outcome = self.cycle.run_cycle().await;
            let delay = self.next_delay(&outcome);
            match &outcome {
                Ok(report) => tracing::info!(
                    target: "snapshot",
                    snapshot_id = report.snapshot_id,
                    next_in_secs = delay.as_secs(),
                    "Snapshot cycle done"
                ),
                Err(e) => tracing::error!(
                    target: "snapshot",
                    error = %e,
                    next_in_secs = delay.as_secs(),
                    "Snapshot cycle failed; rolled back"
                ),
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!(target: "snapshot", "Shutdown requested while waiting for next cycle");
                    return;
                }
                _ = sleep(delay) => {}
            }
        }
    }
}
