// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }
}

/// Retry an async operation with a fixed delay between attempts.
///
/// `op` receives the zero-based attempt number. The last error is returned once
/// `policy.max_retries` retries have failed.
pub async fn retry_fixed<F, Fut, T, E>(mut op: F, policy: RetryPolicy, label: &str) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(v) => return Ok(v),
            Err(e) if attempt < policy.max_retries => {
                tracing::warn!(target: "fetch", attempt, %label, error = %e, "attempt failed; retrying");
                sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::warn!(target: "fetch", attempt, %label, error = %e, "giving up after final attempt");
                return Err(e);
            }
        }
    }
}
