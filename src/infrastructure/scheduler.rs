//! Daily purge of expired tokens.

use crate::application::maintenance::cleanup::{CleanupExpiredTokensUseCase, CleanupReport};
use crate::shared::error::AppError;
use crate::shared::retry::RetryPolicy;
use std::sync::Arc;
use time::{Duration, OffsetDateTime, Time};
use tokio::task::JoinHandle;

pub struct CleanupScheduler {
    use_case: Arc<CleanupExpiredTokensUseCase>,
    policy: RetryPolicy,
    hour_utc: u8,
}

impl CleanupScheduler {
    pub fn new(use_case: Arc<CleanupExpiredTokensUseCase>, policy: RetryPolicy, hour_utc: u8) -> Self {
        Self {
            use_case,
            policy,
            hour_utc,
        }
    }

    /// One run, retried per the policy. Also used for manual triggering.
    pub async fn run_once(&self) -> Result<CleanupReport, AppError> {
        self.policy
            .run("Expired token cleanup", || {
                self.use_case.execute(OffsetDateTime::now_utc())
            })
            .await
    }

    /// Run forever on the Tokio runtime. Abort the handle to stop.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let now = OffsetDateTime::now_utc();
                let next = match next_run_after(now, self.hour_utc) {
                    Ok(next) => next,
                    Err(e) => {
                        tracing::error!("Cleanup scheduler stopped: {}", e);
                        return;
                    }
                };
                tracing::debug!("Next token cleanup at {}", next);

                let wait = (next - now).unsigned_abs();
                tokio::time::sleep(wait).await;

                match self.run_once().await {
                    Ok(report) => tracing::info!(
                        "Token cleanup deleted {} refresh and {} reset tokens",
                        report.refresh_tokens,
                        report.reset_tokens
                    ),
                    Err(e) => tracing::error!(
                        "Token cleanup failed after {} attempts, waiting for next run: {}",
                        self.policy.max_attempts,
                        e
                    ),
                }
            }
        })
    }
}

/// First `hour_utc:00:00` strictly after `now`
pub fn next_run_after(now: OffsetDateTime, hour_utc: u8) -> anyhow::Result<OffsetDateTime> {
    let at = Time::from_hms(hour_utc, 0, 0)
        .map_err(|e| anyhow::anyhow!("Invalid cleanup hour {}: {}", hour_utc, e))?;
    let today = now.to_offset(time::UtcOffset::UTC).replace_time(at);

    Ok(if today > now {
        today
    } else {
        today + Duration::days(1)
    })
}
