//! Periodic sweep that closes rule votes past their deadline.
//!
//! Spawns a background task that finds open rules whose voting deadline has
//! passed and marks them closed. Runs on a fixed interval using
//! `tokio::time::interval`, and records an audit row in `background_tasks`
//! after every run.

use std::time::Duration;

use chrono::Utc;
use labelhub_core::voting::voting_expired;
use labelhub_db::repositories::{RuleRepo, TaskRepo};
use serde_json::json;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Task name recorded in `background_tasks`.
pub const TASK_NAME: &str = "check_voting_end_dates";

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Run the voting deadline sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Voting sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Voting sweep stopping");
                break;
            }
            _ = interval.tick() => {
                sweep_once(&pool).await;
            }
        }
    }
}

/// Close every open rule whose deadline has passed and record the outcome.
///
/// The date-only query over-selects rules ending today; the time component
/// is checked in memory so a rule closing at 18:00 stays open until then.
pub async fn sweep_once(pool: &PgPool) {
    let now = Utc::now().naive_utc();

    let outcome = async {
        let candidates = RuleRepo::open_rules_ending_by(pool, now.date()).await?;
        let expired: Vec<_> = candidates
            .iter()
            .filter(|r| voting_expired(r.voting_end_date, r.voting_end_time, now))
            .map(|r| r.id)
            .collect();
        let closed = RuleRepo::close_by_ids(pool, &expired).await?;
        Ok::<u64, sqlx::Error>(closed)
    }
    .await;

    let record = match &outcome {
        Ok(closed) => {
            if *closed > 0 {
                tracing::info!(closed, "Voting sweep: closed expired votes");
            } else {
                tracing::debug!("Voting sweep: nothing to close");
            }
            TaskRepo::record(
                pool,
                TASK_NAME,
                true,
                Some(json!({ "closed": closed })),
                None,
            )
            .await
        }
        Err(e) => {
            tracing::error!(error = %e, "Voting sweep failed");
            TaskRepo::record(pool, TASK_NAME, false, None, Some(&e.to_string())).await
        }
    };

    if let Err(e) = record {
        tracing::error!(error = %e, "Failed to record voting sweep outcome");
    }
}
