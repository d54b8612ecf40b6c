//! Tick loop driving the daily rotation.
//!
//! Each tick claims the configured hook if it is due at `now`, which advances
//! the registration to its next occurrence, and only then runs the rotation.
//! A failed run waits for the next period; a registration that cannot be
//! claimed is not run.

use std::time::Duration;

use chrono::{DateTime, Utc};
use spotlight_core::rotation::{self, RotationReport};
use spotlight_core::store::RunTrigger;

use crate::state::AppState;

/// Run the scheduled rotation if its hook is due. Blocking.
pub fn run_due(app: &AppState, now: DateTime<Utc>) -> spotlight_core::Result<Option<RotationReport>> {
    let hook = app.config.hook.as_str();
    let claimed = match app.store.claim_due(hook, now) {
        Ok(claimed) => claimed,
        Err(e) => {
            tracing::warn!(hook, error = %e, "failed to claim schedule, rotation not run");
            return Err(e);
        }
    };
    if claimed.is_none() {
        return Ok(None);
    }

    let report = rotation::run(
        app.catalog.as_ref(),
        &app.store,
        &app.rotation_options(RunTrigger::Scheduled),
    )?;
    Ok(Some(report))
}

pub async fn tick_loop(app: AppState, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let state = app.clone();
        let joined = tokio::task::spawn_blocking(move || run_due(&state, Utc::now())).await;
        match joined {
            Ok(Ok(Some(report))) => tracing::info!(
                unfeatured = report.unfeatured.len(),
                featured = report.featured.len(),
                skipped = report.skipped,
                "scheduled rotation completed"
            ),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "scheduled tick failed"),
            Err(e) => tracing::warn!(error = %e, "scheduler task join error"),
        }
    }
}
