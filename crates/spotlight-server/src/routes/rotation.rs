use axum::extract::State;
use axum::Json;

use spotlight_core::rotation;
use spotlight_core::store::{RunResult, RunTrigger};

use crate::error::{ApiResponse, AppError};
use crate::state::AppState;

/// GET /api/rotation: the stored result of the most recent run.
pub async fn get_run_result(State(app): State<AppState>) -> Result<Json<RunResult>, AppError> {
    let store = app.store.clone();
    let result = tokio::task::spawn_blocking(move || store.load_run_result())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(result.unwrap_or_default()))
}

/// POST /api/rotation/run: run the rotation now and wait for it.
///
/// Only reachable with the admin capability; the auth middleware answers
/// everyone else with `{success: false}` before this handler runs.
pub async fn manual_run(State(app): State<AppState>) -> Result<Json<ApiResponse>, AppError> {
    let options = app.rotation_options(RunTrigger::Manual);
    let catalog = app.catalog.clone();
    let store = app.store.clone();
    let report = tokio::task::spawn_blocking(move || {
        rotation::run(catalog.as_ref(), &store, &options)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!(
        unfeatured = report.unfeatured.len(),
        featured = report.featured.len(),
        "manual rotation completed"
    );
    Ok(Json(ApiResponse::ok("manual run completed")))
}
