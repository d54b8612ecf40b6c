use axum::extract::State;
use axum::Json;

use spotlight_core::store::Schedule;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/schedule: the daily registration, or `null` when deactivated.
pub async fn get_schedule(State(app): State<AppState>) -> Result<Json<Option<Schedule>>, AppError> {
    let store = app.store.clone();
    let hook = app.config.hook.clone();
    let schedule = tokio::task::spawn_blocking(move || store.schedule(&hook))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(schedule))
}
