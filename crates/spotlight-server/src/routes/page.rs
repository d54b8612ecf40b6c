use axum::extract::State;
use axum::response::Html;

use crate::error::AppError;
use crate::page;
use crate::state::AppState;

/// GET /: admin page listing the most recent run result.
///
/// Creates the empty run record on first view.
pub async fn admin_page(State(app): State<AppState>) -> Result<Html<String>, AppError> {
    let store = app.store.clone();
    let hook = app.config.hook.clone();
    let html = tokio::task::spawn_blocking(move || {
        let result = store.run_result_or_init()?;
        let schedule = store.schedule(&hook)?;
        Ok::<_, spotlight_core::SpotlightError>(page::render(&result, schedule.as_ref()))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Html(html))
}
