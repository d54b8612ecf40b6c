pub mod auth;
pub mod error;
pub mod page;
pub mod routes;
pub mod scheduler;
pub mod state;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with the admin page, API routes and auth.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let admin = auth::AdminAuth::new(app_state.config.admin_token.clone());

    Router::new()
        .route("/", get(routes::page::admin_page))
        .route("/api/rotation", get(routes::rotation::get_run_result))
        .route("/api/rotation/run", post(routes::rotation::manual_run))
        .route("/api/schedule", get(routes::schedule::get_schedule))
        .layer(middleware::from_fn_with_state(admin, auth::admin_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Start the admin server and the scheduler tick loop on `port`.
pub async fn serve(app_state: AppState, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(app_state, listener, open_browser).await
}

/// Start on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    app_state: AppState,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let tick = std::time::Duration::from_secs(app_state.config.server.tick_interval_secs);
    tokio::spawn(scheduler::tick_loop(app_state.clone(), tick));

    let app = build_router(app_state.clone());
    tracing::info!("spotlight admin listening on http://localhost:{actual_port}");

    if open_browser {
        let url = admin_url(&app_state, actual_port);
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Admin page URL carrying the one-time `?auth=` bootstrap parameter.
pub fn admin_url(app_state: &AppState, port: u16) -> String {
    match &app_state.config.admin_token {
        Some(token) => format!("http://localhost:{port}/?auth={token}"),
        None => format!("http://localhost:{port}/"),
    }
}
