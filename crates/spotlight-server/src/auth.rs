use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ApiResponse;

pub const AUTH_COOKIE: &str = "spotlight_admin";

/// Holder of the admin capability check.
///
/// When `token` is `None` nobody is an admin: every request is rejected.
#[derive(Clone)]
pub struct AdminAuth {
    token: Option<String>,
}

impl AdminAuth {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

/// Axum middleware that admits only callers presenting the admin token.
///
/// Auth flow (evaluated in order):
/// 1. No token configured → reject
/// 2. Cookie `spotlight_admin` matches → passthrough
/// 3. `Authorization: Bearer TOKEN` matches → passthrough
/// 4. Query param `?auth=TOKEN` matches → set session cookie, 302 to same path without param
/// 5. None matched → `/api/*` gets 403 `{success: false, message}`, anything
///    else a 401 HTML page
pub async fn admin_middleware(
    State(auth): State<AdminAuth>,
    req: Request,
    next: Next,
) -> Response {
    let is_api = req.uri().path().starts_with("/api/");
    let Some(token) = auth.token.as_deref() else {
        return deny(is_api);
    };

    if let Some(cookies) = req.headers().get("cookie").and_then(|v| v.to_str().ok()) {
        let prefix = format!("{AUTH_COOKIE}=");
        if cookies
            .split(';')
            .filter_map(|part| part.trim().strip_prefix(prefix.as_str()))
            .any(|val| val == token)
        {
            return next.run(req).await;
        }
    }

    if let Some(bearer) = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        if bearer.trim() == token {
            return next.run(req).await;
        }
    }

    // One-time bootstrap via `?auth=TOKEN`: set cookie and redirect.
    if !is_api {
        let uri = req.uri().clone();
        if let Some(query) = uri.query() {
            if extract_auth_param(query) == Some(token) {
                let destination = strip_auth_param(uri.path(), query);
                let cookie = format!("{AUTH_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/");
                return Response::builder()
                    .status(StatusCode::FOUND)
                    .header("Location", destination)
                    .header("Set-Cookie", cookie)
                    .body(Body::empty())
                    .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response());
            }
        }
    }

    tracing::warn!(path = %req.uri().path(), "rejected request without admin capability");
    deny(is_api)
}

fn deny(is_api: bool) -> Response {
    if is_api {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::failure("permission denied")),
        )
            .into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        axum::response::Html(concat!(
            "<!DOCTYPE html><html><head><title>Access Denied</title></head>",
            "<body style=\"font-family:sans-serif;padding:2rem\">",
            "<h1>Access Denied</h1>",
            "<p>Open the admin URL printed by <code>spotlight serve</code>.</p>",
            "</body></html>",
        )),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn extract_auth_param(query: &str) -> Option<&str> {
    query.split('&').find_map(|kv| kv.strip_prefix("auth="))
}

fn strip_auth_param(path: &str, query: &str) -> String {
    let remaining: Vec<&str> = query
        .split('&')
        .filter(|kv| !kv.starts_with("auth="))
        .collect();
    if remaining.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, remaining.join("&"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
