use anyhow::Context;
use spotlight_server::AppState;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open_browser: bool) -> anyhow::Result<()> {
    let state = AppState::open(root).context("failed to open spotlight state")?;
    if state.config.admin_token.is_none() {
        eprintln!("warning: no admin_token in config; the admin page will reject every request");
    }
    let port = port.unwrap_or(state.config.server.port);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        let actual_port = listener.local_addr()?.port();
        println!("Admin page: {}", spotlight_server::admin_url(&state, actual_port));
        spotlight_server::serve_on(state, listener, open_browser).await
    })
}
