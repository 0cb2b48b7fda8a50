use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::Dashboard;
use crate::loader::{DATA_FILE, FileSource};

#[derive(Clone)]
struct AppState {
    dashboard: Arc<Dashboard>,
    web_dir: Arc<PathBuf>,
}

/// Router serving the dashboard for `web_dir`.
///
/// Every page request reloads `data.json`, so a republished run shows up on
/// the next reload.
pub fn router(dashboard: Dashboard, web_dir: PathBuf) -> Router {
    let state = AppState {
        dashboard: Arc::new(dashboard),
        web_dir: Arc::new(web_dir),
    };
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/data.json", get(data_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn run(dashboard: Dashboard, web_dir: PathBuf, listen: &str) -> Result<()> {
    let addr: SocketAddr = listen
        .parse()
        .with_context(|| format!("invalid listen address: {listen}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind dashboard listener at {addr}"))?;
    info!(addr = %addr, web_dir = %web_dir.display(), "serving dashboard");

    axum::serve(listener, router(dashboard, web_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("dashboard server terminated unexpectedly")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
    }
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let dashboard = Arc::clone(&state.dashboard);
    let source = FileSource::in_dir(state.web_dir.as_path());
    match tokio::task::spawn_blocking(move || dashboard.render_html(&source)).await {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            warn!(error = %err, "dashboard render task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn data_handler(State(state): State<AppState>) -> Response {
    let path = state.web_dir.join(DATA_FILE);
    match tokio::fs::read(&path).await {
        Ok(raw) => ([(header::CONTENT_TYPE, "application/json")], raw).into_response(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(err) => {
            warn!(error = %err, path = %path.display(), "failed to read summary document");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
