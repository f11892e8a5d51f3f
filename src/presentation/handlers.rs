// HTTP request handlers
use crate::application::signal_generator::ForcedEvent;
use crate::infrastructure::event_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use crate::presentation::page::render_page;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

const NOT_READY: &str = "simulation not ready";

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Server-rendered dashboard page
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    match state.ticker.latest() {
        Some(dashboard) => Html(render_page(&dashboard, state.refresh)).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, NOT_READY).into_response(),
    }
}

/// Latest snapshot as JSON
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Response {
    match state.ticker.latest() {
        Some(dashboard) => Json(dashboard.as_ref()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, NOT_READY).into_response(),
    }
}

/// Live snapshots as server-sent events
pub async fn stream(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_receiver(state.ticker.subscribe())
}

/// Trigger a demo event (`refill` or `contamination`)
pub async fn force_event(
    Path(kind): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let event: ForcedEvent = match kind.parse() {
        Ok(event) => event,
        Err(e) => return (StatusCode::NOT_FOUND, e.to_string()).into_response(),
    };

    // Plain form posts from the page go back to the page
    let wants_html = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("text/html"))
        .unwrap_or(false);

    match state.ticker.force(event).await {
        Ok(_) if wants_html => Redirect::to("/").into_response(),
        Ok(Some(dashboard)) => Json(dashboard.as_ref()).into_response(),
        Ok(None) => (StatusCode::SERVICE_UNAVAILABLE, NOT_READY).into_response(),
        Err(e) => {
            tracing::error!("Error forcing {} event: {}", event, e);
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}
