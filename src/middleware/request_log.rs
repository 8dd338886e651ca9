//! Per-request access log.
//!
//! Wraps the whole router: every request, including fallback 404s, yields
//! exactly one `HTTP Request` record once the inner handler has returned.
//! Handlers that never set a status produce axum's default `200 OK`, so that
//! is what gets logged for them.
//!
//! Panics are not caught here; they behave exactly as hyper/axum handle them.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::state::AppState;

/// Applies request logging to every route (and the fallback) of `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, request_log))
}

async fn request_log(State(state): State<AppState>, req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    // Only present when served via `into_make_service_with_connect_info`.
    let remote_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let response = next.run(req).await;

    state.logger.request(
        method.as_str(),
        &path,
        &remote_addr,
        response.status(),
        start.elapsed(),
    );

    response
}
