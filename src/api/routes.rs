/*
 * Responsibility
 * - URL 構造を定義 (/health のみ)
 * - request log middleware はここではなく app 側で Router 全体に掛ける
 */
use axum::{Router, routing::get};

use crate::api::handlers::health::health;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
