/*
 * Responsibility
 * - GET /health (疎通用)
 * - body は固定文字列。serde で組み直すと空白が変わるのでそのまま返す
 */
use axum::{
    http::{StatusCode, header},
    response::IntoResponse,
};

pub const HEALTH_BODY: &str = r#"{"status": "healthy", "message": "Server is running"}"#;

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        HEALTH_BODY,
    )
}
