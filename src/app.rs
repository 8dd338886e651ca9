/*
 * Responsibility
 * - Config読み込み → Logger 生成 → Router 組み立て
 * - Middleware の適用 (request log)
 * - axum::serve() で起動 (bind 失敗はログを出して異常終了)
 */
use std::fmt::Display;
use std::net::SocketAddr;
use std::panic;

use axum::Router;
use tokio::net::TcpListener;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, PORT};
use crate::error::StartupError;
use crate::logger::{self, Logger};
use crate::{api, middleware, state::AppState};

pub async fn run() -> Result<(), StartupError> {
    let config = Config::from_env();

    let logger = logger::init(config.log_level);
    if let Some(raw) = &config.ignored_log_level {
        logger.info(
            "Unknown LOG_LEVEL, using default",
            &[("value", raw), ("level", &config.log_level)],
        );
    }
    logger.debug("Configuration loaded", &[("log_level", &config.log_level)]);
    init_tracing(&logger, config.log_level);
    init_panic_hook();

    let app = build_router(AppState::new(logger.clone()));

    let listener = bind(config.addr, &logger).await?;

    logger.info(
        "Server is running",
        &[
            ("port", &format!(":{PORT}")),
            ("env", &config.app_env.as_str()),
        ],
    );
    logger.info(
        &format!("Try visiting http://localhost:{PORT}/health to check if the server is running"),
        &[],
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|err| {
        logger.error("Server stopped", Some(&err), &[]);
        StartupError::Serve(err)
    })
}

async fn bind(addr: SocketAddr, logger: &Logger) -> Result<TcpListener, StartupError> {
    TcpListener::bind(addr).await.map_err(|source| {
        logger.error("Server failed to start", Some(&source), &[("addr", &addr)]);
        StartupError::Bind { addr, source }
    })
}

pub fn build_router(state: AppState) -> Router {
    middleware::request_log::apply(api::routes(), state.clone()).with_state(state)
}

/// Routes `tracing` events (ours and dependencies') through the same renderer.
/// `RUST_LOG` overrides the configured level for these events only.
fn init_tracing(logger: &Logger, level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Already installed (e.g. run() called twice in one process): keep the first.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(logger.renderer().clone())
        .try_init();
}

fn init_panic_hook() {
    // The default hook still runs afterwards; no recovery is added here.
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        log_panic(&logger::get(), info);
        default_hook(info);
    }))
}

fn log_panic(logger: &Logger, detail: &dyn Display) {
    logger.error("panic", None, &[("detail", &detail)]);
}
