/*
 * Responsibility
 * - 起動時のエラー定義 (bind / serve)
 * - handler 側のエラーは axum のデフォルト応答に任せる
 */
use std::io;
use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
