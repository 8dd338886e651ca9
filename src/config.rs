/*
 * Responsibility
 * - 環境変数や設定の読み込み (LOG_LEVEL, APP_ENV)
 * - 不正な値は既定値に倒す (起動は止めない)
 * - listen address は 0.0.0.0:8000 固定
 */
use std::net::{Ipv4Addr, SocketAddr};

use tracing_subscriber::filter::LevelFilter;

pub const PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub log_level: LevelFilter,
    pub app_env: AppEnv,
    /// Raw `LOG_LEVEL` value that was not understood; `log_level` fell back to info.
    pub ignored_log_level: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let raw_level = var("LOG_LEVEL");
        let log_level = raw_level
            .as_deref()
            .and_then(parse_log_level)
            .unwrap_or(LevelFilter::INFO);
        let ignored_log_level = raw_level.filter(|raw| parse_log_level(raw).is_none());

        let app_env = AppEnv::parse(&var("APP_ENV").unwrap_or_else(|| "development".to_string()));

        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, PORT)),
            log_level,
            app_env,
            ignored_log_level,
        }
    }
}

fn parse_log_level(raw: &str) -> Option<LevelFilter> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" => Some(LevelFilter::ERROR),
        _ => None,
    }
}
