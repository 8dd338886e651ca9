/*
 * Responsibility
 * - アプリ共通の Logger (info / error / debug / request)
 * - 出力は PrettyRenderer に委譲 (level 判定も renderer 側の policy)
 * - プロセス全体で 1 インスタンス: init() / get()
 *   - 通常は app::run() で作った Logger を AppState 経由で渡す
 */
mod record;
mod renderer;

use std::error::Error as StdError;
use std::fmt::Display;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use axum::http::StatusCode;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

pub use renderer::PrettyRenderer;

use record::{Field, Record};

#[cfg(test)]
pub(crate) use renderer::tests::Captured;

/// Key/value pairs as passed at call sites: `&[("method", &method), ("code", &code)]`.
pub type Fields<'a> = &'a [(&'a str, &'a dyn Display)];

#[derive(Clone, Debug)]
pub struct Logger {
    renderer: Arc<PrettyRenderer>,
}

impl Logger {
    /// Stdout logger with the given minimum level.
    pub fn new(min_level: LevelFilter) -> Self {
        Self::with_renderer(PrettyRenderer::new(min_level))
    }

    pub fn with_renderer(renderer: PrettyRenderer) -> Self {
        Self {
            renderer: Arc::new(renderer),
        }
    }

    pub fn renderer(&self) -> &PrettyRenderer {
        &self.renderer
    }

    pub fn info(&self, message: &str, fields: Fields<'_>) {
        self.log(Level::INFO, message, record::fields_from(fields));
    }

    /// Logs at error level. When `err` is present its message is appended
    /// as an `error` field after the caller's fields.
    pub fn error(&self, message: &str, err: Option<&dyn StdError>, fields: Fields<'_>) {
        let mut fields = record::fields_from(fields);
        if let Some(err) = err {
            fields.push(Field::new("error", err));
        }
        self.log(Level::ERROR, message, fields);
    }

    pub fn debug(&self, message: &str, fields: Fields<'_>) {
        self.log(Level::DEBUG, message, record::fields_from(fields));
    }

    /// One line per served request.
    ///
    /// `duration` uses `Duration`'s `Debug` form (`1.5ms`, `350µs`, `65s`), so
    /// durations past a minute stay in seconds instead of `1m5s`.
    pub fn request(
        &self,
        method: &str,
        path: &str,
        remote_addr: &str,
        status: StatusCode,
        duration: Duration,
    ) {
        self.info(
            "HTTP Request",
            &[
                ("method", &method),
                ("path", &path),
                ("status", &status_indicator(status)),
                ("code", &status.as_u16()),
                ("duration", &format!("{duration:?}")),
                ("ip", &remote_addr),
            ],
        );
    }

    // Scoped loggers; no caller in the server itself yet.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_fields(&self, fields: Fields<'_>) -> Self {
        Self::with_renderer(self.renderer.with_fields(record::fields_from(fields)))
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_group(&self, name: &str) -> Self {
        Self::with_renderer(self.renderer.with_group(name))
    }

    fn log(&self, level: Level, message: &str, fields: Vec<Field>) {
        if !self.renderer.is_enabled(level) {
            return;
        }
        self.renderer.handle(&Record::new(level, message, fields));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LevelFilter::INFO)
    }
}

fn status_indicator(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400.. => "❌",
        300..=399 => "⚠️",
        _ => "✅",
    }
}

static GLOBAL: RwLock<Option<Logger>> = RwLock::new(None);

/// Builds a stdout logger and installs it process-wide, replacing any
/// previously installed one.
pub fn init(min_level: LevelFilter) -> Logger {
    let logger = Logger::new(min_level);
    let mut slot = GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *slot = Some(logger.clone());
    logger
}

/// Returns the process-wide logger, initializing it at info level on first use.
pub fn get() -> Logger {
    {
        let slot = GLOBAL.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(logger) = slot.as_ref() {
            return logger.clone();
        }
    }

    let mut slot = GLOBAL.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    slot.get_or_insert_with(Logger::default).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Boom;

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("boom")
        }
    }

    impl StdError for Boom {}

    fn capture(min_level: LevelFilter) -> (Logger, Captured) {
        let out = Captured::default();
        let logger = Logger::with_renderer(PrettyRenderer::with_writer(out.clone(), min_level));
        (logger, out)
    }

    fn field_lines(text: &str) -> Vec<&str> {
        text.lines().filter(|l| l.starts_with("   ")).collect()
    }

    #[test]
    fn info_prints_fields_in_order() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger.info("hi", &[("z", &1), ("a", &"x"), ("m", &true)]);

        let text = out.text();
        assert!(text.contains("INFO: hi\n"));
        assert_eq!(field_lines(&text), ["   z: 1", "   a: x", "   m: true"]);
    }

    #[test]
    fn error_appends_error_field_after_caller_fields() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger.error("x", Some(&Boom), &[("k", &"v")]);

        let text = out.text();
        assert!(text.contains("ERROR: x\n"));
        assert_eq!(field_lines(&text), ["   k: v", "   error: boom"]);
    }

    #[test]
    fn error_without_err_adds_nothing() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger.error("x", None, &[("k", &"v")]);

        assert_eq!(field_lines(&out.text()), ["   k: v"]);
    }

    #[test]
    fn debug_is_suppressed_at_info() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger.debug("hidden", &[("k", &"v")]);

        assert!(out.text().is_empty());
    }

    #[test]
    fn debug_prints_when_policy_allows() {
        let (logger, out) = capture(LevelFilter::DEBUG);

        logger.debug("shown", &[]);

        assert!(out.text().contains("DEBUG: shown\n"));
    }

    #[test]
    fn request_line_shape() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger.request(
            "GET",
            "/health",
            "127.0.0.1:5555",
            StatusCode::OK,
            Duration::from_micros(1500),
        );

        let text = out.text();
        assert!(text.contains("INFO: HTTP Request\n"));
        assert_eq!(
            field_lines(&text),
            [
                "   method: GET",
                "   path: /health",
                "   status: ✅",
                "   code: 200",
                "   duration: 1.5ms",
                "   ip: 127.0.0.1:5555",
            ]
        );
    }

    #[test]
    fn status_indicator_bands() {
        assert_eq!(status_indicator(StatusCode::OK), "✅");
        assert_eq!(status_indicator(StatusCode::NO_CONTENT), "✅");
        assert_eq!(status_indicator(StatusCode::MOVED_PERMANENTLY), "⚠️");
        assert_eq!(status_indicator(StatusCode::NOT_FOUND), "❌");
        assert_eq!(status_indicator(StatusCode::INTERNAL_SERVER_ERROR), "❌");
    }

    #[test]
    fn scoped_logger_carries_bound_fields() {
        let (logger, out) = capture(LevelFilter::INFO);

        logger
            .with_fields(&[("component", &"server")])
            .info("up", &[("port", &8000)]);

        assert_eq!(
            field_lines(&out.text()),
            ["   component: server", "   port: 8000"]
        );
    }

    #[test]
    fn get_always_returns_a_usable_logger() {
        let logger = get();
        assert_eq!(logger.renderer().min_level(), LevelFilter::INFO);

        let installed = init(LevelFilter::INFO);
        assert_eq!(installed.renderer().min_level(), get().renderer().min_level());
    }
}
