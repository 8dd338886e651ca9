//! Human-friendly multi-line renderer for log records.
//!
//! Every record becomes a block like:
//!
//! ```text
//!
//! 📝 [14:03:27] INFO: HTTP Request
//!    method: GET
//!    path: /health
//! ```
//!
//! Level filtering is not implemented here: the renderer holds a
//! [`LevelFilter`] and asks it. Only the output step is custom.
//!
//! The same renderer doubles as a `tracing_subscriber` layer, so events
//! emitted through `tracing::info!` and friends (ours or a dependency's)
//! come out in the same format.

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer};

use super::record::{Field, Record};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct PrettyRenderer {
    writer: SharedWriter,
    min_level: LevelFilter,
    bound: Vec<Field>,
    group: Option<String>,
}

impl PrettyRenderer {
    /// Renderer writing to stdout.
    pub fn new(min_level: LevelFilter) -> Self {
        Self::with_writer(io::stdout(), min_level)
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W, min_level: LevelFilter) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            min_level,
            bound: Vec::new(),
            group: None,
        }
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level <= self.min_level
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn min_level(&self) -> LevelFilter {
        self.min_level
    }

    /// Renders the record and writes it out. Write failures are dropped.
    pub fn handle(&self, record: &Record) {
        let block = self.render(record);

        // A poisoned lock only means another writer panicked mid-write; keep logging.
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writer.write_all(block.as_bytes());
        let _ = writer.flush();
    }

    /// Returns a renderer that prints `fields` on every record, before the record's own.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_fields(&self, fields: Vec<Field>) -> Self {
        let mut next = self.clone();
        next.bound.extend(fields.into_iter().map(|f| Field {
            key: self.qualify(&f.key),
            value: f.value,
        }));
        next
    }

    /// Returns a renderer that namespaces subsequent field keys under `name`.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_group(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let mut next = self.clone();
        next.group = Some(self.qualify(name));
        next
    }

    fn qualify(&self, key: &str) -> String {
        match &self.group {
            Some(group) => format!("{group}.{key}"),
            None => key.to_string(),
        }
    }

    fn render(&self, record: &Record) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "\n📝 [{}] {}: {}",
            record.timestamp.format("%H:%M:%S"),
            record.level,
            record.message
        );
        for field in &self.bound {
            let _ = writeln!(out, "   {}: {}", field.key, field.value);
        }
        for field in &record.fields {
            let _ = writeln!(out, "   {}: {}", self.qualify(&field.key), field.value);
        }
        out
    }
}

impl fmt::Debug for PrettyRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrettyRenderer")
            .field("min_level", &self.min_level)
            .field("bound", &self.bound)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

impl<S> Layer<S> for PrettyRenderer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let message = if visitor.message.is_empty() {
            event.metadata().target().to_string()
        } else {
            visitor.message
        };

        self.handle(&Record::new(
            *event.metadata().level(),
            message,
            visitor.fields,
        ));
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<Field>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push(Field::new(field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(Field::new(field.name(), format_args!("{value:?}")));
        }
    }
}
