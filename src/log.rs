//! Forwards `tracing` events to a line sink, such as the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// A [`Layer`] that renders each event as `target: message key=value ...`
/// and hands it to `sink` with the event's level.
pub struct LineLayer<F> {
    max_level: Level,
    sink: F,
}

impl<F> LineLayer<F>
where
    F: Fn(Level, &str) + 'static,
{
    /// Events more verbose than `max_level` are skipped.
    pub fn new(max_level: Level, sink: F) -> Self {
        Self { max_level, sink }
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

impl<S, F> Layer<S> for LineLayer<F>
where
    S: Subscriber,
    F: Fn(Level, &str) + 'static,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        *metadata.level() <= self.max_level
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        let line = format!("{}: {}{}", metadata.target(), visitor.message, visitor.fields);
        (self.sink)(*metadata.level(), &line);
    }
}
