//! One-line rendering of `tracing` events for the browser console.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::Event;

#[derive(Debug, Default)]
pub(crate) struct LogLine {
    message: String,
    fields: String,
}

impl LogLine {
    pub(crate) fn from_event(event: &Event<'_>) -> Self {
        let mut line = Self::default();
        event.record(&mut line);
        line
    }

    /// `target: message key=value ...`
    pub(crate) fn render(&self, target: &str) -> String {
        format!("{target}: {}{}", self.message, self.fields)
    }
}

impl Visit for LogLine {
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
