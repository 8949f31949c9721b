//! Routes `tracing` output to the browser console.

use std::cell::RefCell;

use reader_config::LogLevel;
use tracing::{warn, Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, Registry};
use wasm_bindgen::JsValue;

use crate::log_line::LogLine;

struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let line = JsValue::from_str(&LogLine::from_event(event).render(meta.target()));
        match *meta.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::debug_1(&line),
        }
    }
}

thread_local! {
    static LEVEL: RefCell<Option<reload::Handle<LevelFilter, Registry>>> = const { RefCell::new(None) };
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
    }
}

/// Install the console subscriber. A page that already has a global
/// subscriber keeps it.
pub(super) fn init(level: LogLevel) {
    let (filter, handle) = reload::Layer::new(level_filter(level));
    if tracing_subscriber::registry()
        .with(filter)
        .with(ConsoleLayer)
        .try_init()
        .is_ok()
    {
        LEVEL.with(|slot| *slot.borrow_mut() = Some(handle));
    }
}

pub(super) fn set_level(level: LogLevel) {
    LEVEL.with(|slot| {
        if let Some(handle) = slot.borrow().as_ref() {
            if let Err(e) = handle.reload(level_filter(level)) {
                warn!(error = %e, "console log level unchanged");
            }
        }
    });
}
