//! The page-wide registry and the functions exported to JavaScript.

use std::cell::RefCell;

use reader_common::{BrowserEvent, HookId, HookKind, ServerCommand};
use reader_config::BridgeConfig;
use reader_hooks::{channel, HookRegistry, Inbox};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

use super::console;
use super::host::WebHost;
use super::live_view::LiveViewHook;

struct Runtime {
    registry: HookRegistry<WebHost>,
    inbox: Inbox,
}

impl Runtime {
    fn new() -> Option<Self> {
        let host = WebHost::new()?;
        let (outbox, inbox) = channel::channel();
        Some(Self {
            registry: HookRegistry::new(host, BridgeConfig::default(), outbox),
            inbox,
        })
    }

    /// Push every queued event to the server through its hook's `pushEvent`.
    fn flush(&mut self) {
        for envelope in self.inbox.drain() {
            let Some(hook) = self.registry.host().hook(envelope.hook) else {
                debug!(hook = %envelope.hook, "event for unbound hook dropped");
                continue;
            };
            let payload = envelope.event.payload().to_string();
            match js_sys::JSON::parse(&payload) {
                Ok(value) => hook.push_event(envelope.event.name(), &value),
                Err(e) => warn!(hook = %envelope.hook, error = ?e, "payload not representable"),
            }
        }
    }
}

thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

/// Run `f` against the page runtime, creating it on first use, then flush
/// any server-bound events it produced.
fn with_runtime<R>(f: impl FnOnce(&mut Runtime) -> R) -> Option<R> {
    RUNTIME.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            warn!("re-entrant bridge call ignored");
            return None;
        };
        if slot.is_none() {
            *slot = Runtime::new();
        }
        let runtime = slot.as_mut()?;
        let out = f(runtime);
        runtime.flush();
        Some(out)
    })
}

pub(super) fn dispatch_browser_event(owner: HookId, event: BrowserEvent) {
    with_runtime(|rt| rt.registry.dispatch_browser_event(owner, event));
}

pub(super) fn deliver_command(owner: HookId, command: ServerCommand) {
    with_runtime(|rt| rt.registry.deliver_command(owner, command));
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console::init(BridgeConfig::default().logging.level);
}

/// Replace the configuration from a JSON object. Applies to hooks mounted
/// afterwards; the console log level changes immediately.
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let config = reader_config::config_from_json(json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    console::set_level(config.logging.level);
    with_runtime(|rt| rt.registry.set_config(config))
        .ok_or_else(|| JsValue::from_str("reader bridge unavailable"))
}

/// Attach the hook named `name` to a LiveView hook object.
#[wasm_bindgen(js_name = mountHook)]
pub fn mount_hook(name: &str, hook: LiveViewHook) -> Result<MountedHook, JsValue> {
    let kind = HookKind::from_name(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let element = hook.el();
    with_runtime(|rt| {
        let id = rt.registry.allocate_id();
        rt.registry.host().bind_hook(id, hook);
        rt.registry
            .mount_as(id, kind, element)
            .map(|id| MountedHook { id })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
    .unwrap_or_else(|| Err(JsValue::from_str("reader bridge unavailable")))
}

/// Handle kept by the JavaScript hook object between callbacks.
#[wasm_bindgen]
pub struct MountedHook {
    id: HookId,
}

#[wasm_bindgen]
impl MountedHook {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> u32 {
        self.id.0
    }

    pub fn updated(&self) {
        with_runtime(|rt| {
            if let Err(e) = rt.registry.update(self.id) {
                warn!(hook = %self.id, error = %e, "update rejected");
            }
        });
    }

    pub fn destroyed(&self) {
        with_runtime(|rt| {
            rt.registry.destroy(self.id);
            rt.registry.host().unbind_hook(self.id);
        });
    }
}
