//! [`Host`] backed by the real DOM through `web-sys`.

use std::cell::RefCell;
use std::collections::BTreeMap;

use reader_common::{
    BridgeError, BrowserEvent, EventSource, HookId, ScrollBehavior, ScrollTarget, ServerCommand,
    ViewportState,
};
use reader_hooks::Host;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::live_view::LiveViewHook;
use super::runtime;
use crate::fullscreen_api::FullscreenApi;

pub struct WebHost {
    window: web_sys::Window,
    document: web_sys::Document,
    fullscreen: FullscreenApi,
    hooks: RefCell<BTreeMap<HookId, LiveViewHook>>,
}

/// Detaches its callback when dropped.
pub enum WebSubscription {
    Listener {
        target: web_sys::EventTarget,
        name: &'static str,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    },
    Command {
        hook: LiveViewHook,
        reference: JsValue,
        _callback: Closure<dyn FnMut(JsValue)>,
    },
    /// The owner had no LiveView hook object; nothing to detach.
    Detached,
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        match self {
            WebSubscription::Listener {
                target,
                name,
                callback,
            } => {
                if let Err(e) = target
                    .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
                {
                    warn!(event = *name, error = ?e, "failed to remove listener");
                }
            }
            WebSubscription::Command { hook, reference, .. } => {
                hook.remove_handle_event(reference);
            }
            WebSubscription::Detached => {}
        }
    }
}

impl WebHost {
    /// Returns `None` outside a window context (workers).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let fullscreen = FullscreenApi::detect(|name| {
            js_sys::Reflect::has(&document, &JsValue::from_str(name)).unwrap_or(false)
        });
        debug!(request = fullscreen.request, "fullscreen api detected");
        Some(Self {
            window,
            document,
            fullscreen,
            hooks: RefCell::new(BTreeMap::new()),
        })
    }

    /// Associate a LiveView hook object with an instance before it mounts.
    pub fn bind_hook(&self, id: HookId, hook: LiveViewHook) {
        self.hooks.borrow_mut().insert(id, hook);
    }

    pub fn unbind_hook(&self, id: HookId) -> Option<LiveViewHook> {
        self.hooks.borrow_mut().remove(&id)
    }

    pub fn hook(&self, id: HookId) -> Option<LiveViewHook> {
        self.hooks.borrow().get(&id).cloned()
    }

    /// The Fullscreen API variant this document exposes.
    pub fn fullscreen_api(&self) -> FullscreenApi {
        self.fullscreen
    }

    fn document_property(&self, name: &str) -> JsValue {
        js_sys::Reflect::get(&self.document, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
    }

    /// Call the method `name` on `receiver` and return what it returned.
    fn call_method(receiver: &JsValue, name: &'static str) -> Result<JsValue, BridgeError> {
        let method = js_sys::Reflect::get(receiver, &JsValue::from_str(name))
            .ok()
            .and_then(|m| m.dyn_into::<js_sys::Function>().ok())
            .ok_or_else(|| BridgeError::Host(format!("{name} is not available")))?;
        method
            .call0(receiver)
            .map_err(|e| BridgeError::Host(format!("{name} failed: {e:?}")))
    }

    fn event_target(&self, source: EventSource) -> web_sys::EventTarget {
        match source {
            EventSource::Window => self.window.clone().into(),
            EventSource::Document => self.document.clone().into(),
        }
    }

    fn dimension(value: Result<JsValue, JsValue>) -> f64 {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    }
}

impl Host for WebHost {
    type Node = web_sys::Element;
    type Subscription = WebSubscription;

    fn query_selector(&self, root: &web_sys::Element, selector: &str) -> Option<web_sys::Element> {
        match root.query_selector(selector) {
            Ok(found) => found,
            Err(e) => {
                warn!(selector, error = ?e, "invalid selector");
                None
            }
        }
    }

    fn attribute(&self, node: &web_sys::Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &web_sys::Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            warn!(name, error = ?e, "failed to set attribute");
        }
    }

    fn viewport(&self) -> ViewportState {
        ViewportState::new(
            Self::dimension(self.window.inner_width()),
            Self::dimension(self.window.inner_height()),
        )
    }

    fn scroll_to(&self, target: ScrollTarget) {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(target.top);
        options.set_left(target.left);
        options.set_behavior(match target.behavior {
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn fullscreen_enabled(&self) -> bool {
        self.document_property(self.fullscreen.enabled)
            .as_bool()
            .unwrap_or(false)
    }

    fn is_fullscreen(&self) -> bool {
        let element = self.document_property(self.fullscreen.element);
        !element.is_null() && !element.is_undefined()
    }

    fn request_fullscreen(&self, target: &web_sys::Element) -> Result<(), BridgeError> {
        let returned = Self::call_method(target, self.fullscreen.request)?;
        log_rejection(self.fullscreen.request, returned);
        Ok(())
    }

    fn exit_fullscreen(&self) {
        match Self::call_method(&self.document, self.fullscreen.exit) {
            Ok(returned) => log_rejection(self.fullscreen.exit, returned),
            Err(e) => warn!(error = %e, "fullscreen exit failed"),
        }
    }

    fn listen(&self, owner: HookId, event: BrowserEvent) -> WebSubscription {
        let target = self.event_target(event.source());
        let name = self.fullscreen.event_name(event);
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
            runtime::dispatch_browser_event(owner, event);
        });
        if let Err(e) =
            target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
        {
            warn!(hook = %owner, event = name, error = ?e, "failed to add listener");
            return WebSubscription::Detached;
        }
        debug!(hook = %owner, event = name, "listener attached");
        WebSubscription::Listener {
            target,
            name,
            callback,
        }
    }

    fn on_command(&self, owner: HookId, command: ServerCommand) -> WebSubscription {
        let Some(hook) = self.hook(owner) else {
            warn!(hook = %owner, command = command.wire_name(), "no LiveView hook bound");
            return WebSubscription::Detached;
        };
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |_payload: JsValue| {
            runtime::deliver_command(owner, command);
        });
        let reference = hook.handle_event(command.wire_name(), callback.as_ref().unchecked_ref());
        WebSubscription::Command {
            hook,
            reference,
            _callback: callback,
        }
    }
}

/// Log a late rejection of a fullscreen call that returned a Promise.
/// Older prefixed implementations return nothing and are left alone.
fn log_rejection(call: &'static str, returned: JsValue) {
    let Ok(promise) = returned.dyn_into::<js_sys::Promise>() else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
            warn!(call, error = ?e, "fullscreen call rejected");
        }
    });
}
