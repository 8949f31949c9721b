//! Scripted page sessions against [`MemoryHost`].
//!
//! A script is JSON lines, one step per line:
//!
//! ```text
//! {"step":"viewport","width":800,"height":1200}
//! {"step":"mount","hook":"ResponsiveImageHook","attributes":{"data-base-url":"/api/comics/5/page/3"}}
//! {"step":"command","name":"scroll-to-top"}
//! {"step":"destroy","hook":1}
//! ```
//!
//! Hook IDs are assigned from 1 in mount order. Every step produces
//! transcript entries: what the page did and what was pushed to the server.

use std::collections::BTreeMap;

use reader_common::{BridgeError, BrowserEvent, HookId, HookKind, ServerCommand};
use reader_config::BridgeConfig;
use reader_hooks::{channel, Binding, Envelope, Host, HookRegistry, Inbox, MemoryEffect, MemoryHost, NodeId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One line of a replay script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Set the window size without firing events.
    Viewport { width: f64, height: f64 },
    Mount {
        hook: HookKind,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
        /// Add a descendant carrying the fullscreen-target marker.
        #[serde(default)]
        fullscreen_target: bool,
    },
    /// Patch attributes on the hook's element, then run its update.
    Update {
        hook: HookId,
        #[serde(default)]
        attributes: BTreeMap<String, String>,
    },
    /// A server push. Without `hook` it goes to every subscribed instance.
    Command {
        name: String,
        #[serde(default)]
        hook: Option<HookId>,
    },
    Resize { width: f64, height: f64 },
    Orientation { width: f64, height: f64 },
    /// The user enters or leaves fullscreen outside the hooks (F11, Esc).
    NativeFullscreen { active: bool },
    FullscreenUnavailable,
    Destroy { hook: HookId },
}

/// What a step did, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Entry {
    Mounted {
        line: usize,
        hook: HookId,
        kind: HookKind,
    },
    Delivered {
        line: usize,
        command: ServerCommand,
        handlers: usize,
    },
    Destroyed {
        line: usize,
        hook: HookId,
        removed: bool,
    },
    Effect {
        line: usize,
        effect: MemoryEffect,
    },
    Push {
        line: usize,
        envelope: Envelope,
    },
}

#[derive(Debug, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ReplayError {
    pub line: usize,
    #[source]
    pub source: BridgeError,
}

pub struct Replay {
    host: MemoryHost,
    registry: HookRegistry<MemoryHost>,
    inbox: Inbox,
    elements: BTreeMap<HookId, NodeId>,
    body: NodeId,
}

impl Replay {
    pub fn new(config: BridgeConfig) -> Self {
        let host = MemoryHost::default();
        let body = host.create_element("body");
        let (outbox, inbox) = channel::channel();
        Self {
            registry: HookRegistry::new(host.clone(), config, outbox),
            host,
            inbox,
            elements: BTreeMap::new(),
            body,
        }
    }

    /// Run a whole script. Stops at the first failing line.
    pub fn run_script(&mut self, script: &str) -> Result<Vec<Entry>, ReplayError> {
        let mut entries = Vec::new();
        for (index, text) in script.lines().enumerate() {
            let line = index + 1;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let step: Step = serde_json::from_str(text).map_err(|e| ReplayError {
                line,
                source: e.into(),
            })?;
            let produced = self
                .apply(line, step)
                .map_err(|source| ReplayError { line, source })?;
            entries.extend(produced);
        }
        info!(steps = script.lines().count(), entries = entries.len(), "replay finished");
        Ok(entries)
    }

    pub fn apply(&mut self, line: usize, step: Step) -> Result<Vec<Entry>, BridgeError> {
        debug!(line, ?step, "replay step");
        let mut entries = Vec::new();

        match step {
            Step::Viewport { width, height } => self.host.set_viewport(width, height),
            Step::Mount {
                hook,
                attributes,
                fullscreen_target,
            } => {
                let element = self.build_element(&attributes, fullscreen_target);
                let id = self.registry.mount(hook, element);
                self.elements.insert(id, element);
                entries.push(Entry::Mounted {
                    line,
                    hook: id,
                    kind: hook,
                });
            }
            Step::Update { hook, attributes } => {
                let element = *self
                    .elements
                    .get(&hook)
                    .ok_or_else(|| BridgeError::HookNotFound(hook.to_string()))?;
                for (name, value) in &attributes {
                    self.host.patch_attribute(element, name, value);
                }
                self.registry.update(hook)?;
            }
            Step::Command { name, hook } => {
                let command = ServerCommand::from_wire(&name)?;
                let handlers = match hook {
                    Some(id) => usize::from(self.registry.deliver_command(id, command)),
                    None => self.registry.broadcast_command(command),
                };
                entries.push(Entry::Delivered {
                    line,
                    command,
                    handlers,
                });
            }
            Step::Resize { width, height } => {
                self.host.set_viewport(width, height);
                self.registry.broadcast_browser_event(BrowserEvent::Resize);
            }
            Step::Orientation { width, height } => {
                self.host.set_viewport(width, height);
                self.registry
                    .broadcast_browser_event(BrowserEvent::OrientationChange);
            }
            Step::NativeFullscreen { active } => {
                if active != self.host.is_fullscreen() {
                    self.host
                        .set_fullscreen_element(active.then_some(self.body));
                }
            }
            Step::FullscreenUnavailable => self.host.set_fullscreen_supported(false),
            Step::Destroy { hook } => {
                let removed = self.registry.destroy(hook);
                self.elements.remove(&hook);
                entries.push(Entry::Destroyed {
                    line,
                    hook,
                    removed,
                });
            }
        }

        self.pump();
        entries.extend(
            self.host
                .take_effects()
                .into_iter()
                .map(|effect| Entry::Effect { line, effect }),
        );
        entries.extend(
            self.inbox
                .drain()
                .into_iter()
                .map(|envelope| Entry::Push { line, envelope }),
        );
        Ok(entries)
    }

    /// Deliver queued native events to the hooks still listening for them.
    fn pump(&mut self) {
        loop {
            let pending = self.host.take_pending_events();
            if pending.is_empty() {
                break;
            }
            for event in pending {
                for owner in self.host.bound_hooks(Binding::Listener(event)) {
                    self.registry.dispatch_browser_event(owner, event);
                }
            }
        }
    }

    fn build_element(
        &self,
        attributes: &BTreeMap<String, String>,
        fullscreen_target: bool,
    ) -> NodeId {
        let root = self.host.create_element("div");
        self.host.append_child(self.body, root);
        if fullscreen_target {
            let target = self.host.create_element("section");
            self.host
                .patch_attribute(target, "data-fullscreen-target", "");
            self.host.append_child(root, target);
        }
        let img = self.host.create_element("img");
        self.host.append_child(root, img);
        for (name, value) in attributes {
            self.host.patch_attribute(root, name, value);
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_common::ClientEvent;

    fn run(script: &str) -> Vec<Entry> {
        Replay::new(BridgeConfig::default()).run_script(script).unwrap()
    }

    fn attribute_values(entries: &[Entry], attr: &str) -> Vec<String> {
        entries
            .iter()
            .filter_map(|e| match e {
                Entry::Effect {
                    effect: MemoryEffect::AttributeSet { name, value, .. },
                    ..
                } if name == attr => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    fn pushes(entries: &[Entry]) -> Vec<ClientEvent> {
        entries
            .iter()
            .filter_map(|e| match e {
                Entry::Push { envelope, .. } => Some(envelope.event.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn portrait_page_then_rotation() {
        let entries = run(concat!(
            r#"{"step":"viewport","width":800,"height":1200}"#, "\n",
            r#"{"step":"mount","hook":"ResponsiveImageHook","attributes":{"data-base-url":"/api/comics/5/page/3"}}"#, "\n",
            r#"{"step":"orientation","width":1200,"height":800}"#, "\n",
        ));

        assert_eq!(
            attribute_values(&entries, "src"),
            vec!["/api/comics/5/page/3?height=1200", "/api/comics/5/page/3"]
        );
        assert_eq!(
            attribute_values(&entries, "class"),
            vec![
                "portrait-image block",
                "landscape-image w-full h-auto object-contain"
            ]
        );
    }

    #[test]
    fn update_navigates_to_next_page() {
        let entries = run(concat!(
            r#"{"step":"mount","hook":"ResponsiveImageHook","attributes":{"data-comic-id":"5","data-current-page":"3"}}"#, "\n",
            "\n",
            r#"{"step":"update","hook":1,"attributes":{"data-current-page":"4"}}"#, "\n",
        ));
        assert_eq!(
            attribute_values(&entries, "src"),
            vec!["/api/comics/5/page/3", "/api/comics/5/page/4"]
        );
    }

    #[test]
    fn toggle_reports_fullscreen_to_server() {
        let entries = run(concat!(
            r#"{"step":"mount","hook":"FullscreenHook","fullscreen_target":true}"#, "\n",
            r#"{"step":"command","name":"toggle_fullscreen"}"#, "\n",
            r#"{"step":"command","name":"toggle_fullscreen","hook":1}"#, "\n",
        ));
        assert_eq!(
            pushes(&entries),
            vec![
                ClientEvent::FullscreenChanged { is_fullscreen: true },
                ClientEvent::FullscreenChanged { is_fullscreen: false },
            ]
        );
        assert!(entries.contains(&Entry::Effect {
            line: 2,
            effect: MemoryEffect::FullscreenRequested { node: NodeId(2) },
        }));
    }

    #[test]
    fn native_exit_is_reported() {
        let entries = run(concat!(
            r#"{"step":"mount","hook":"FullscreenHook"}"#, "\n",
            r#"{"step":"native_fullscreen","active":true}"#, "\n",
            r#"{"step":"native_fullscreen","active":true}"#, "\n",
            r#"{"step":"native_fullscreen","active":false}"#, "\n",
        ));
        assert_eq!(
            pushes(&entries),
            vec![
                ClientEvent::FullscreenChanged { is_fullscreen: true },
                ClientEvent::FullscreenChanged { is_fullscreen: false },
            ]
        );
    }

    #[test]
    fn destroyed_bridge_stays_silent() {
        let entries = run(concat!(
            r#"{"step":"mount","hook":"FullscreenHook"}"#, "\n",
            r#"{"step":"destroy","hook":1}"#, "\n",
            r#"{"step":"native_fullscreen","active":true}"#, "\n",
            r#"{"step":"destroy","hook":1}"#, "\n",
        ));
        assert!(pushes(&entries).is_empty());
        assert!(entries.contains(&Entry::Destroyed {
            line: 4,
            hook: HookId(1),
            removed: false,
        }));
    }

    #[test]
    fn unavailable_fullscreen_ignores_commands() {
        let entries = run(concat!(
            r#"{"step":"fullscreen_unavailable"}"#, "\n",
            r#"{"step":"mount","hook":"FullscreenHook"}"#, "\n",
            r#"{"step":"command","name":"enter_fullscreen"}"#, "\n",
        ));
        assert!(entries.contains(&Entry::Delivered {
            line: 3,
            command: ServerCommand::EnterFullscreen,
            handlers: 0,
        }));
        assert!(pushes(&entries).is_empty());
    }

    #[test]
    fn scroll_command_scrolls_once() {
        let entries = run(concat!(
            r#"{"step":"mount","hook":"ScrollToTop"}"#, "\n",
            r#"{"step":"command","name":"scroll-to-top"}"#, "\n",
        ));
        let scrolls = entries
            .iter()
            .filter(|e| matches!(e, Entry::Effect { effect: MemoryEffect::ScrolledTo { .. }, .. }))
            .count();
        assert_eq!(scrolls, 1);
    }

    #[test]
    fn unknown_command_fails_with_line() {
        let err = Replay::new(BridgeConfig::default())
            .run_script(concat!(
                r#"{"step":"mount","hook":"ScrollToTop"}"#, "\n",
                r#"{"step":"command","name":"scroll_to_top"}"#, "\n",
            ))
            .unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.source, BridgeError::UnknownCommand(ref n) if n == "scroll_to_top"));
    }

    #[test]
    fn update_of_unknown_hook_fails() {
        let err = Replay::new(BridgeConfig::default())
            .run_script(r#"{"step":"update","hook":9}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "line 1: hook not found: hook-9");
    }

    #[test]
    fn malformed_line_is_a_json_error() {
        let err = Replay::new(BridgeConfig::default())
            .run_script("{\"step\":\"teleport\"}")
            .unwrap_err();
        assert!(matches!(err.source, BridgeError::Json(_)));
    }

    #[test]
    fn entries_serialize_as_tagged_lines() {
        let entry = Entry::Mounted {
            line: 1,
            hook: HookId(1),
            kind: HookKind::ScrollToTop,
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({"type": "mounted", "line": 1, "hook": 1, "kind": "ScrollToTop"})
        );
    }
}
