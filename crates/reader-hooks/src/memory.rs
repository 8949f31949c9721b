//! In-memory [`Host`]: a small element tree, a window and a fullscreen
//! capability, with every effect recorded for inspection.
//!
//! Used by the unit tests and by the replay CLI. Nothing here is delivered
//! automatically: fullscreen changes are queued as pending events and the
//! driver decides when to fire them, like a browser event loop would.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::{Rc, Weak};

use reader_common::{
    BridgeError, BrowserEvent, HookId, ScrollTarget, ServerCommand, ViewportState,
};
use serde::Serialize;

use crate::host::Host;

/// Index of an element in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// What a subscription is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Binding {
    Listener(BrowserEvent),
    Command(ServerCommand),
}

/// Side effects performed through the host, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum MemoryEffect {
    AttributeSet {
        node: NodeId,
        name: String,
        value: String,
    },
    FullscreenRequested {
        node: NodeId,
    },
    FullscreenExited,
    ScrolledTo {
        target: ScrollTarget,
    },
}

#[derive(Debug)]
struct MemoryNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct MemoryState {
    nodes: Vec<MemoryNode>,
    viewport: ViewportState,
    fullscreen_supported: bool,
    fullscreen_element: Option<NodeId>,
    bindings: BTreeMap<u64, (HookId, Binding)>,
    next_binding: u64,
    released: Vec<(HookId, Binding)>,
    effects: Vec<MemoryEffect>,
    pending: VecDeque<BrowserEvent>,
}

/// Cheap to clone; clones share the same page.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    inner: Rc<RefCell<MemoryState>>,
}

/// Guard returned by [`MemoryHost::listen`] and [`MemoryHost::on_command`].
#[derive(Debug)]
pub struct MemorySubscription {
    state: Weak<RefCell<MemoryState>>,
    key: u64,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        let Some(state) = self.state.upgrade() else {
            return;
        };
        let Ok(mut state) = state.try_borrow_mut() else {
            return;
        };
        if let Some(binding) = state.bindings.remove(&self.key) {
            state.released.push(binding);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selector {
    Tag(String),
    Id(String),
    Class(String),
    Attribute(String),
}

impl Selector {
    fn parse(selector: &str) -> Self {
        let selector = selector.trim();
        if let Some(attr) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Selector::Attribute(attr.trim().to_string())
        } else if let Some(id) = selector.strip_prefix('#') {
            Selector::Id(id.to_string())
        } else if let Some(class) = selector.strip_prefix('.') {
            Selector::Class(class.to_string())
        } else {
            Selector::Tag(selector.to_ascii_lowercase())
        }
    }

    fn matches(&self, node: &MemoryNode) -> bool {
        match self {
            Selector::Tag(tag) => node.tag == *tag,
            Selector::Id(id) => node.attributes.get("id") == Some(id),
            Selector::Class(class) => node
                .attributes
                .get("class")
                .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
            Selector::Attribute(name) => node.attributes.contains_key(name),
        }
    }
}

impl MemoryHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryState {
                nodes: Vec::new(),
                viewport: ViewportState::new(width, height),
                fullscreen_supported: true,
                fullscreen_element: None,
                bindings: BTreeMap::new(),
                next_binding: 0,
                released: Vec::new(),
                effects: Vec::new(),
                pending: VecDeque::new(),
            })),
        }
    }

    // -- Page construction --

    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut state = self.inner.borrow_mut();
        state.nodes.push(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        });
        NodeId(state.nodes.len() - 1)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
    }

    /// Set an attribute without recording an effect, the way the server
    /// patches the page.
    pub fn patch_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.get_mut(node.0) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        let mut state = self.inner.borrow_mut();
        if let Some(node) = state.nodes.get_mut(node.0) {
            node.attributes.remove(name);
        }
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(node.0)
            .and_then(|n| n.attributes.get(name).cloned())
    }

    // -- Window --

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.inner.borrow_mut().viewport = ViewportState::new(width, height);
    }

    pub fn set_fullscreen_supported(&self, supported: bool) {
        self.inner.borrow_mut().fullscreen_supported = supported;
    }

    pub fn fullscreen_element(&self) -> Option<NodeId> {
        self.inner.borrow().fullscreen_element
    }

    /// Change fullscreen state from outside the hooks (user pressed Esc).
    pub fn set_fullscreen_element(&self, node: Option<NodeId>) {
        let mut state = self.inner.borrow_mut();
        state.fullscreen_element = node;
        state.pending.push_back(BrowserEvent::FullscreenChange);
    }

    // -- Inspection --

    pub fn effects(&self) -> Vec<MemoryEffect> {
        self.inner.borrow().effects.clone()
    }

    pub fn take_effects(&self) -> Vec<MemoryEffect> {
        std::mem::take(&mut self.inner.borrow_mut().effects)
    }

    pub fn fullscreen_requests(&self) -> Vec<NodeId> {
        self.inner
            .borrow()
            .effects
            .iter()
            .filter_map(|e| match e {
                MemoryEffect::FullscreenRequested { node } => Some(*node),
                _ => None,
            })
            .collect()
    }

    pub fn fullscreen_exits(&self) -> usize {
        self.inner
            .borrow()
            .effects
            .iter()
            .filter(|e| matches!(e, MemoryEffect::FullscreenExited))
            .count()
    }

    pub fn scrolls(&self) -> Vec<ScrollTarget> {
        self.inner
            .borrow()
            .effects
            .iter()
            .filter_map(|e| match e {
                MemoryEffect::ScrolledTo { target } => Some(*target),
                _ => None,
            })
            .collect()
    }

    /// Hooks with a live binding, in registration order.
    pub fn bound_hooks(&self, binding: Binding) -> Vec<HookId> {
        self.inner
            .borrow()
            .bindings
            .values()
            .filter(|(_, b)| *b == binding)
            .map(|(owner, _)| *owner)
            .collect()
    }

    pub fn listener_count(&self, event: BrowserEvent) -> usize {
        self.bound_hooks(Binding::Listener(event)).len()
    }

    pub fn active_bindings(&self) -> usize {
        self.inner.borrow().bindings.len()
    }

    /// Bindings released so far, in release order.
    pub fn released_bindings(&self) -> Vec<(HookId, Binding)> {
        self.inner.borrow().released.clone()
    }

    /// Browser events queued by the page and not yet delivered.
    pub fn take_pending_events(&self) -> Vec<BrowserEvent> {
        self.inner.borrow_mut().pending.drain(..).collect()
    }

    fn bind(&self, owner: HookId, binding: Binding) -> MemorySubscription {
        let mut state = self.inner.borrow_mut();
        let key = state.next_binding;
        state.next_binding += 1;
        state.bindings.insert(key, (owner, binding));
        MemorySubscription {
            state: Rc::downgrade(&self.inner),
            key,
        }
    }

    fn find_descendant(state: &MemoryState, root: NodeId, selector: &Selector) -> Option<NodeId> {
        let node = state.nodes.get(root.0)?;
        for child in &node.children {
            if state.nodes.get(child.0).is_some_and(|n| selector.matches(n)) {
                return Some(*child);
            }
            if let Some(found) = Self::find_descendant(state, *child, selector) {
                return Some(found);
            }
        }
        None
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

impl Host for MemoryHost {
    type Node = NodeId;
    type Subscription = MemorySubscription;

    fn query_selector(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        let state = self.inner.borrow();
        Self::find_descendant(&state, *root, &Selector::parse(selector))
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.get_attribute(*node, name)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.patch_attribute(*node, name, value);
        self.inner
            .borrow_mut()
            .effects
            .push(MemoryEffect::AttributeSet {
                node: *node,
                name: name.to_string(),
                value: value.to_string(),
            });
    }

    fn viewport(&self) -> ViewportState {
        self.inner.borrow().viewport
    }

    fn scroll_to(&self, target: ScrollTarget) {
        self.inner
            .borrow_mut()
            .effects
            .push(MemoryEffect::ScrolledTo { target });
    }

    fn fullscreen_enabled(&self) -> bool {
        self.inner.borrow().fullscreen_supported
    }

    fn is_fullscreen(&self) -> bool {
        self.inner.borrow().fullscreen_element.is_some()
    }

    fn request_fullscreen(&self, target: &NodeId) -> Result<(), BridgeError> {
        let mut state = self.inner.borrow_mut();
        if !state.fullscreen_supported {
            return Err(BridgeError::Host("fullscreen is not supported".into()));
        }
        state
            .effects
            .push(MemoryEffect::FullscreenRequested { node: *target });
        state.fullscreen_element = Some(*target);
        state.pending.push_back(BrowserEvent::FullscreenChange);
        Ok(())
    }

    fn exit_fullscreen(&self) {
        let mut state = self.inner.borrow_mut();
        state.effects.push(MemoryEffect::FullscreenExited);
        if state.fullscreen_element.take().is_some() {
            state.pending.push_back(BrowserEvent::FullscreenChange);
        }
    }

    fn listen(&self, owner: HookId, event: BrowserEvent) -> MemorySubscription {
        self.bind(owner, Binding::Listener(event))
    }

    fn on_command(&self, owner: HookId, command: ServerCommand) -> MemorySubscription {
        self.bind(owner, Binding::Command(command))
    }
}
