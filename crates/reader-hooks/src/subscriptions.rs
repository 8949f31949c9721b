//! Per-instance registry of acquired subscriptions.
//!
//! Every listener and command handler a hook acquires while mounted is held
//! here as a host guard. `release_all` drops them exactly once; later calls
//! find nothing to release.

use reader_common::{BrowserEvent, ServerCommand};

pub struct Subscriptions<S> {
    listeners: Vec<(BrowserEvent, S)>,
    commands: Vec<(ServerCommand, S)>,
    released: bool,
}

impl<S> Subscriptions<S> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            commands: Vec::new(),
            released: false,
        }
    }

    pub fn listens_to(&self, event: BrowserEvent) -> bool {
        self.listeners.iter().any(|(e, _)| *e == event)
    }

    pub fn handles(&self, command: ServerCommand) -> bool {
        self.commands.iter().any(|(c, _)| *c == command)
    }

    /// Store a listener guard. A second guard for the same event is dropped
    /// immediately, keeping one listener per event.
    pub fn add_listener(&mut self, event: BrowserEvent, guard: S) -> bool {
        if self.released || self.listens_to(event) {
            return false;
        }
        self.listeners.push((event, guard));
        true
    }

    /// Store a command handler guard; duplicates are dropped like listeners.
    pub fn add_command(&mut self, command: ServerCommand, guard: S) -> bool {
        if self.released || self.handles(command) {
            return false;
        }
        self.commands.push((command, guard));
        true
    }

    /// Drop every guard. Returns how many were released.
    pub fn release_all(&mut self) -> usize {
        let count = self.listeners.len() + self.commands.len();
        self.listeners.clear();
        self.commands.clear();
        self.released = true;
        count
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn len(&self) -> usize {
        self.listeners.len() + self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S> Default for Subscriptions<S> {
    fn default() -> Self {
        Self::new()
    }
}
