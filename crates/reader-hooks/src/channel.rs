//! Typed outbound half of the event channel.
//!
//! Hooks push [`ClientEvent`]s into an [`Outbox`]; the side that owns the
//! real transport (the LiveView socket in the browser, stdout in the replay
//! CLI) drains the paired [`Inbox`]. The unbounded `tokio` channel is used
//! synchronously and needs no runtime.

use reader_common::{ClientEvent, HookId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

/// A server-bound event tagged with the hook instance that emitted it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub hook: HookId,
    #[serde(flatten)]
    pub event: ClientEvent,
}

#[derive(Debug, Clone)]
pub struct Outbox {
    sender: mpsc::UnboundedSender<Envelope>,
}

#[derive(Debug)]
pub struct Inbox {
    receiver: mpsc::UnboundedReceiver<Envelope>,
}

/// Create a connected outbox/inbox pair.
pub fn channel() -> (Outbox, Inbox) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (Outbox { sender }, Inbox { receiver })
}

impl Outbox {
    /// Queue an event for the server. Returns `false` if the inbox is gone.
    pub fn push(&self, hook: HookId, event: ClientEvent) -> bool {
        debug!(hook = %hook, event = event.name(), "event queued for server");
        match self.sender.send(Envelope { hook, event }) {
            Ok(()) => true,
            Err(_) => {
                debug!(hook = %hook, "event dropped: inbox closed");
                false
            }
        }
    }
}

impl Inbox {
    /// Take every queued event without waiting.
    pub fn drain(&mut self) -> Vec<Envelope> {
        let mut out = Vec::new();
        while let Ok(envelope) = self.receiver.try_recv() {
            out.push(envelope);
        }
        out
    }

    /// Wait for the next event. Resolves to `None` once every outbox is dropped.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(is_fullscreen: bool) -> ClientEvent {
        ClientEvent::FullscreenChanged { is_fullscreen }
    }

    #[test]
    fn drain_returns_events_in_order() {
        let (outbox, mut inbox) = channel();
        assert!(outbox.push(HookId(1), changed(true)));
        assert!(outbox.push(HookId(2), changed(false)));

        let events = inbox.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].hook, HookId(1));
        assert_eq!(events[0].event, changed(true));
        assert_eq!(events[1].hook, HookId(2));
        assert!(inbox.drain().is_empty());
    }

    #[test]
    fn push_after_inbox_dropped_reports_failure() {
        let (outbox, inbox) = channel();
        drop(inbox);
        assert!(!outbox.push(HookId(1), changed(true)));
    }

    #[tokio::test]
    async fn recv_waits_for_event() {
        let (outbox, mut inbox) = channel();
        let sender = outbox.clone();
        sender.push(HookId(7), changed(true));

        let envelope = inbox.recv().await.unwrap();
        assert_eq!(envelope.hook, HookId(7));

        drop(sender);
        drop(outbox);
        assert!(inbox.recv().await.is_none());
    }

    #[test]
    fn envelope_serializes_flat() {
        let envelope = Envelope {
            hook: HookId(3),
            event: changed(true),
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "hook": 3,
                "event": "fullscreen_changed",
                "payload": { "isFullscreen": true }
            })
        );
    }
}
