//! Stage event system
//!
//! Outward-facing notifications for the embedding UI: pick changes, drag
//! grab/drop and context refreshes. Handlers register per event kind and
//! return `true` to consume an event, stopping further forwarding.

use std::collections::HashMap;

/// Kind of stage event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageEventKind {
    /// Pick state changed (`mesh` is `None` on unpick)
    Picked,
    /// A drag gesture started on a node
    Grabbed,
    /// A node was placed (drag end or drag-and-drop)
    Dropped,
    /// The scene context was refreshed
    Updated,
}

/// A stage event with its subject node name, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent {
    /// Event kind
    pub kind: StageEventKind,
    /// Name of the node the event concerns
    pub mesh: Option<String>,
}

impl StageEvent {
    /// Create an event with a subject node
    pub fn with_mesh(kind: StageEventKind, mesh: impl Into<String>) -> Self {
        Self {
            kind,
            mesh: Some(mesh.into()),
        }
    }

    /// Create an event without a subject node
    pub fn bare(kind: StageEventKind) -> Self {
        Self { kind, mesh: None }
    }

    /// Interaction state string for UI consumers
    pub fn state(&self) -> Option<&'static str> {
        match self.kind {
            StageEventKind::Picked => self.mesh.is_some().then_some("picked"),
            StageEventKind::Grabbed => Some("dragging"),
            StageEventKind::Dropped => Some("dropped"),
            StageEventKind::Updated => None,
        }
    }
}

/// Event handler; returns `true` if the event was consumed
pub trait EventHandler {
    /// Handle an event, return true to stop forwarding
    fn on_event(&mut self, event: &StageEvent) -> bool;
}

impl<F: FnMut(&StageEvent) -> bool> EventHandler for F {
    fn on_event(&mut self, event: &StageEvent) -> bool {
        self(event)
    }
}

/// Registry and queue for stage events
///
/// Events queue as controllers emit them mid-pass and are dispatched by the
/// host at the end of the pass, so handlers always observe post-update state.
#[derive(Default)]
pub struct StageEvents {
    queue: Vec<StageEvent>,
    handlers: HashMap<StageEventKind, Vec<Box<dyn EventHandler>>>,
}

impl StageEvents {
    /// Create an empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event kind
    pub fn register(&mut self, kind: StageEventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event for dispatch at the end of the pass
    pub fn emit(&mut self, event: StageEvent) {
        log::debug!("event: {:?} ({:?})", event.kind, event.mesh);
        self.queue.push(event);
    }

    /// Number of queued, not-yet-dispatched events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Dispatch all queued events to their handlers
    ///
    /// Forwarding stops at the first handler that consumes the event.
    pub fn dispatch(&mut self) {
        let queued = std::mem::take(&mut self.queue);
        for event in queued {
            if let Some(handlers) = self.handlers.get_mut(&event.kind) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(&event) {
                        break;
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for StageEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageEvents")
            .field("queued", &self.queue)
            .field("handler_kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn dispatch_delivers_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();

        let mut events = StageEvents::new();
        events.register(
            StageEventKind::Picked,
            Box::new(move |event: &StageEvent| {
                sink.borrow_mut().push(event.mesh.clone());
                false
            }),
        );

        events.emit(StageEvent::with_mesh(StageEventKind::Picked, "box.001"));
        events.emit(StageEvent::bare(StageEventKind::Picked));
        events.dispatch();

        assert_eq!(*seen.borrow(), vec![Some("box.001".to_string()), None]);
        assert_eq!(events.pending(), 0);
    }

    #[test]
    fn consumed_events_stop_forwarding() {
        let count = Rc::new(RefCell::new(0));

        let mut events = StageEvents::new();
        events.register(StageEventKind::Updated, Box::new(|_: &StageEvent| true));
        let tail = count.clone();
        events.register(
            StageEventKind::Updated,
            Box::new(move |_: &StageEvent| {
                *tail.borrow_mut() += 1;
                false
            }),
        );

        events.emit(StageEvent::bare(StageEventKind::Updated));
        events.dispatch();
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn state_strings_match_event_kinds() {
        assert_eq!(
            StageEvent::with_mesh(StageEventKind::Grabbed, "a").state(),
            Some("dragging")
        );
        assert_eq!(StageEvent::bare(StageEventKind::Picked).state(), None);
        assert_eq!(StageEvent::bare(StageEventKind::Updated).state(), None);
    }
}
