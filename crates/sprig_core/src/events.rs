//! Named-event channel
//!
//! An ordered publish/subscribe registry, independent of state keys.
//! `fire` dispatches against a snapshot of the handler list taken before
//! the first invocation: handlers added or cancelled during an in-flight
//! dispatch do not affect that dispatch, only subsequent ones.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::component::Component;
use crate::host::Host;
use crate::state::Value;

new_key_type! {
    /// Identity of one event handler registration
    pub struct HandlerKey;
}

/// Named-event handler: `(component, payload)`
pub type EventFn<H> = dyn Fn(&Component<H>, &Value);

struct Registration<H: Host> {
    name: String,
    handler: Rc<EventFn<H>>,
}

/// Event name -> ordered handler list
pub(crate) struct EventRegistry<H: Host> {
    entries: SlotMap<HandlerKey, Registration<H>>,
    by_name: FxHashMap<String, SmallVec<[HandlerKey; 2]>>,
}

impl<H: Host> EventRegistry<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_name: FxHashMap::default(),
        }
    }

    pub(crate) fn insert(&mut self, name: &str, handler: Rc<EventFn<H>>) -> HandlerKey {
        let id = self.entries.insert(Registration {
            name: name.to_string(),
            handler,
        });
        self.by_name.entry(name.to_string()).or_default().push(id);
        id
    }

    /// Remove exactly one registration; stale ids are a no-op
    pub(crate) fn remove(&mut self, id: HandlerKey) {
        if let Some(registration) = self.entries.remove(id) {
            if let Some(order) = self.by_name.get_mut(&registration.name) {
                order.retain(|entry| *entry != id);
                if order.is_empty() {
                    self.by_name.remove(&registration.name);
                }
            }
        }
    }

    /// Snapshot `name`'s handlers in registration order; empty for unknown
    /// names
    pub(crate) fn handlers_for(&self, name: &str) -> SmallVec<[Rc<EventFn<H>>; 2]> {
        match self.by_name.get(name) {
            Some(order) => order
                .iter()
                .filter_map(|id| {
                    self.entries
                        .get(*id)
                        .map(|registration| Rc::clone(&registration.handler))
                })
                .collect(),
            None => SmallVec::new(),
        }
    }
}
