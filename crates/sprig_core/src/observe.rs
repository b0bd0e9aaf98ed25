//! State observer registries
//!
//! The dispatcher keeps two of these per component, one per tier
//! (immediate, deferred). A registry maps a state key to an ordered list of
//! callbacks; each registration has a stable `slotmap` identity, which is
//! what the re-entrancy guard and cancellation handles refer to. Removing a
//! stale identity is a no-op, so cancelling twice is harmless.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::component::Component;
use crate::host::Host;
use crate::state::Value;

new_key_type! {
    /// Identity of one observer registration
    pub struct ObserverKey;
}

/// State-change callback: `(component, new_value, old_value)`
///
/// `old_value` is `None` for the registration-time init call and for keys
/// that had no previous value.
pub type ObserveFn<H> = dyn Fn(&Component<H>, &Value, Option<&Value>);

struct Registration<H: Host> {
    key: String,
    callback: Rc<ObserveFn<H>>,
}

/// Per-key ordered observer lists for one tier
pub(crate) struct ObserverRegistry<H: Host> {
    entries: SlotMap<ObserverKey, Registration<H>>,
    by_key: FxHashMap<String, SmallVec<[ObserverKey; 2]>>,
}

impl<H: Host> ObserverRegistry<H> {
    pub(crate) fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            by_key: FxHashMap::default(),
        }
    }

    /// Append a callback to `key`'s list, in registration order
    pub(crate) fn insert(&mut self, key: &str, callback: Rc<ObserveFn<H>>) -> ObserverKey {
        let id = self.entries.insert(Registration {
            key: key.to_string(),
            callback,
        });
        self.by_key.entry(key.to_string()).or_default().push(id);
        id
    }

    /// Remove exactly one registration; stale ids are a no-op
    pub(crate) fn remove(&mut self, id: ObserverKey) {
        if let Some(registration) = self.entries.remove(id) {
            if let Some(order) = self.by_key.get_mut(&registration.key) {
                order.retain(|entry| *entry != id);
                if order.is_empty() {
                    self.by_key.remove(&registration.key);
                }
            }
        }
    }

    pub(crate) fn contains(&self, id: ObserverKey) -> bool {
        self.entries.contains_key(id)
    }

    /// Snapshot `key`'s callbacks in registration order
    pub(crate) fn callbacks_for(
        &self,
        key: &str,
    ) -> SmallVec<[(ObserverKey, Rc<ObserveFn<H>>); 2]> {
        match self.by_key.get(key) {
            Some(order) => order
                .iter()
                .filter_map(|id| {
                    self.entries
                        .get(*id)
                        .map(|registration| (*id, Rc::clone(&registration.callback)))
                })
                .collect(),
            None => SmallVec::new(),
        }
    }
}
