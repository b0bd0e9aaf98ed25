//! Component runtime
//!
//! One [`Component`] is one live widget: its state, its observer and event
//! registries, and its lifecycle binding. All operations run synchronously
//! on the caller's thread; interior borrows are never held across a user
//! callback, so callbacks are free to re-enter `set`, `fire`, `observe`,
//! `cancel`, and `teardown`.
//!
//! `set(partial)` executes a fixed sequence: merge into a fresh state map,
//! dispatch immediate observers, refresh the rendered output, dispatch
//! deferred observers. Immediate observers therefore always see the output
//! *before* the new values are applied, deferred observers always see it
//! *after*. That ordering is a hard contract.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use rustc_hash::FxHashSet;

use crate::error::{LifecycleError, Result};
use crate::events::EventRegistry;
use crate::fragment::Fragment;
use crate::host::Host;
use crate::observe::{ObserveFn, ObserverKey, ObserverRegistry};
use crate::state::{self, StateMap, Value};

/// Event fired to subscribers at the start of `teardown`, before the
/// rendered output is disposed
pub const TEARDOWN_EVENT: &str = "teardown";

/// Explicit lifecycle state, checked by every public operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    Active,
    TornDown,
}

/// Which observer tier a dispatch pass targets
#[derive(Clone, Copy)]
enum Tier {
    Immediate,
    Deferred,
}

/// Construction options for a component
///
/// `data` seeds initial state. If `target` is supplied the instance
/// self-mounts during construction, before `anchor` when that is also
/// given. `root` and `slot` are opaque pass-through metadata for a host
/// application; the runtime never interprets them.
pub struct ComponentOptions<H: Host> {
    pub data: StateMap,
    pub target: Option<H::Element>,
    pub anchor: Option<H::Element>,
    pub root: Option<Value>,
    pub slot: Option<Value>,
}

impl<H: Host> Default for ComponentOptions<H> {
    fn default() -> Self {
        Self {
            data: StateMap::new(),
            target: None,
            anchor: None,
            root: None,
            slot: None,
        }
    }
}

impl<H: Host> ComponentOptions<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed initial state
    pub fn data(mut self, data: StateMap) -> Self {
        self.data = data;
        self
    }

    /// Self-mount into `target` during construction
    pub fn target(mut self, target: H::Element) -> Self {
        self.target = Some(target);
        self
    }

    /// Mount immediately before `anchor` (only meaningful with `target`)
    pub fn anchor(mut self, anchor: H::Element) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn root(mut self, root: Value) -> Self {
        self.root = Some(root);
        self
    }

    pub fn slot(mut self, slot: Value) -> Self {
        self.slot = Some(slot);
        self
    }
}

/// Options for [`Component::observe`]
///
/// Defaults: the immediate tier, with one synchronous callback invocation
/// at registration time carrying the key's current value.
#[derive(Clone, Copy, Debug)]
pub struct ObserveOptions {
    /// Register in the deferred tier (runs after the render step) instead
    /// of the immediate tier
    pub defer: bool,
    /// Invoke the callback once at registration with the current value and
    /// no old value
    pub init: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            defer: false,
            init: true,
        }
    }
}

impl ObserveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(mut self, defer: bool) -> Self {
        self.defer = defer;
        self
    }

    pub fn init(mut self, init: bool) -> Self {
        self.init = init;
        self
    }
}

/// Cancellation handle for an observer or event handler registration
///
/// `cancel` removes exactly that registration; calling it twice, or after
/// the component is gone, is a no-op. Dropping the handle does not cancel.
pub struct Subscription {
    cancel: Box<dyn Fn()>,
}

impl Subscription {
    fn new(cancel: impl Fn() + 'static) -> Self {
        Self {
            cancel: Box::new(cancel),
        }
    }

    pub fn cancel(&self) {
        (self.cancel)()
    }
}

struct Inner<H: Host> {
    host: Rc<RefCell<H>>,
    /// Current state; replaced, never mutated in place
    state: RefCell<Rc<StateMap>>,
    immediate: RefCell<ObserverRegistry<H>>,
    deferred: RefCell<ObserverRegistry<H>>,
    events: RefCell<EventRegistry<H>>,
    fragment: RefCell<Option<Box<dyn Fragment<H>>>>,
    mounted: Cell<bool>,
    lifecycle: Cell<Lifecycle>,
    /// Identities of observers currently executing; the re-entrancy guard
    active: RefCell<FxHashSet<ObserverKey>>,
    root: Option<Value>,
    slot: Option<Value>,
}

/// One live component instance
///
/// Cheap to clone; clones share the same instance.
pub struct Component<H: Host> {
    inner: Rc<Inner<H>>,
}

impl<H: Host> Clone for Component<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Non-owning handle to a component, for listener closures built into the
/// fragment (the fragment is owned by the component; a strong handle would
/// leak the instance)
pub struct WeakComponent<H: Host> {
    inner: Weak<Inner<H>>,
}

impl<H: Host> Clone for WeakComponent<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<H: Host> WeakComponent<H> {
    pub fn upgrade(&self) -> Option<Component<H>> {
        self.inner.upgrade().map(|inner| Component { inner })
    }
}

impl<H: Host> Component<H> {
    /// Construct a component
    ///
    /// `build` produces the lifecycle binding exactly once, against the
    /// initial state; it receives a weak handle to the owning instance for
    /// wiring native listeners back into the named-event channel. If
    /// `options.target` is set the instance self-mounts before returning.
    pub fn new<F>(host: Rc<RefCell<H>>, options: ComponentOptions<H>, build: F) -> Result<Self>
    where
        F: FnOnce(&mut H, &StateMap, &WeakComponent<H>) -> Box<dyn Fragment<H>>,
    {
        let ComponentOptions {
            data,
            target,
            anchor,
            root,
            slot,
        } = options;

        let component = Component {
            inner: Rc::new(Inner {
                host,
                state: RefCell::new(Rc::new(data)),
                immediate: RefCell::new(ObserverRegistry::new()),
                deferred: RefCell::new(ObserverRegistry::new()),
                events: RefCell::new(EventRegistry::new()),
                fragment: RefCell::new(None),
                mounted: Cell::new(false),
                lifecycle: Cell::new(Lifecycle::Active),
                active: RefCell::new(FxHashSet::default()),
                root,
                slot,
            }),
        };

        let fragment = {
            let state = component.inner.state.borrow().clone();
            let weak = component.downgrade();
            let mut host = component.inner.host.borrow_mut();
            build(&mut host, &state, &weak)
        };
        *component.inner.fragment.borrow_mut() = Some(fragment);

        if let Some(target) = target {
            component.mount(&target, anchor.as_ref())?;
        }
        Ok(component)
    }

    pub fn downgrade(&self) -> WeakComponent<H> {
        WeakComponent {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// The shared host this component renders into
    pub fn host(&self) -> Rc<RefCell<H>> {
        Rc::clone(&self.inner.host)
    }

    /// Current value of `key`
    ///
    /// Valid after teardown: reads return the last-known state.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.state.borrow().get(key).cloned()
    }

    /// The entire current state mapping
    pub fn state(&self) -> Rc<StateMap> {
        self.inner.state.borrow().clone()
    }

    /// Caller-supplied `root` metadata, passed through uninterpreted
    pub fn root(&self) -> Option<&Value> {
        self.inner.root.as_ref()
    }

    /// Caller-supplied slot metadata, passed through uninterpreted
    pub fn slot(&self) -> Option<&Value> {
        self.inner.slot.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn is_torn_down(&self) -> bool {
        self.inner.lifecycle.get() == Lifecycle::TornDown
    }

    /// Merge `partial` into a new state map and run the dispatch sequence:
    /// immediate observers, render step, deferred observers
    pub fn set(&self, partial: StateMap) -> Result<()> {
        self.ensure_active("set")?;

        let old = self.inner.state.borrow().clone();
        let new = Rc::new(state::merge(&old, &partial));
        *self.inner.state.borrow_mut() = Rc::clone(&new);
        tracing::trace!(keys = partial.len(), "state updated");

        self.dispatch(Tier::Immediate, &partial, &old);

        // Render step. Reads the live state rather than this call's
        // snapshot: an immediate observer may have re-entered set() and
        // advanced it further.
        {
            let mut fragment = self.inner.fragment.borrow_mut();
            if let Some(fragment) = fragment.as_mut() {
                let current = self.inner.state.borrow().clone();
                let mut host = self.inner.host.borrow_mut();
                fragment.update(&mut host, &partial, &current);
            }
        }

        self.dispatch(Tier::Deferred, &partial, &old);
        Ok(())
    }

    /// Register a state-change callback for `key`
    ///
    /// See [`ObserveOptions`] for tier selection and the registration-time
    /// init call.
    pub fn observe<F>(&self, key: &str, callback: F, options: ObserveOptions) -> Result<Subscription>
    where
        F: Fn(&Component<H>, &Value, Option<&Value>) + 'static,
    {
        self.ensure_active("observe")?;

        let callback: Rc<ObserveFn<H>> = Rc::new(callback);
        let id = self
            .registry(options.defer)
            .borrow_mut()
            .insert(key, Rc::clone(&callback));

        if options.init {
            let current = self
                .inner
                .state
                .borrow()
                .get(key)
                .cloned()
                .unwrap_or(Value::Null);
            self.inner.active.borrow_mut().insert(id);
            callback(self, &current, None);
            self.inner.active.borrow_mut().remove(&id);
        }

        let weak = Rc::downgrade(&self.inner);
        let defer = options.defer;
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                let registry = if defer {
                    &inner.deferred
                } else {
                    &inner.immediate
                };
                registry.borrow_mut().remove(id);
            }
        }))
    }

    /// Subscribe to a named event
    pub fn on<F>(&self, name: &str, handler: F) -> Result<Subscription>
    where
        F: Fn(&Component<H>, &Value) + 'static,
    {
        self.ensure_active("on")?;

        let id = self.inner.events.borrow_mut().insert(name, Rc::new(handler));
        let weak = Rc::downgrade(&self.inner);
        Ok(Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.events.borrow_mut().remove(id);
            }
        }))
    }

    /// Publish a named event to its subscribers, in registration order
    ///
    /// Dispatches against a snapshot of the handler list: handlers added or
    /// cancelled during this call do not affect it. An unknown name is a
    /// no-op.
    pub fn fire(&self, name: &str, payload: Value) -> Result<()> {
        self.ensure_active("fire")?;

        let handlers = self.inner.events.borrow().handlers_for(name);
        if handlers.is_empty() {
            return Ok(());
        }
        tracing::trace!(event = name, handlers = handlers.len(), "firing event");
        for handler in handlers {
            handler(self, &payload);
        }
        Ok(())
    }

    /// Attach the rendered output to `target`, before `anchor` if given
    ///
    /// Callable exactly once per instance.
    pub fn mount(&self, target: &H::Element, anchor: Option<&H::Element>) -> Result<()> {
        self.ensure_active("mount")?;
        if self.inner.mounted.get() {
            return Err(LifecycleError::AlreadyMounted);
        }

        let mut fragment = self.inner.fragment.borrow_mut();
        let fragment = fragment
            .as_mut()
            .ok_or(LifecycleError::TornDown { op: "mount" })?;
        let mut host = self.inner.host.borrow_mut();
        fragment.mount(&mut host, target, anchor)?;
        self.inner.mounted.set(true);
        Ok(())
    }

    /// Dispose the instance: fire the `teardown` event to subscribers,
    /// then tear the lifecycle binding down, detaching the output from its
    /// host when `detach` is set
    ///
    /// Terminal: every subsequent mutating operation fails with
    /// [`LifecycleError::TornDown`]. Reads keep returning the last-known
    /// state.
    pub fn teardown(&self, detach: bool) -> Result<()> {
        self.ensure_active("teardown")?;

        self.fire(TEARDOWN_EVENT, Value::Null)?;
        if let Some(mut fragment) = self.inner.fragment.borrow_mut().take() {
            let mut host = self.inner.host.borrow_mut();
            fragment.teardown(&mut host, detach);
        }
        self.inner.lifecycle.set(Lifecycle::TornDown);
        tracing::debug!("component torn down");
        Ok(())
    }

    fn registry(&self, defer: bool) -> &RefCell<ObserverRegistry<H>> {
        if defer {
            &self.inner.deferred
        } else {
            &self.inner.immediate
        }
    }

    fn ensure_active(&self, op: &'static str) -> Result<()> {
        match self.inner.lifecycle.get() {
            Lifecycle::Active => Ok(()),
            Lifecycle::TornDown => Err(LifecycleError::TornDown { op }),
        }
    }

    /// One observer pass over `partial`'s keys, in partial insertion order;
    /// per key, callbacks run in registration order
    fn dispatch(&self, tier: Tier, partial: &StateMap, old: &StateMap) {
        let registry = match tier {
            Tier::Immediate => &self.inner.immediate,
            Tier::Deferred => &self.inner.deferred,
        };

        for (key, new_value) in partial {
            let old_value = old.get(key);
            if state::unchanged(new_value, old_value) {
                continue;
            }

            let snapshot = registry.borrow().callbacks_for(key);
            for (id, callback) in snapshot {
                // Cancelled by an earlier callback in this pass.
                if !registry.borrow().contains(id) {
                    continue;
                }
                // Re-entered by its own side effects; skip the nested call.
                if !self.inner.active.borrow_mut().insert(id) {
                    continue;
                }
                callback(self, new_value, old_value);
                self.inner.active.borrow_mut().remove(&id);
            }
        }
    }
}
