//! Component runtime integration against the headless host
//!
//! Drives the runtime through a hand-written fragment to exercise the
//! rendering seam directly, independent of any stock widget.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_core::{
    state, AttrValue, Component, ComponentOptions, EventKind, Fragment, Host, HostEvent,
    Listener, ListenerId, Result, StateMap, Value, WeakComponent,
};
use sprig_platform::{ElementKey, HeadlessHost, SharedHeadlessHost};

/// A one-element fragment that mirrors the `text` state key into a `text`
/// attribute and bridges host clicks to the `onclick` named event
struct LabelFragment {
    element: ElementKey,
    listener: Option<ListenerId>,
}

fn build_label(
    host: &mut HeadlessHost,
    state: &StateMap,
    owner: &WeakComponent<HeadlessHost>,
) -> Box<dyn Fragment<HeadlessHost>> {
    let element = host.create_element("label");

    let weak = owner.clone();
    let click: Listener = Rc::new(move |event: &HostEvent| {
        if let Some(component) = weak.upgrade() {
            let _ = component.fire("onclick", event.to_value());
        }
    });
    let listener = host.add_listener(&element, EventKind::Click, click);

    let mut fragment = LabelFragment {
        element,
        listener: Some(listener),
    };
    fragment.apply(host, state);
    Box::new(fragment)
}

impl LabelFragment {
    fn apply(&mut self, host: &mut HeadlessHost, state: &StateMap) {
        let text = state
            .get("text")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        host.set_attribute(&self.element, "text", AttrValue::Text(text));
    }
}

impl Fragment<HeadlessHost> for LabelFragment {
    fn mount(
        &mut self,
        host: &mut HeadlessHost,
        target: &ElementKey,
        anchor: Option<&ElementKey>,
    ) -> Result<()> {
        host.insert_before(target, &self.element, anchor);
        Ok(())
    }

    fn update(&mut self, host: &mut HeadlessHost, _changed: &StateMap, state: &StateMap) {
        self.apply(host, state);
    }

    fn teardown(&mut self, host: &mut HeadlessHost, detach: bool) {
        if let Some(listener) = self.listener.take() {
            host.remove_listener(&self.element, listener);
        }
        if detach {
            host.remove(&self.element);
        }
    }
}

fn mounted_label(
    data: StateMap,
) -> (SharedHeadlessHost, Component<HeadlessHost>, ElementKey) {
    let host = HeadlessHost::shared();
    let container = host.borrow_mut().create_element("div");
    let component = Component::new(
        Rc::clone(&host),
        ComponentOptions::new().data(data).target(container),
        build_label,
    )
    .unwrap();
    let element = host.borrow().children_of(container)[0];
    (host, component, element)
}

#[test]
fn test_set_refreshes_rendered_output() {
    let (host, component, element) = mounted_label(state! { "text": "before" });
    assert_eq!(host.borrow().attr_text(element, "text"), Some("before"));

    component.set(state! { "text": "after" }).unwrap();
    assert_eq!(host.borrow().attr_text(element, "text"), Some("after"));
}

#[test]
fn test_host_event_reaches_named_channel() {
    let (host, component, element) = mounted_label(state! {});
    let seen = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&seen);
    component
        .on("onclick", move |_, payload| {
            log.borrow_mut().push(payload.clone());
        })
        .unwrap();

    HeadlessHost::emit(
        &host,
        element,
        HostEvent::new(EventKind::Click, sprig_core::EventData::Pointer { x: 3.0, y: 4.0 }),
    );
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn test_event_handler_may_reenter_set() {
    // A click handler that writes state drives a full nested dispatch,
    // including the render step, before the emit call returns.
    let (host, component, element) = mounted_label(state! { "text": "idle" });

    component
        .on("onclick", |component, _| {
            component.set(state! { "text": "clicked" }).unwrap();
        })
        .unwrap();

    HeadlessHost::emit(&host, element, HostEvent::of(EventKind::Click));
    assert_eq!(host.borrow().attr_text(element, "text"), Some("clicked"));
}

#[test]
fn test_listener_outliving_component_is_inert() {
    let (host, component, element) = mounted_label(state! {});

    drop(component);
    // The bridge holds only a weak handle; emitting after the component is
    // gone must be a quiet no-op.
    HeadlessHost::emit(&host, element, HostEvent::of(EventKind::Click));
}

#[test]
fn test_two_instances_do_not_share_registries() {
    let host = HeadlessHost::shared();
    let container = host.borrow_mut().create_element("div");
    let first = Component::new(
        Rc::clone(&host),
        ComponentOptions::new().data(state! { "text": "a" }).target(container),
        build_label,
    )
    .unwrap();
    let second = Component::new(
        Rc::clone(&host),
        ComponentOptions::new().data(state! { "text": "a" }).target(container),
        build_label,
    )
    .unwrap();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&calls);
    first
        .observe(
            "text",
            move |_, new, _| log.borrow_mut().push(format!("first:{new}")),
            sprig_core::ObserveOptions::new().init(false),
        )
        .unwrap();

    second.set(state! { "text": "b" }).unwrap();
    assert!(calls.borrow().is_empty());

    first.set(state! { "text": "c" }).unwrap();
    assert_eq!(&*calls.borrow(), &["first:\"c\"".to_string()]);
}
