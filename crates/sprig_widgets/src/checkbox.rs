//! Checkbox widget
//!
//! A single checkbox element. State keys: `checked`, `label`, `status`,
//! `disabled`. A host click toggles `checked` (unless disabled) and fires
//! [`events::CHANGE`] with the new value.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;
use sprig_core::{
    state, truthy, AttrValue, Component, ComponentOptions, EventKind, Fragment, Host, HostEvent,
    Listener, ListenerId, Result, StateMap, Value, WeakComponent,
};

/// Named events fired by the checkbox widget
pub mod events {
    /// Fired after a click toggles the checkbox; payload is
    /// `{"checked": bool}`
    pub const CHANGE: &str = "onchange";
}

/// Create a checkbox component
pub fn create<H: Host>(
    host: Rc<RefCell<H>>,
    options: ComponentOptions<H>,
) -> Result<Component<H>> {
    Component::new(host, options, build_fragment)
}

fn build_fragment<H: Host>(
    host: &mut H,
    state: &StateMap,
    owner: &WeakComponent<H>,
) -> Box<dyn Fragment<H>> {
    let element = host.create_element("input");

    let weak = owner.clone();
    let click: Listener = Rc::new(move |_event: &HostEvent| {
        let Some(component) = weak.upgrade() else {
            return;
        };
        if component.get("disabled").as_ref().is_some_and(truthy) {
            return;
        }
        let checked = !component.get("checked").as_ref().is_some_and(truthy);
        let _ = component.set(state! { "checked": checked });
        let _ = component.fire(events::CHANGE, json!({ "checked": checked }));
    });
    let listener = host.add_listener(&element, EventKind::Click, click);

    let mut fragment = CheckboxFragment {
        element,
        listener: Some(listener),
    };
    fragment.apply(host, state);
    Box::new(fragment)
}

struct CheckboxFragment<H: Host> {
    element: H::Element,
    listener: Option<ListenerId>,
}

impl<H: Host> CheckboxFragment<H> {
    /// Recompute every derived attribute from full state
    fn apply(&mut self, host: &mut H, state: &StateMap) {
        host.set_attribute(&self.element, "class", AttrValue::Text(class_for(state)));
        host.set_attribute(&self.element, "type", AttrValue::Text("checkbox".to_string()));
        host.set_attribute(
            &self.element,
            "checked",
            AttrValue::Flag(state.get("checked").is_some_and(truthy)),
        );
        host.set_attribute(
            &self.element,
            "disabled",
            AttrValue::Flag(state.get("disabled").is_some_and(truthy)),
        );
        if let Some(label) = state.get("label").filter(|value| truthy(value)).and_then(Value::as_str) {
            host.set_attribute(&self.element, "aria-label", AttrValue::Text(label.to_string()));
        }
    }
}

impl<H: Host> Fragment<H> for CheckboxFragment<H> {
    fn mount(
        &mut self,
        host: &mut H,
        target: &H::Element,
        anchor: Option<&H::Element>,
    ) -> Result<()> {
        host.insert_before(target, &self.element, anchor);
        Ok(())
    }

    fn update(&mut self, host: &mut H, _changed: &StateMap, state: &StateMap) {
        self.apply(host, state);
    }

    fn teardown(&mut self, host: &mut H, detach: bool) {
        if let Some(listener) = self.listener.take() {
            host.remove_listener(&self.element, listener);
        }
        if detach {
            host.remove(&self.element);
        }
    }
}

fn class_for(state: &StateMap) -> String {
    let status = state
        .get("status")
        .filter(|value| truthy(value))
        .and_then(Value::as_str)
        .unwrap_or("default");
    format!("sprig-checkbox sprig-checkbox--{status}")
}
