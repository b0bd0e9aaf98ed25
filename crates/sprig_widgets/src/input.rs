//! Text input widget
//!
//! A single `input` element whose attributes derive from component state:
//!
//! | key           | type    | default   |
//! |---------------|---------|-----------|
//! | `value`       | string  | `""`      |
//! | `type`        | string  | `text`    |
//! | `status`      | string  | `default` |
//! | `placeholder` | string  | `""`      |
//! | `disabled`    | boolean | `false`   |
//!
//! `status` drives the class (`sprig-input sprig-input--<status>`). A host
//! focus event is bridged to the component's [`events::FOCUS`] named event
//! with the host event as payload.

use std::cell::RefCell;
use std::rc::Rc;

use sprig_core::{
    truthy, AttrValue, Component, ComponentOptions, EventKind, Fragment, Host, HostEvent,
    Listener, ListenerId, Result, StateMap, Value, WeakComponent,
};

/// Named events fired by the input widget
pub mod events {
    /// Fired when the rendered input gains focus; the payload is the host
    /// event
    pub const FOCUS: &str = "onfocus";
}

/// Create an input component
///
/// `options.data` seeds the state keys listed in the module docs; if
/// `options.target` is set the input self-mounts during construction.
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
    let focus: Listener = Rc::new(move |event: &HostEvent| {
        if let Some(component) = weak.upgrade() {
            let _ = component.fire(events::FOCUS, event.to_value());
        }
    });
    let listener = host.add_listener(&element, EventKind::Focus, focus);

    let mut fragment = InputFragment {
        element,
        listener: Some(listener),
    };
    fragment.apply(host, state);
    Box::new(fragment)
}

struct InputFragment<H: Host> {
    element: H::Element,
    listener: Option<ListenerId>,
}

impl<H: Host> InputFragment<H> {
    /// Recompute every derived attribute from full state
    fn apply(&mut self, host: &mut H, state: &StateMap) {
        host.set_attribute(&self.element, "class", AttrValue::Text(class_for(state)));
        host.set_attribute(
            &self.element,
            "placeholder",
            AttrValue::Text(text_or(state, "placeholder", "")),
        );
        host.set_attribute(
            &self.element,
            "type",
            AttrValue::Text(text_or(state, "type", "text")),
        );
        host.set_attribute(
            &self.element,
            "disabled",
            AttrValue::Flag(state.get("disabled").is_some_and(truthy)),
        );
        host.set_attribute(
            &self.element,
            "value",
            AttrValue::Text(text_or(state, "value", "")),
        );
    }
}

impl<H: Host> Fragment<H> for InputFragment<H> {
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
    format!("sprig-input sprig-input--{status}")
}

/// A string state key with a fallback for absent or falsy values
fn text_or(state: &StateMap, key: &str, fallback: &str) -> String {
    state
        .get(key)
        .filter(|value| truthy(value))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprig_core::state;

    #[test]
    fn test_class_defaults_and_follows_status() {
        assert_eq!(class_for(&StateMap::new()), "sprig-input sprig-input--default");
        assert_eq!(
            class_for(&state! { "status": "error" }),
            "sprig-input sprig-input--error"
        );
        // Empty string is falsy, like an unset status.
        assert_eq!(
            class_for(&state! { "status": "" }),
            "sprig-input sprig-input--default"
        );
    }

    #[test]
    fn test_text_fallbacks() {
        assert_eq!(text_or(&StateMap::new(), "type", "text"), "text");
        assert_eq!(
            text_or(&state! { "type": "password" }, "type", "text"),
            "password"
        );
        assert_eq!(text_or(&state! { "value": "" }, "value", ""), "");
    }
}
