//! Rendering host seam
//!
//! The lifecycle binding is the only place the runtime touches a concrete
//! rendering surface, and it does so exclusively through the [`Host`] trait:
//! element creation, attribute assignment, insertion/removal, and native
//! event listener wiring. Substituting an alternate host changes nothing in
//! the state store or the dispatcher.
//!
//! Host events are unified into a single platform-agnostic type,
//! [`HostEvent`], so every host delivers the same shape to listeners.

use std::rc::Rc;

use serde::Serialize;

use crate::state::Value;

/// Host-level event kinds a fragment can listen for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Focus,
    Blur,
    Click,
    Input,
}

/// Event-specific payload data
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum EventData {
    /// Text carried by an input event
    Text { text: String },
    /// Pointer position for click events
    Pointer { x: f32, y: f32 },
    None,
}

/// A native event as delivered by the host
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HostEvent {
    pub kind: EventKind,
    pub data: EventData,
}

impl HostEvent {
    pub fn new(kind: EventKind, data: EventData) -> Self {
        Self { kind, data }
    }

    /// A bare event with no payload
    pub fn of(kind: EventKind) -> Self {
        Self::new(kind, EventData::None)
    }

    /// Serialize for use as a named-event payload
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// An attribute value on a host element
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Text(String),
    Flag(bool),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Flag(_) => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttrValue::Flag(b) => Some(*b),
            AttrValue::Text(_) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

/// A native event listener installed on a host element
///
/// Listeners are shared `Fn` closures so a host can snapshot them and
/// release its own borrow before invoking; a listener is then free to
/// re-enter the host (fire events, update attributes).
pub type Listener = Rc<dyn Fn(&HostEvent)>;

/// Identity of an installed listener, used for removal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A rendering surface: element creation, attribute assignment, and event
/// listener registration/removal
///
/// All operations are synchronous; hosts are single-threaded and shared
/// behind `Rc<RefCell<_>>`.
pub trait Host: 'static {
    /// Handle to a host element; cheap to clone
    type Element: Clone + 'static;

    fn create_element(&mut self, tag: &str) -> Self::Element;

    fn set_attribute(&mut self, el: &Self::Element, name: &str, value: AttrValue);

    /// Insert `el` into `parent`, immediately before `anchor` if given,
    /// else appended
    fn insert_before(
        &mut self,
        parent: &Self::Element,
        el: &Self::Element,
        anchor: Option<&Self::Element>,
    );

    /// Detach `el` from its parent; a no-op if it has none
    fn remove(&mut self, el: &Self::Element);

    fn add_listener(&mut self, el: &Self::Element, kind: EventKind, listener: Listener)
        -> ListenerId;

    fn remove_listener(&mut self, el: &Self::Element, id: ListenerId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_event_to_value() {
        let event = HostEvent::of(EventKind::Focus);
        assert_eq!(event.to_value(), json!({"kind": "Focus", "data": "None"}));
    }

    #[test]
    fn test_attr_value_accessors() {
        assert_eq!(AttrValue::from("x").as_text(), Some("x"));
        assert_eq!(AttrValue::from(true).as_flag(), Some(true));
        assert_eq!(AttrValue::from("x").as_flag(), None);
    }
}
