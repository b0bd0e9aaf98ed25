//! In-memory headless host
//!
//! An element arena with tags, attributes, children, and listeners, plus
//! event synthesis. Useful for:
//! - Unit testing widgets
//! - Integration testing the component runtime
//! - CI pipelines with no display
//!
//! Nodes are never freed: `remove` only detaches a node from its parent,
//! so a detached element can be inspected (or remounted) afterwards, the
//! way a DOM node outlives `removeChild`.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use sprig_core::{AttrValue, EventKind, Host, HostEvent, Listener, ListenerId};

new_key_type! {
    /// Handle to a headless element
    pub struct ElementKey;
}

/// A headless host shared with the components rendering into it
pub type SharedHeadlessHost = Rc<RefCell<HeadlessHost>>;

struct ElementNode {
    tag: String,
    attributes: FxHashMap<String, AttrValue>,
    children: Vec<ElementKey>,
    parent: Option<ElementKey>,
    listeners: Vec<(ListenerId, EventKind, Listener)>,
}

impl ElementNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: FxHashMap::default(),
            children: Vec::new(),
            parent: None,
            listeners: Vec::new(),
        }
    }
}

/// In-memory element tree implementing the rendering seam
pub struct HeadlessHost {
    elements: SlotMap<ElementKey, ElementNode>,
    next_listener: u64,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            elements: SlotMap::with_key(),
            next_listener: 0,
        }
    }

    /// A fresh host behind the shared handle components expect
    pub fn shared() -> SharedHeadlessHost {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Synthesize a native event on `el`
    ///
    /// Snapshots the matching listeners and releases the host borrow before
    /// invoking them, so a listener can re-enter the host (fire component
    /// events, update attributes, even tear the component down).
    pub fn emit(host: &SharedHeadlessHost, el: ElementKey, event: HostEvent) {
        let listeners: Vec<Listener> = {
            let host = host.borrow();
            match host.elements.get(el) {
                Some(node) => node
                    .listeners
                    .iter()
                    .filter(|(_, kind, _)| *kind == event.kind)
                    .map(|(_, _, listener)| Rc::clone(listener))
                    .collect(),
                None => Vec::new(),
            }
        };
        tracing::trace!(kind = ?event.kind, listeners = listeners.len(), "emitting host event");
        for listener in listeners {
            listener(&event);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn contains(&self, el: ElementKey) -> bool {
        self.elements.contains_key(el)
    }

    pub fn tag(&self, el: ElementKey) -> Option<&str> {
        self.elements.get(el).map(|node| node.tag.as_str())
    }

    pub fn attr(&self, el: ElementKey, name: &str) -> Option<&AttrValue> {
        self.elements.get(el)?.attributes.get(name)
    }

    /// Text attribute value, `None` for flags and absent attributes
    pub fn attr_text(&self, el: ElementKey, name: &str) -> Option<&str> {
        self.attr(el, name)?.as_text()
    }

    /// Flag attribute value, defaulting to `false` when absent
    pub fn attr_flag(&self, el: ElementKey, name: &str) -> bool {
        self.attr(el, name)
            .and_then(AttrValue::as_flag)
            .unwrap_or(false)
    }

    pub fn parent_of(&self, el: ElementKey) -> Option<ElementKey> {
        self.elements.get(el)?.parent
    }

    pub fn children_of(&self, el: ElementKey) -> &[ElementKey] {
        self.elements
            .get(el)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, el: ElementKey) -> usize {
        self.children_of(el).len()
    }

    pub fn listener_count(&self, el: ElementKey) -> usize {
        self.elements
            .get(el)
            .map(|node| node.listeners.len())
            .unwrap_or(0)
    }

    /// Render the subtree under `el` as an HTML-ish line per element, for
    /// demos and debugging
    pub fn dump(&self, el: ElementKey) -> String {
        let mut out = String::new();
        self.dump_into(el, 0, &mut out);
        out
    }

    fn dump_into(&self, el: ElementKey, depth: usize, out: &mut String) {
        let Some(node) = self.elements.get(el) else {
            return;
        };
        out.push_str(&"  ".repeat(depth));
        out.push('<');
        out.push_str(&node.tag);
        let mut attributes: Vec<(&String, &AttrValue)> = node.attributes.iter().collect();
        attributes.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in attributes {
            match value {
                AttrValue::Text(text) => {
                    out.push_str(&format!(" {name}={text:?}"));
                }
                AttrValue::Flag(true) => {
                    out.push_str(&format!(" {name}"));
                }
                AttrValue::Flag(false) => {}
            }
        }
        out.push_str(">\n");
        for child in &node.children {
            self.dump_into(*child, depth + 1, out);
        }
    }

    fn detach(&mut self, el: ElementKey) {
        let Some(parent) = self.elements.get(el).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent_node) = self.elements.get_mut(parent) {
            parent_node.children.retain(|child| *child != el);
        }
        if let Some(node) = self.elements.get_mut(el) {
            node.parent = None;
        }
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for HeadlessHost {
    type Element = ElementKey;

    fn create_element(&mut self, tag: &str) -> ElementKey {
        self.elements.insert(ElementNode::new(tag))
    }

    fn set_attribute(&mut self, el: &ElementKey, name: &str, value: AttrValue) {
        if let Some(node) = self.elements.get_mut(*el) {
            node.attributes.insert(name.to_string(), value);
        }
    }

    fn insert_before(
        &mut self,
        parent: &ElementKey,
        el: &ElementKey,
        anchor: Option<&ElementKey>,
    ) {
        if !self.elements.contains_key(*parent) || !self.elements.contains_key(*el) {
            return;
        }
        // Reparenting an attached element detaches it first.
        self.detach(*el);

        let Some(parent_node) = self.elements.get_mut(*parent) else {
            return;
        };
        let position = anchor
            .and_then(|anchor| parent_node.children.iter().position(|child| child == anchor))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(position, *el);
        if let Some(node) = self.elements.get_mut(*el) {
            node.parent = Some(*parent);
        }
    }

    fn remove(&mut self, el: &ElementKey) {
        self.detach(*el);
    }

    fn add_listener(
        &mut self,
        el: &ElementKey,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        if let Some(node) = self.elements.get_mut(*el) {
            node.listeners.push((id, kind, listener));
        }
        id
    }

    fn remove_listener(&mut self, el: &ElementKey, id: ListenerId) {
        if let Some(node) = self.elements.get_mut(*el) {
            node.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_insert_before_anchor_and_append() {
        let mut host = HeadlessHost::new();
        let parent = host.create_element("div");
        let first = host.create_element("span");
        let second = host.create_element("span");
        let third = host.create_element("span");

        host.insert_before(&parent, &first, None);
        host.insert_before(&parent, &second, None);
        host.insert_before(&parent, &third, Some(&second));

        assert_eq!(host.children_of(parent), &[first, third, second]);
        assert_eq!(host.parent_of(third), Some(parent));
    }

    #[test]
    fn test_remove_detaches_but_keeps_node() {
        let mut host = HeadlessHost::new();
        let parent = host.create_element("div");
        let child = host.create_element("input");
        host.insert_before(&parent, &child, None);
        host.set_attribute(&child, "value", "x".into());

        host.remove(&child);
        assert_eq!(host.child_count(parent), 0);
        assert_eq!(host.parent_of(child), None);
        // Detached nodes stay inspectable.
        assert_eq!(host.attr_text(child, "value"), Some("x"));
    }

    #[test]
    fn test_remove_without_parent_is_noop() {
        let mut host = HeadlessHost::new();
        let orphan = host.create_element("input");
        host.remove(&orphan);
        assert!(host.contains(orphan));
    }

    #[test]
    fn test_reparenting_moves_element() {
        let mut host = HeadlessHost::new();
        let first = host.create_element("div");
        let second = host.create_element("div");
        let child = host.create_element("input");

        host.insert_before(&first, &child, None);
        host.insert_before(&second, &child, None);
        assert_eq!(host.child_count(first), 0);
        assert_eq!(host.children_of(second), &[child]);
    }

    #[test]
    fn test_emit_reaches_only_matching_listeners() {
        let host = HeadlessHost::shared();
        let el = host.borrow_mut().create_element("input");
        let focus_calls = Rc::new(Cell::new(0));
        let click_calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&focus_calls);
        host.borrow_mut().add_listener(
            &el,
            EventKind::Focus,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        let counter = Rc::clone(&click_calls);
        host.borrow_mut().add_listener(
            &el,
            EventKind::Click,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        HeadlessHost::emit(&host, el, HostEvent::of(EventKind::Focus));
        assert_eq!(focus_calls.get(), 1);
        assert_eq!(click_calls.get(), 0);
    }

    #[test]
    fn test_removed_listener_no_longer_fires() {
        let host = HeadlessHost::shared();
        let el = host.borrow_mut().create_element("input");
        let calls = Rc::new(Cell::new(0));

        let counter = Rc::clone(&calls);
        let id = host.borrow_mut().add_listener(
            &el,
            EventKind::Focus,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        host.borrow_mut().remove_listener(&el, id);

        HeadlessHost::emit(&host, el, HostEvent::of(EventKind::Focus));
        assert_eq!(calls.get(), 0);
        assert_eq!(host.borrow().listener_count(el), 0);
    }

    #[test]
    fn test_listener_may_reenter_the_host() {
        let host = HeadlessHost::shared();
        let el = host.borrow_mut().create_element("input");

        let reentrant = Rc::clone(&host);
        host.borrow_mut().add_listener(
            &el,
            EventKind::Focus,
            Rc::new(move |_| {
                reentrant.borrow_mut().set_attribute(&el, "focused", true.into());
            }),
        );

        HeadlessHost::emit(&host, el, HostEvent::of(EventKind::Focus));
        assert!(host.borrow().attr_flag(el, "focused"));
    }

    #[test]
    fn test_dump_renders_tree() {
        let mut host = HeadlessHost::new();
        let parent = host.create_element("div");
        let child = host.create_element("input");
        host.set_attribute(&child, "class", "sprig-input".into());
        host.set_attribute(&child, "disabled", true.into());
        host.insert_before(&parent, &child, None);

        assert_eq!(
            host.dump(parent),
            "<div>\n  <input class=\"sprig-input\" disabled>\n"
        );
    }
}
