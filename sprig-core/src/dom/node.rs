//! In-Memory Nodes
//!
//! A small mutable node tree with the parts of the browser DOM the runtime
//! touches: tags, attributes, listeners, handler properties, and
//! parent/child links.
//!
//! Nodes are shared handles. Cloning a [`DomNode`] yields another handle to
//! the same node, the way two JS variables can hold the same element.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use super::event::DomEvent;
use crate::element::EventHandler;

/// Tags serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Unique identifier for an in-memory node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element(String),
    Text(String),
    Fragment,
}

struct NodeData {
    id: NodeId,
    kind: NodeKind,
    attributes: IndexMap<String, String>,
    listeners: Vec<(String, EventHandler<DomEvent>)>,
    properties: IndexMap<String, EventHandler<DomEvent>>,
    children: Vec<DomNode>,
    parent: Weak<RefCell<NodeData>>,
}

/// A handle to a node in an in-memory document.
#[derive(Clone)]
pub struct DomNode(Rc<RefCell<NodeData>>);

impl DomNode {
    fn with_kind(kind: NodeKind) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            id: NodeId::new(),
            kind,
            attributes: IndexMap::new(),
            listeners: Vec::new(),
            properties: IndexMap::new(),
            children: Vec::new(),
            parent: Weak::new(),
        })))
    }

    /// Create a detached element.
    pub fn element(tag: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Element(tag.into()))
    }

    /// Create a detached text node.
    pub fn text_node(text: impl Into<String>) -> Self {
        Self::with_kind(NodeKind::Text(text.into()))
    }

    /// Create a detached fragment.
    pub fn fragment() -> Self {
        Self::with_kind(NodeKind::Fragment)
    }

    pub fn id(&self) -> NodeId {
        self.0.borrow().id
    }

    /// Tag name, for elements.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element(tag) => Some(tag.clone()),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Element(_))
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Fragment)
    }

    /// Contents of a text node. `None` for elements and fragments.
    pub fn text(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    /// Replace the contents of a text node. Ignored on other nodes.
    pub fn set_text(&self, text: impl Into<String>) {
        if let NodeKind::Text(current) = &mut self.0.borrow_mut().kind {
            *current = text.into();
        }
    }

    /// Whether both handles point at the same node.
    pub fn ptr_eq(&self, other: &DomNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    // ------------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------------

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    /// All attributes, in the order they were first set.
    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Set an attribute. Text nodes and fragments have none, so this is
    /// ignored on them.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut data = self.0.borrow_mut();
        if matches!(data.kind, NodeKind::Element(_)) {
            data.attributes.insert(name.to_owned(), value.to_owned());
        }
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.shift_remove(name);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn add_listener(&self, event: &str, handler: EventHandler<DomEvent>) {
        self.0.borrow_mut().listeners.push((event.to_owned(), handler));
    }

    /// Number of listeners registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }

    pub fn set_property_handler(&self, key: &str, handler: EventHandler<DomEvent>) {
        self.0.borrow_mut().properties.insert(key.to_owned(), handler);
    }

    /// Handler stored as a direct property, such as `onClick`.
    pub fn property_handler(&self, key: &str) -> Option<EventHandler<DomEvent>> {
        self.0.borrow().properties.get(key).cloned()
    }

    /// Fire `event` at this node. Returns how many listeners ran.
    ///
    /// Events do not bubble; only listeners on this node are called.
    pub fn dispatch(&self, event: &str) -> usize {
        self.dispatch_event(&DomEvent::new(event, self.clone()))
    }

    /// Fire `event` carrying an input value, as an `input` or `change`
    /// event would.
    pub fn dispatch_with_value(&self, event: &str, value: impl Into<String>) -> usize {
        self.dispatch_event(&DomEvent::new(event, self.clone()).with_value(value))
    }

    fn dispatch_event(&self, event: &DomEvent) -> usize {
        // Handlers may re-render and rebuild the tree, so none of them can
        // run while this node is borrowed.
        let handlers: Vec<_> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|(name, _)| name == event.kind())
            .map(|(_, handler)| handler.clone())
            .collect();

        tracing::trace!(node = self.id().raw(), event = event.kind(), listeners = handlers.len(), "dispatch");
        for handler in &handlers {
            handler.call(event);
        }
        handlers.len()
    }

    // ------------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------------

    pub fn children(&self) -> Vec<DomNode> {
        self.0.borrow().children.clone()
    }

    pub fn child(&self, index: usize) -> Option<DomNode> {
        self.0.borrow().children.get(index).cloned()
    }

    pub fn parent(&self) -> Option<DomNode> {
        self.0.borrow().parent.upgrade().map(DomNode)
    }

    /// Append `child` as the last child.
    ///
    /// A child that already has a parent is moved. Appending a fragment
    /// moves the fragment's children instead, leaving it empty.
    pub fn append_child(&self, child: &DomNode) {
        debug_assert!(!self.ptr_eq(child), "node appended to itself");

        if child.is_fragment() {
            let moved = std::mem::take(&mut child.0.borrow_mut().children);
            for grandchild in &moved {
                grandchild.0.borrow_mut().parent = Weak::new();
                self.append_child(grandchild);
            }
            return;
        }

        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Remove this node from its parent, if it has one.
    pub fn detach(&self) {
        let parent = self.0.borrow_mut().parent.upgrade();
        if let Some(parent) = parent {
            parent.borrow_mut().children.retain(|c| !c.ptr_eq(self));
            self.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Remove and detach every child.
    pub fn clear_children(&self) {
        let removed = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &removed {
            child.0.borrow_mut().parent = Weak::new();
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => out.push_str(text),
            _ => {
                for child in &data.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Whether `other` is this node or one of its descendants.
    pub fn contains(&self, other: &DomNode) -> bool {
        self.find(|node| node.ptr_eq(other)).is_some()
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// First node in document order, starting with this one, that matches.
    pub fn find<P>(&self, predicate: P) -> Option<DomNode>
    where
        P: Fn(&DomNode) -> bool,
    {
        self.find_with(&predicate)
    }

    fn find_with(&self, predicate: &dyn Fn(&DomNode) -> bool) -> Option<DomNode> {
        if predicate(self) {
            return Some(self.clone());
        }
        self.children()
            .iter()
            .find_map(|child| child.find_with(predicate))
    }

    /// Every matching node in document order, including this one.
    pub fn find_all<P>(&self, predicate: P) -> Vec<DomNode>
    where
        P: Fn(&DomNode) -> bool,
    {
        let mut out = Vec::new();
        self.collect_matches(&predicate, &mut out);
        out
    }

    fn collect_matches(&self, predicate: &dyn Fn(&DomNode) -> bool, out: &mut Vec<DomNode>) {
        if predicate(self) {
            out.push(self.clone());
        }
        for child in self.children() {
            child.collect_matches(predicate, out);
        }
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<DomNode> {
        self.find(|node| node.tag().as_deref() == Some(tag))
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<DomNode> {
        self.find_all(|node| node.tag().as_deref() == Some(tag))
    }

    pub fn find_by_class(&self, class: &str) -> Option<DomNode> {
        self.find(|node| node.has_class(class))
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    /// Serialize this node and its subtree as HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(text) => escape_into(text, false, out),
            NodeKind::Fragment => {
                for child in &data.children {
                    child.write_html(out);
                }
            }
            NodeKind::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &data.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_into(value, true, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in &data.children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    /// Structured copy of this subtree.
    pub fn snapshot(&self) -> DomSnapshot {
        let data = self.0.borrow();
        let children = || -> Vec<DomSnapshot> { data.children.iter().map(DomNode::snapshot).collect() };
        match &data.kind {
            NodeKind::Text(text) => DomSnapshot::Text { text: text.clone() },
            NodeKind::Fragment => DomSnapshot::Fragment { children: children() },
            NodeKind::Element(tag) => {
                let listeners: IndexSet<String> =
                    data.listeners.iter().map(|(name, _)| name.clone()).collect();
                DomSnapshot::Element {
                    tag: tag.clone(),
                    attributes: data.attributes.clone(),
                    listeners: listeners.into_iter().collect(),
                    children: children(),
                }
            }
        }
    }

    /// The snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot())
    }
}

impl fmt::Debug for DomNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("DomNode")
            .field("id", &data.id)
            .field("kind", &data.kind)
            .field("children", &data.children.len())
            .finish()
    }
}

/// Serializable copy of a node subtree. Handlers are recorded by event name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DomSnapshot {
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        listeners: Vec<String>,
        children: Vec<DomSnapshot>,
    },
    Text {
        text: String,
    },
    Fragment {
        children: Vec<DomSnapshot>,
    },
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn append_moves_existing_child() {
        let a = DomNode::element("a");
        let b = DomNode::element("b");
        let child = DomNode::text_node("x");

        a.append_child(&child);
        b.append_child(&child);

        assert!(a.children().is_empty());
        assert!(child.parent().unwrap().ptr_eq(&b));
    }

    #[test]
    fn appending_fragment_moves_its_children() {
        let parent = DomNode::element("div");
        let fragment = DomNode::fragment();
        fragment.append_child(&DomNode::text_node("1"));
        fragment.append_child(&DomNode::text_node("2"));

        parent.append_child(&fragment);

        assert_eq!(parent.children().len(), 2);
        assert!(fragment.children().is_empty());
        assert!(parent.child(1).unwrap().parent().unwrap().ptr_eq(&parent));
    }

    #[test]
    fn clear_children_detaches() {
        let parent = DomNode::element("ul");
        let li = DomNode::element("li");
        parent.append_child(&li);

        parent.clear_children();
        assert!(parent.children().is_empty());
        assert!(li.parent().is_none());
    }

    #[test]
    fn attributes_only_on_elements() {
        let text = DomNode::text_node("t");
        text.set_attribute("id", "x");
        assert!(text.attribute("id").is_none());

        let el = DomNode::element("div");
        el.set_attribute("id", "x");
        el.set_attribute("class", "a b");
        assert_eq!(el.attribute("id").as_deref(), Some("x"));
        assert!(el.has_class("b"));

        el.remove_attribute("id");
        assert_eq!(el.attributes(), [("class".to_owned(), "a b".to_owned())]);
    }

    #[test]
    fn html_escapes_and_void_elements() {
        let p = DomNode::element("p");
        p.set_attribute("title", "say \"hi\"");
        p.append_child(&DomNode::text_node("a < b & c"));
        p.append_child(&DomNode::element("br"));

        assert_eq!(
            p.to_html(),
            "<p title=\"say &quot;hi&quot;\">a &lt; b &amp; c<br></p>"
        );
    }

    #[test]
    fn dispatch_reaches_only_matching_listeners() {
        let hits = Rc::new(Cell::new(0));
        let node = DomNode::element("button");

        for _ in 0..2 {
            let hits = hits.clone();
            node.add_listener("click", EventHandler::new(move |_: &DomEvent| hits.set(hits.get() + 1)));
        }
        node.add_listener("keydown", EventHandler::new(|_: &DomEvent| panic!("wrong event")));

        assert_eq!(node.dispatch("click"), 2);
        assert_eq!(hits.get(), 2);
        assert_eq!(node.listener_count("keydown"), 1);
    }

    #[test]
    fn listener_may_mutate_its_own_node() {
        let node = DomNode::element("button");
        node.add_listener(
            "click",
            EventHandler::new(|event: &DomEvent| event.target().set_attribute("data-clicked", "")),
        );

        node.dispatch("click");
        assert_eq!(node.attribute("data-clicked").as_deref(), Some(""));
    }

    #[test]
    fn queries_walk_in_document_order() {
        let root = DomNode::element("div");
        let first = DomNode::element("span");
        first.set_attribute("class", "item");
        let second = DomNode::element("span");
        root.append_child(&first);
        root.append_child(&second);

        assert!(root.find_by_tag("span").unwrap().ptr_eq(&first));
        assert_eq!(root.find_all_by_tag("span").len(), 2);
        assert!(root.find_by_class("item").unwrap().ptr_eq(&first));
        assert!(root.contains(&second));
        assert!(!first.contains(&second));
    }

    #[test]
    fn snapshot_lists_each_event_once() {
        let node = DomNode::element("input");
        for event in ["click", "keydown", "click", "input", "keydown"] {
            node.add_listener(event, EventHandler::new(|_: &DomEvent| {}));
        }

        match node.snapshot() {
            DomSnapshot::Element { listeners, .. } => {
                assert_eq!(listeners, ["click", "keydown", "input"]);
            }
            other => panic!("expected an element snapshot, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let button = DomNode::element("button");
        button.set_attribute("class", "primary");
        button.add_listener("click", EventHandler::new(|_: &DomEvent| {}));
        button.append_child(&DomNode::text_node("Go"));

        let json: serde_json::Value = serde_json::from_str(&button.to_json().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "element",
                "tag": "button",
                "attributes": { "class": "primary" },
                "listeners": ["click"],
                "children": [{ "type": "text", "text": "Go" }],
            })
        );
    }
}
