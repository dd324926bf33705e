//! In-Memory Document
//!
//! [`MemoryHost`] is a [`Host`] backed by a plain node tree instead of a
//! browser. It is what the test suite and benchmarks render into, and it is
//! a usable target for server-side HTML output.
//!
//! # Example
//!
//! ```rust
//! use sprig_core::{children, create_element, dom::MemoryHost, mount, Host, Node};
//!
//! let host = MemoryHost::new();
//! let container = host.create_element("main");
//!
//! let app: Node<MemoryHost> = create_element("h1", None, children!["Hello"]);
//! mount(host, app, container.clone()).unwrap();
//!
//! assert_eq!(container.to_html(), "<main><h1>Hello</h1></main>");
//! ```

mod event;
mod node;

use std::cell::Cell;
use std::rc::Rc;

pub use event::DomEvent;
pub use node::{DomNode, DomSnapshot, NodeId};

use crate::element::EventHandler;
use crate::render::Host;

/// A [`Host`] that builds [`DomNode`] trees.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    native_fragments: bool,
    created: Rc<Cell<usize>>,
}

impl MemoryHost {
    /// A host without native grouping nodes; fragments mount as siblings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host whose fragments are real grouping nodes, like a browser's
    /// `DocumentFragment`.
    pub fn with_native_fragments() -> Self {
        Self {
            native_fragments: true,
            ..Self::default()
        }
    }

    /// Number of nodes this host (and its clones) has created.
    pub fn nodes_created(&self) -> usize {
        self.created.get()
    }

    fn track(&self, node: DomNode) -> DomNode {
        self.created.set(self.created.get() + 1);
        node
    }
}

impl Host for MemoryHost {
    type Node = DomNode;
    type Event = DomEvent;

    fn create_element(&self, tag: &str) -> DomNode {
        self.track(DomNode::element(tag))
    }

    fn create_text(&self, text: &str) -> DomNode {
        self.track(DomNode::text_node(text))
    }

    fn create_fragment(&self) -> Option<DomNode> {
        self.native_fragments.then(|| self.track(DomNode::fragment()))
    }

    fn set_attribute(&self, node: &DomNode, name: &str, value: &str) {
        node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &DomNode, name: &str) {
        node.remove_attribute(name);
    }

    fn add_event_listener(&self, node: &DomNode, event: &str, handler: EventHandler<DomEvent>) {
        node.add_listener(event, handler);
    }

    fn set_handler_property(&self, node: &DomNode, key: &str, handler: EventHandler<DomEvent>) {
        node.set_property_handler(key, handler);
    }

    fn append_child(&self, parent: &DomNode, child: &DomNode) {
        parent.append_child(child);
    }

    fn clear_children(&self, container: &DomNode) {
        container.clear_children();
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_node_counter() {
        let host = MemoryHost::new();
        let copy = host.clone();

        host.create_element("div");
        copy.create_text("x");
        assert_eq!(host.nodes_created(), 2);
    }

    #[test]
    fn fragments_depend_on_host_mode() {
        assert!(MemoryHost::new().create_fragment().is_none());

        let host = MemoryHost::with_native_fragments();
        let fragment = host.create_fragment().unwrap();
        assert!(fragment.is_fragment());
    }

    #[test]
    fn handler_property_is_kept_separately() {
        let host = MemoryHost::new();
        let node = host.create_element("button");
        host.set_handler_property(&node, "onClick", EventHandler::new(|_: &DomEvent| {}));

        assert!(node.property_handler("onClick").is_some());
        assert_eq!(node.listener_count("click"), 0);
    }
}
