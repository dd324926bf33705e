//! Native Host Interface
//!
//! The runtime never touches a concrete UI toolkit. Everything it needs from
//! the native side goes through [`Host`]: creating nodes, writing and
//! removing attributes, registering listeners, and managing children.
//!
//! Hosts are cheap handles (usually a reference-counted document), so they
//! are `Clone`. Native nodes are handles too; cloning one must yield a
//! second handle to the *same* node.

use crate::element::EventHandler;

/// A native UI backend.
pub trait Host: Clone + 'static {
    /// Handle to a native node.
    type Node: Clone + 'static;

    /// Event payload passed to listeners.
    type Event: 'static;

    /// Create a native element for `tag`.
    fn create_element(&self, tag: &str) -> Self::Node;

    /// Create a native text node.
    fn create_text(&self, text: &str) -> Self::Node;

    /// Create a native grouping node, if the host has one.
    ///
    /// Appending a grouping node must move its children into the parent.
    /// Hosts without one return `None`, and the materializer groups
    /// siblings virtually instead.
    fn create_fragment(&self) -> Option<Self::Node> {
        None
    }

    /// Set an attribute. Hosts must ignore nodes that cannot carry one.
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    /// Register a listener for `event` on `node`.
    fn add_event_listener(&self, node: &Self::Node, event: &str, handler: EventHandler<Self::Event>);

    /// Keep a handler as a direct property (`onClick`), for hosts that
    /// dispatch that way.
    fn set_handler_property(
        &self,
        _node: &Self::Node,
        _key: &str,
        _handler: EventHandler<Self::Event>,
    ) {
    }

    /// Append `child` as the last child of `parent`.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Remove every child of `container`.
    fn clear_children(&self, container: &Self::Node);
}
