//! Element Descriptors
//!
//! A [`Node`] describes one UI element before it exists natively. It is
//! immutable once built and shared by reference count, so cloning a
//! descriptor tree is cheap and re-renders are free to build fresh ones.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

use super::props::Props;
use crate::render::Host;
use crate::runtime::Scope;

type RenderFn<H> = dyn Fn(&mut Scope<H>, &Props<H>) -> Node<H>;

/// A function component.
///
/// The render function receives the render context, which owns the hook
/// cursor, and the descriptor's props with `children` filled in.
pub struct Component<H: Host> {
    name: Cow<'static, str>,
    render: Rc<RenderFn<H>>,
}

impl<H: Host> Component<H> {
    /// Create a component. `name` only shows up in traces and `Debug` output.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
    where
        F: Fn(&mut Scope<H>, &Props<H>) -> Node<H> + 'static,
    {
        Self {
            name: name.into(),
            render: Rc::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the render function.
    pub(crate) fn render(&self, cx: &mut Scope<H>, props: &Props<H>) -> Node<H> {
        (self.render)(cx, props)
    }
}

impl<H: Host> Clone for Component<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            render: Rc::clone(&self.render),
        }
    }
}

impl<H: Host> fmt::Debug for Component<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

/// What a descriptor materializes into.
pub enum ElementKind<H: Host> {
    /// A native node of the given tag.
    Intrinsic(Cow<'static, str>),
    /// A function that returns another descriptor.
    Component(Component<H>),
    /// A grouping of children with no native node of its own.
    Fragment,
}

impl<H: Host> Clone for ElementKind<H> {
    fn clone(&self) -> Self {
        match self {
            ElementKind::Intrinsic(tag) => ElementKind::Intrinsic(tag.clone()),
            ElementKind::Component(c) => ElementKind::Component(c.clone()),
            ElementKind::Fragment => ElementKind::Fragment,
        }
    }
}

impl<H: Host> fmt::Debug for ElementKind<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Intrinsic(tag) => f.debug_tuple("Intrinsic").field(tag).finish(),
            ElementKind::Component(c) => f.debug_tuple("Component").field(&c.name()).finish(),
            ElementKind::Fragment => f.write_str("Fragment"),
        }
    }
}

impl<H: Host> From<&'static str> for ElementKind<H> {
    fn from(tag: &'static str) -> Self {
        ElementKind::Intrinsic(Cow::Borrowed(tag))
    }
}

impl<H: Host> From<String> for ElementKind<H> {
    fn from(tag: String) -> Self {
        ElementKind::Intrinsic(Cow::Owned(tag))
    }
}

impl<H: Host> From<Component<H>> for ElementKind<H> {
    fn from(component: Component<H>) -> Self {
        ElementKind::Component(component)
    }
}

/// One entry in a descriptor's child list.
pub enum Child<H: Host> {
    /// A nested descriptor.
    Element(Node<H>),
    /// A text leaf.
    Text(String),
    /// A numeric leaf.
    Number(f64),
}

impl<H: Host> Clone for Child<H> {
    fn clone(&self) -> Self {
        match self {
            Child::Element(node) => Child::Element(node.clone()),
            Child::Text(text) => Child::Text(text.clone()),
            Child::Number(n) => Child::Number(*n),
        }
    }
}

impl<H: Host> fmt::Debug for Child<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Child::Element(node) => node.fmt(f),
            Child::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Child::Number(n) => f.debug_tuple("Number").field(n).finish(),
        }
    }
}

struct NodeInner<H: Host> {
    kind: ElementKind<H>,
    props: Props<H>,
    children: Vec<Child<H>>,
}

/// An immutable element descriptor.
pub struct Node<H: Host> {
    inner: Rc<NodeInner<H>>,
}

impl<H: Host> Node<H> {
    /// Assemble a descriptor. Children must already be flattened.
    pub(crate) fn new(kind: ElementKind<H>, props: Props<H>, children: Vec<Child<H>>) -> Self {
        Self {
            inner: Rc::new(NodeInner {
                kind,
                props,
                children,
            }),
        }
    }

    pub fn kind(&self) -> &ElementKind<H> {
        &self.inner.kind
    }

    pub fn props(&self) -> &Props<H> {
        &self.inner.props
    }

    pub fn children(&self) -> &[Child<H>] {
        &self.inner.children
    }

    /// The tag name, for intrinsic descriptors.
    pub fn tag(&self) -> Option<&str> {
        match &self.inner.kind {
            ElementKind::Intrinsic(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.inner.kind, ElementKind::Fragment)
    }

    /// Whether both handles point at the same descriptor.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<H: Host> Clone for Node<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for Node<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.inner.kind)
            .field("props", &self.inner.props)
            .field("children", &self.inner.children)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryHost;

    #[test]
    fn clones_share_the_descriptor() {
        let node: Node<MemoryHost> = Node::new("div".into(), Props::new(), Vec::new());
        let copy = node.clone();

        assert!(node.ptr_eq(&copy));
        assert_eq!(copy.tag(), Some("div"));
        assert!(!copy.is_fragment());
    }

    #[test]
    fn kind_debug_output() {
        let component: Component<MemoryHost> =
            Component::new("Greeting", |_, _| Node::new(ElementKind::Fragment, Props::new(), Vec::new()));
        let kind = ElementKind::from(component);

        assert_eq!(format!("{kind:?}"), r#"Component("Greeting")"#);
        assert_eq!(
            format!("{:?}", ElementKind::<MemoryHost>::from("span")),
            r#"Intrinsic("span")"#
        );
    }
}
