//! Tree Materializer
//!
//! Turns a descriptor tree into native nodes, depth first and in descriptor
//! order.
//!
//! # Algorithm
//!
//! - **Text / number leaf**: one native text node.
//! - **Fragment**: the children, grouped. Hosts with a native grouping node
//!   get one; otherwise the siblings travel as a [`Mounted::Group`].
//! - **Component**: invoke it with the render context and
//!   `{...props, children}`, then materialize what it returns.
//! - **Intrinsic**: create the node, bind its props, materialize and append
//!   each child, and finally hand the finished node to its `ref` callback.
//!
//! Ref callbacks are the one place where user code is isolated: an error or
//! panic is logged as a warning and the render carries on.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use smallvec::SmallVec;

use super::binder::{apply_props, format_number};
use super::Host;
use crate::config::RuntimeConfig;
use crate::element::{Child, ElementKind, Node, NodeRef};
use crate::error::Result;
use crate::runtime::{RootInner, Scope};

/// The native result of materializing one descriptor.
#[derive(Debug, Clone)]
pub enum Mounted<N> {
    /// A single native node.
    Node(N),
    /// Sibling nodes from a fragment on a host without native grouping.
    Group(SmallVec<[N; 4]>),
}

impl<N: Clone> Mounted<N> {
    /// Append everything this result holds under `parent`, in order.
    pub fn append_to<H>(&self, host: &H, parent: &N)
    where
        H: Host<Node = N>,
    {
        for node in self.nodes() {
            host.append_child(parent, node);
        }
    }

    /// The top-level native nodes.
    pub fn nodes(&self) -> &[N] {
        match self {
            Mounted::Node(node) => std::slice::from_ref(node),
            Mounted::Group(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }

    /// The single node, if this is not a group.
    pub fn into_node(self) -> Option<N> {
        match self {
            Mounted::Node(node) => Some(node),
            Mounted::Group(_) => None,
        }
    }

    fn extend_into(self, out: &mut SmallVec<[N; 4]>) {
        match self {
            Mounted::Node(node) => out.push(node),
            Mounted::Group(nodes) => out.extend(nodes),
        }
    }
}

/// Materialize a descriptor tree outside of any mounted root.
///
/// Components still get a render context, but it is not bound to a
/// container: hooks start from their initial values, and setters captured
/// during the call do nothing once it returns.
pub fn materialize<H: Host>(host: &H, node: &Node<H>) -> Result<Mounted<H::Node>> {
    let root = RootInner::new(host.clone(), RuntimeConfig::default());
    let mut cx = Scope::new(root);
    let mounted = materialize_node(&mut cx, node)?;
    cx.finish()?;
    Ok(mounted)
}

fn materialize_child<H: Host>(cx: &mut Scope<H>, child: &Child<H>) -> Result<Mounted<H::Node>> {
    match child {
        Child::Text(text) => Ok(Mounted::Node(cx.host().create_text(text))),
        Child::Number(n) => Ok(Mounted::Node(cx.host().create_text(&format_number(*n)))),
        Child::Element(node) => materialize_node(cx, node),
    }
}

pub(crate) fn materialize_node<H: Host>(cx: &mut Scope<H>, node: &Node<H>) -> Result<Mounted<H::Node>> {
    match node.kind() {
        ElementKind::Fragment => {
            let mut group = SmallVec::new();
            for child in node.children() {
                materialize_child(cx, child)?.extend_into(&mut group);
            }

            let host = cx.host();
            match host.create_fragment() {
                Some(fragment) => {
                    for member in &group {
                        host.append_child(&fragment, member);
                    }
                    Ok(Mounted::Node(fragment))
                }
                None => Ok(Mounted::Group(group)),
            }
        }

        ElementKind::Component(component) => {
            tracing::trace!(component = component.name(), hook = cx.hook_cursor(), "rendering component");
            let props = node.props().with_children(node.children());
            let rendered = component.render(cx, &props);
            cx.check_fault()?;
            materialize_node(cx, &rendered)
        }

        ElementKind::Intrinsic(tag) => {
            let root = cx.root();
            let host = &root.host;

            let element = host.create_element(tag);
            apply_props(host, &element, node.props());

            for child in node.children() {
                materialize_child(cx, child)?.append_to(host, &element);
            }

            if let Some(node_ref) = node.props().node_ref() {
                invoke_ref(node_ref, &element, tag, root.config.isolate_ref_panics);
            }

            Ok(Mounted::Node(element))
        }
    }
}

/// Run a ref callback. Failures are reported, never propagated.
fn invoke_ref<N>(node_ref: &NodeRef<N>, node: &N, tag: &str, isolate_panics: bool) {
    let outcome = if isolate_panics {
        match panic::catch_unwind(AssertUnwindSafe(|| node_ref.call(node))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                tracing::warn!(tag, panic = panic_message(payload.as_ref()), "ref callback panicked");
                return;
            }
        }
    } else {
        node_ref.call(node)
    };

    if let Err(err) = outcome {
        tracing::warn!(tag, error = %err, "ref callback failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
