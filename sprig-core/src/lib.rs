//! Sprig Core
//!
//! This crate provides the core runtime for the Sprig declarative UI
//! renderer. It implements:
//!
//! - Element descriptors and the `create_element` factory
//! - A materializer that turns descriptors into native nodes
//! - Attribute and event binding
//! - Positional state hooks and a synchronous render scheduler
//!
//! Every state update re-renders the whole tree from scratch. There is no
//! diffing and no batching; the runtime trades speed for a model that is
//! easy to follow.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `element`: Descriptors, props, and the factory
//! - `render`: The host seam, the binder, and the materializer
//! - `runtime`: Hook slots, render contexts, and mounted roots
//! - `dom`: An in-memory host used by tests and HTML output
//! - `config` / `error`: Runtime settings and error types
//!
//! # Example
//!
//! ```rust
//! use sprig_core::dom::{DomEvent, MemoryHost};
//! use sprig_core::{children, create_element, mount, on, props, Component, Host, Node, Props, Scope};
//!
//! fn counter(cx: &mut Scope<MemoryHost>, _: &Props<MemoryHost>) -> Node<MemoryHost> {
//!     let (count, set_count) = cx.use_state(0);
//!     create_element(
//!         "button",
//!         Some(props! { "onClick" => on(move |_: &DomEvent| set_count.update(|n| n + 1)) }),
//!         children!["Count: ", count],
//!     )
//! }
//!
//! let host = MemoryHost::new();
//! let container = host.create_element("div");
//! let app = create_element(Component::new("Counter", counter), None, children![]);
//! mount(host, app, container.clone()).unwrap();
//!
//! container.find_by_tag("button").unwrap().dispatch("click");
//! assert_eq!(container.text_content(), "Count: 1");
//! ```

pub mod config;
pub mod dom;
pub mod element;
pub mod error;
pub mod render;
pub mod runtime;

pub use config::{HookOrderPolicy, RuntimeConfig};
pub use element::{
    create_element, create_fragment, node_ref, on, try_node_ref, Child, Children, Component,
    ElementKind, EventHandler, Node, NodeRef, PropValue, Props, Style,
};
pub use error::{CallbackError, ConfigError, RenderError, Result};
pub use render::{apply_props, materialize, Host, Mounted};
pub use runtime::{mount, RenderPhase, Root, RootId, Scope, SetState};
