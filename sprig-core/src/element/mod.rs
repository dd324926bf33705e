//! Element Descriptors
//!
//! This module holds the data model component authors build: descriptors
//! ([`Node`]), their props, and the factory that assembles them.
//!
//! # Concepts
//!
//! ## Descriptors
//!
//! A descriptor names what to build (an intrinsic tag, a component, or a
//! fragment), the props to apply, and a flat list of children. Nothing
//! native exists yet; the materializer in [`crate::render`] turns
//! descriptors into host nodes.
//!
//! ## Kinds
//!
//! The kind is a closed enum. The materializer matches on it exhaustively,
//! so there is no runtime type sniffing to decide whether a descriptor is a
//! tag or a function.
//!
//! ## Immutability
//!
//! Descriptors are never edited after construction. Every render pass asks
//! components for fresh ones.

mod factory;
mod node;
mod props;

pub use factory::{create_element, create_fragment, Children};
pub use node::{Child, Component, ElementKind, Node};
pub use props::{node_ref, on, try_node_ref, EventHandler, NodeRef, PropValue, Props, Style};
