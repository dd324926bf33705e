//! Hook Store & Render Scheduler
//!
//! This module owns the state side of the runtime: the positional hook slot
//! table, the render context components receive, and the root that runs
//! render passes.
//!
//! # Concepts
//!
//! ## Roots
//!
//! A [`Root`] binds a descriptor tree to a native container. It owns its hook
//! table, so several roots can be mounted side by side without sharing state.
//!
//! ## Scopes
//!
//! A [`Scope`] is created for each render pass and handed to every
//! component in it. Hooks are methods on the scope, so they can only be
//! called while a pass is running.
//!
//! ## Setters
//!
//! [`SetState`] writes a slot and re-renders the whole root synchronously.
//! There is no batching and no diffing: every update rebuilds the native
//! tree from scratch.

mod hooks;
mod root;
mod scope;

pub use hooks::SetState;
pub use root::{mount, RenderPhase, Root, RootId};
pub use scope::Scope;

pub(crate) use root::RootInner;
