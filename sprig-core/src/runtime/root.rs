//! Root Binding & Render Scheduler
//!
//! A [`Root`] binds one descriptor tree to one native container and owns
//! everything a pass needs: the host, the hook slot table, and the render
//! loop.
//!
//! # Render Loop
//!
//! A pass moves through three phases:
//!
//! 1. **Rendering**: the hook cursor starts at zero and the whole descriptor
//!    tree is materialized into fresh native nodes.
//! 2. **Committing**: the container is emptied and the new tree attached.
//!    Nothing from the previous pass is reused.
//! 3. **Idle**: back to waiting for the next mount or state update.
//!
//! # Lifetime
//!
//! A mounted root keeps itself alive for as long as it stays mounted, so a
//! root created with [`mount`] keeps responding to events after the returned
//! handle is dropped. [`Root::unmount`] empties the container and releases
//! it.
//!
//! # Re-entrancy
//!
//! A setter fired while a pass is in progress (from a component body or a
//! ref callback, rather than a later event) does not start a nested pass.
//! Its value is written immediately and a follow-up pass is queued. Once
//! the current pass commits, queued passes are drained one at a time, up to
//! `max_nested_passes`.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::hooks::{HookTable, RenderTarget};
use super::scope::Scope;
use crate::config::RuntimeConfig;
use crate::element::Node;
use crate::error::{RenderError, Result};
use crate::render::{materialize_node, Host};

/// Unique identifier for a root, used in trace output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RootId(u64);

impl RootId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RootId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root-{}", self.0)
    }
}

/// Where a root is in its render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// No pass in progress.
    Idle,
    /// Materializing the descriptor tree.
    Rendering,
    /// Replacing the container's contents.
    Committing,
}

/// Holds the phase for the duration of a pass.
///
/// Dropping the guard returns the root to `Idle`, even if a component
/// panicked mid-pass.
struct PhaseGuard<'a> {
    phase: &'a Cell<RenderPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Cell<RenderPhase>) -> Self {
        debug_assert_eq!(phase.get(), RenderPhase::Idle, "render pass entered while busy");
        phase.set(RenderPhase::Rendering);
        Self { phase }
    }

    fn commit(&self) {
        self.phase.set(RenderPhase::Committing);
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(RenderPhase::Idle);
    }
}

pub(crate) struct RootInner<H: Host> {
    pub(crate) id: RootId,
    pub(crate) host: H,
    pub(crate) config: RuntimeConfig,
    pub(crate) hooks: RefCell<HookTable>,
    root_node: RefCell<Option<Node<H>>>,
    container: RefCell<Option<H::Node>>,
    phase: Cell<RenderPhase>,
    pending: Cell<bool>,
    passes: Cell<u64>,
    /// Self-reference held while mounted.
    pinned: RefCell<Option<Rc<RootInner<H>>>>,
}

impl<H: Host> RootInner<H> {
    pub(crate) fn new(host: H, config: RuntimeConfig) -> Rc<Self> {
        Rc::new(Self {
            id: RootId::new(),
            host,
            config,
            hooks: RefCell::new(HookTable::new()),
            root_node: RefCell::new(None),
            container: RefCell::new(None),
            phase: Cell::new(RenderPhase::Idle),
            pending: Cell::new(false),
            passes: Cell::new(0),
            pinned: RefCell::new(None),
        })
    }

    /// Run a pass now, or queue one if a pass is already running.
    fn render(self: &Rc<Self>) -> Result<()> {
        if self.phase.get() != RenderPhase::Idle {
            self.pending.set(true);
            tracing::debug!(root = %self.id, phase = ?self.phase.get(), "render requested mid-pass; queued");
            return Ok(());
        }

        let limit = self.config.max_nested_passes;
        let mut drained = 0;
        loop {
            if let Err(err) = self.render_pass() {
                self.pending.set(false);
                return Err(err);
            }
            if !self.pending.replace(false) {
                return Ok(());
            }
            if drained == limit {
                return Err(RenderError::NestedRenderLimit { limit });
            }
            drained += 1;
        }
    }

    fn render_pass(self: &Rc<Self>) -> Result<()> {
        let root_node = self.root_node.borrow().clone();
        let container = self.container.borrow().clone();
        let (Some(root_node), Some(container)) = (root_node, container) else {
            tracing::trace!(root = %self.id, "no root binding; render skipped");
            return Ok(());
        };

        let pass = self.passes.get() + 1;
        self.passes.set(pass);
        let span = tracing::debug_span!("render_pass", root = %self.id, pass);
        let _enter = span.enter();

        let guard = PhaseGuard::enter(&self.phase);
        let mut cx = Scope::new(Rc::clone(self));
        let mounted = materialize_node(&mut cx, &root_node)?;
        let hooks = cx.finish()?;
        self.hooks
            .borrow_mut()
            .check_count(hooks, self.config.hook_order)?;

        guard.commit();
        self.host.clear_children(&container);
        mounted.append_to(&self.host, &container);
        tracing::debug!(hooks, nodes = mounted.len(), "committed");
        Ok(())
    }
}

impl<H: Host> RenderTarget for RootInner<H> {
    fn hooks(&self) -> &RefCell<HookTable> {
        &self.hooks
    }

    fn request_render(self: Rc<Self>) {
        if let Err(err) = self.render() {
            tracing::error!(root = %self.id, error = %err, "render triggered by a state update failed");
        }
    }
}

/// A mounted application instance.
///
/// Cloning a `Root` yields another handle to the same instance. Setters and
/// event handlers only hold weak references; a mounted root pins itself, so
/// they keep working until [`unmount`](Self::unmount) is called. An
/// unmounted root goes away with its last handle.
pub struct Root<H: Host> {
    inner: Rc<RootInner<H>>,
}

impl<H: Host> Root<H> {
    /// Create an unmounted root with the default config.
    pub fn new(host: H) -> Self {
        Self::with_config(host, RuntimeConfig::default())
    }

    /// Create an unmounted root.
    pub fn with_config(host: H, config: RuntimeConfig) -> Self {
        Self {
            inner: RootInner::new(host, config),
        }
    }

    /// Bind `node` to `container` and render it.
    ///
    /// Mounting again replaces the binding and starts from an empty hook
    /// table, since the new tree owns its own state.
    pub fn mount(&self, node: Node<H>, container: H::Node) -> Result<()> {
        *self.inner.root_node.borrow_mut() = Some(node);
        *self.inner.container.borrow_mut() = Some(container);
        *self.inner.hooks.borrow_mut() = HookTable::new();
        *self.inner.pinned.borrow_mut() = Some(Rc::clone(&self.inner));
        self.inner.render()
    }

    /// Empty the container, drop the binding and release the root.
    ///
    /// Outstanding setters become no-ops once the last handle is gone.
    pub fn unmount(&self) {
        let container = self.inner.container.borrow_mut().take();
        if let Some(container) = container {
            self.inner.host.clear_children(&container);
        }
        *self.inner.root_node.borrow_mut() = None;
        *self.inner.hooks.borrow_mut() = HookTable::new();
        tracing::debug!(root = %self.inner.id, "unmounted");
        let pinned = self.inner.pinned.borrow_mut().take();
        drop(pinned);
    }

    /// Whether the root currently has a container.
    pub fn is_mounted(&self) -> bool {
        self.inner.container.borrow().is_some()
    }

    /// Swap the root descriptor and render it into the existing container.
    ///
    /// Without a container this only stores the descriptor.
    pub fn set_root(&self, node: Node<H>) -> Result<()> {
        *self.inner.root_node.borrow_mut() = Some(node);
        self.inner.hooks.borrow_mut().forget_committed();
        self.inner.render()
    }

    /// Force a full render pass.
    pub fn render(&self) -> Result<()> {
        self.inner.render()
    }

    pub fn id(&self) -> RootId {
        self.inner.id
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    pub fn phase(&self) -> RenderPhase {
        self.inner.phase.get()
    }

    /// Number of render passes started, including aborted ones.
    pub fn pass_count(&self) -> u64 {
        self.inner.passes.get()
    }

    /// Number of hook slots created so far.
    pub fn hook_count(&self) -> usize {
        self.inner.hooks.borrow().len()
    }

    /// The mount point, if the root has been mounted.
    pub fn container(&self) -> Option<H::Node> {
        self.inner.container.borrow().clone()
    }
}

impl<H: Host> Clone for Root<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host> fmt::Debug for Root<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("id", &self.inner.id)
            .field("phase", &self.inner.phase.get())
            .field("passes", &self.inner.passes.get())
            .field("hooks", &self.inner.hooks.borrow())
            .finish()
    }
}

/// Create a root with the default config and mount `node` into `container`.
///
/// The returned handle may be dropped; the root stays mounted until
/// [`Root::unmount`] is called through a clone of it.
pub fn mount<H: Host>(host: H, node: Node<H>, container: H::Node) -> Result<Root<H>> {
    let root = Root::new(host);
    root.mount(node, container)?;
    Ok(root)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
