//! Render Context
//!
//! A [`Scope`] exists only while a pass is materializing. Components receive
//! it as their first argument, and it is the only way to reach hooks, so a
//! hook call outside a render pass does not compile.
//!
//! The scope carries the hook cursor for the pass. Each `use_state` call
//! takes the next position.

use std::fmt;
use std::rc::{Rc, Weak};

use super::hooks::{Lookup, RenderTarget, SetState};
use super::root::RootInner;
use crate::error::{RenderError, Result};
use crate::render::Host;

/// The render context threaded through every component invocation.
pub struct Scope<H: Host> {
    root: Rc<RootInner<H>>,
    cursor: usize,
    fault: Option<RenderError>,
}

impl<H: Host> Scope<H> {
    pub(crate) fn new(root: Rc<RootInner<H>>) -> Self {
        Self {
            root,
            cursor: 0,
            fault: None,
        }
    }

    /// Declare a state cell.
    ///
    /// Returns the current value and a setter. The slot is seeded with
    /// `initial` the first time this position is reached; later passes
    /// return whatever was stored last.
    ///
    /// ```rust
    /// use sprig_core::{children, create_element, dom::MemoryHost, Node, Props, Scope};
    ///
    /// fn counter(cx: &mut Scope<MemoryHost>, _props: &Props<MemoryHost>) -> Node<MemoryHost> {
    ///     let (count, _set_count) = cx.use_state(0);
    ///     create_element("p", None, children!["Count: ", count])
    /// }
    /// ```
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        self.use_state_with(move || initial)
    }

    /// Like [`use_state`](Self::use_state), but only builds the initial
    /// value when the slot is first created.
    pub fn use_state_with<T, F>(&mut self, init: F) -> (T, SetState<T>)
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let index = self.cursor;
        self.cursor += 1;

        let lookup = self.root.hooks.borrow().lookup::<T>(index);
        let value = match lookup {
            Lookup::Found(value) => value,
            Lookup::Vacant => {
                let value = init();
                self.root.hooks.borrow_mut().seed(index, value.clone());
                value
            }
            Lookup::Mismatch(err) => {
                // First fault wins; the pass is aborted once the component returns.
                self.fault.get_or_insert(err);
                init()
            }
        };

        (value, SetState::new(self.target(), index))
    }

    /// The host this pass renders into.
    pub fn host(&self) -> &H {
        &self.root.host
    }

    /// Number of hooks called so far in this pass.
    pub fn hook_cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn root(&self) -> Rc<RootInner<H>> {
        Rc::clone(&self.root)
    }

    /// Surface a hook fault recorded during the last component call.
    pub(crate) fn check_fault(&mut self) -> Result<()> {
        match self.fault.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// End the pass, returning the number of hooks it used.
    pub(crate) fn finish(mut self) -> Result<usize> {
        self.check_fault()?;
        Ok(self.cursor)
    }

    fn target(&self) -> Weak<dyn RenderTarget> {
        let target: Rc<dyn RenderTarget> = self.root.clone();
        Rc::downgrade(&target)
    }
}

impl<H: Host> fmt::Debug for Scope<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("root", &self.root.id)
            .field("cursor", &self.cursor)
            .field("fault", &self.fault)
            .finish()
    }
}
