//! Hook Slot Table
//!
//! State cells addressed purely by call position. The first `use_state` in a
//! pass owns slot 0, the second slot 1, and so on. Slots are seeded lazily
//! and never removed.
//!
//! Values are stored type-erased, alongside the name of the type they were
//! seeded with. A read with a different type is the telltale sign of a
//! component calling hooks conditionally, and is reported instead of
//! silently handing one component's state to another.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use crate::config::HookOrderPolicy;
use crate::error::{RenderError, Result};

/// Something a setter can write into and re-render.
///
/// Setters only hold a weak reference to their target, so a root that has
/// been unmounted and dropped turns every outstanding setter into a no-op.
pub(crate) trait RenderTarget {
    /// The slot table to write into.
    fn hooks(&self) -> &RefCell<HookTable>;

    /// Run (or queue) a full render pass.
    fn request_render(self: Rc<Self>);
}

struct Slot {
    value: Box<dyn Any>,
    type_name: &'static str,
}

/// Outcome of reading a slot.
pub(crate) enum Lookup<T> {
    Found(T),
    Vacant,
    Mismatch(RenderError),
}

/// Positional state cells for one root.
#[derive(Default)]
pub(crate) struct HookTable {
    slots: Vec<Slot>,
    /// Hook count of the last committed pass.
    committed: Option<usize>,
}

impl HookTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of slots ever created.
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Read slot `index` as `T`.
    pub(crate) fn lookup<T: Clone + 'static>(&self, index: usize) -> Lookup<T> {
        match self.slots.get(index) {
            None => Lookup::Vacant,
            Some(slot) => match slot.value.downcast_ref::<T>() {
                Some(value) => Lookup::Found(value.clone()),
                None => Lookup::Mismatch(RenderError::HookTypeMismatch {
                    index,
                    requested: type_name::<T>(),
                    stored: slot.type_name,
                }),
            },
        }
    }

    /// Create slot `index`. Slots are created strictly in call order.
    pub(crate) fn seed<T: 'static>(&mut self, index: usize, value: T) {
        debug_assert_eq!(index, self.slots.len(), "hook slots must be seeded in order");
        self.slots.push(Slot {
            value: Box::new(value),
            type_name: type_name::<T>(),
        });
    }

    /// Read slot `index` as `T`, ignoring vacant or mistyped slots.
    pub(crate) fn read<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        self.slots
            .get(index)
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .cloned()
    }

    /// Overwrite slot `index`. Returns `false` if the slot does not hold a `T`.
    pub(crate) fn write<T: 'static>(&mut self, index: usize, value: T) -> bool {
        match self
            .slots
            .get_mut(index)
            .and_then(|slot| slot.value.downcast_mut::<T>())
        {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Compare a finished pass against the last committed one.
    ///
    /// On success the pass's count becomes the new reference.
    pub(crate) fn check_count(&mut self, found: usize, policy: HookOrderPolicy) -> Result<()> {
        if let Some(expected) = self.committed {
            if expected != found {
                match policy {
                    HookOrderPolicy::Reject => {
                        return Err(RenderError::HookCountMismatch { expected, found });
                    }
                    HookOrderPolicy::Warn => {
                        tracing::warn!(expected, found, "hook count changed between render passes");
                    }
                }
            }
        }
        self.committed = Some(found);
        Ok(())
    }

    /// Drop the reference count, e.g. after the root descriptor changed.
    pub(crate) fn forget_committed(&mut self) {
        self.committed = None;
    }
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookTable")
            .field("slots", &self.slots.iter().map(|s| s.type_name).collect::<Vec<_>>())
            .field("committed", &self.committed)
            .finish()
    }
}

/// Setter returned by [`Scope::use_state`](crate::Scope::use_state).
///
/// Every call writes the slot and triggers a full render pass, even when
/// the new value equals the old one.
pub struct SetState<T> {
    target: Weak<dyn RenderTarget>,
    index: usize,
    _marker: PhantomData<fn(T)>,
}

impl<T: Clone + 'static> SetState<T> {
    pub(crate) fn new(target: Weak<dyn RenderTarget>, index: usize) -> Self {
        Self {
            target,
            index,
            _marker: PhantomData,
        }
    }

    /// Position of the slot this setter writes.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Replace the value and re-render.
    pub fn set(&self, value: T) {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!(index = self.index, "setter outlived its root; ignored");
            return;
        };

        let written = target.hooks().borrow_mut().write(self.index, value);
        if !written {
            tracing::error!(
                index = self.index,
                requested = type_name::<T>(),
                "state slot does not hold the setter's type; update dropped"
            );
            return;
        }

        target.request_render();
    }

    /// Compute the next value from the previous one and re-render.
    ///
    /// `f` receives exactly the value stored before this update. No borrow
    /// of the slot table is held while it runs.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!(index = self.index, "setter outlived its root; ignored");
            return;
        };

        let previous = target.hooks().borrow().read::<T>(self.index);
        let Some(previous) = previous else {
            tracing::error!(
                index = self.index,
                requested = type_name::<T>(),
                "state slot does not hold the setter's type; update dropped"
            );
            return;
        };

        let next = f(&previous);
        target.hooks().borrow_mut().write(self.index, next);
        target.request_render();
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            target: Weak::clone(&self.target),
            index: self.index,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState")
            .field("index", &self.index)
            .field("live", &(self.target.strong_count() > 0))
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct MockTarget {
        hooks: RefCell<HookTable>,
        renders: Cell<u32>,
    }

    impl MockTarget {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                hooks: RefCell::new(HookTable::new()),
                renders: Cell::new(0),
            })
        }

        fn setter<T: Clone + 'static>(self: &Rc<Self>, index: usize) -> SetState<T> {
            let weak: Weak<MockTarget> = Rc::downgrade(self);
            SetState::new(weak, index)
        }
    }

    impl RenderTarget for MockTarget {
        fn hooks(&self) -> &RefCell<HookTable> {
            &self.hooks
        }

        fn request_render(self: Rc<Self>) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    #[test]
    fn vacant_then_found() {
        let mut table = HookTable::new();
        assert!(matches!(table.lookup::<i32>(0), Lookup::Vacant));

        table.seed(0, 5_i32);
        assert!(matches!(table.lookup::<i32>(0), Lookup::Found(5)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn mistyped_read_reports_both_types() {
        let mut table = HookTable::new();
        table.seed(0, String::from("hello"));

        match table.lookup::<i32>(0) {
            Lookup::Mismatch(RenderError::HookTypeMismatch { index, requested, stored }) => {
                assert_eq!(index, 0);
                assert_eq!(requested, "i32");
                assert!(stored.ends_with("String"));
            }
            _ => panic!("expected a type mismatch"),
        }
    }

    #[test]
    fn write_refuses_other_types() {
        let mut table = HookTable::new();
        table.seed(0, 1_u8);

        assert!(!table.write(0, "nope"));
        assert!(!table.write(3, 1_u8));
        assert!(table.write(0, 9_u8));
        assert_eq!(table.read::<u8>(0), Some(9));
    }

    #[test]
    fn count_check_rejects_or_warns() {
        let mut table = HookTable::new();
        table.check_count(2, HookOrderPolicy::Reject).unwrap();
        table.check_count(2, HookOrderPolicy::Reject).unwrap();

        let err = table.check_count(3, HookOrderPolicy::Reject).unwrap_err();
        assert_eq!(err, RenderError::HookCountMismatch { expected: 2, found: 3 });

        table.check_count(3, HookOrderPolicy::Warn).unwrap();
        table.check_count(3, HookOrderPolicy::Reject).unwrap();

        table.forget_committed();
        table.check_count(1, HookOrderPolicy::Reject).unwrap();
    }

    #[test]
    fn setter_writes_and_requests_render() {
        let target = MockTarget::new();
        target.hooks.borrow_mut().seed(0, 10_i32);

        let set = target.setter::<i32>(0);
        set.set(10);
        set.set(11);

        assert_eq!(target.hooks.borrow().read::<i32>(0), Some(11));
        assert_eq!(target.renders.get(), 2);
    }

    #[test]
    fn updater_sees_previous_value() {
        let target = MockTarget::new();
        target.hooks.borrow_mut().seed(0, 41_i32);

        let seen = Rc::new(Cell::new(0));
        let seen_clone = seen.clone();
        target.setter::<i32>(0).update(move |prev| {
            seen_clone.set(*prev);
            prev + 1
        });

        assert_eq!(seen.get(), 41);
        assert_eq!(target.hooks.borrow().read::<i32>(0), Some(42));
        assert_eq!(target.renders.get(), 1);
    }

    #[test]
    fn setter_is_inert_after_target_drops() {
        let target = MockTarget::new();
        target.hooks.borrow_mut().seed(0, 0_i32);
        let set = target.setter::<i32>(0);
        drop(target);

        set.set(5);
        set.update(|v| v + 1);
        assert!(format!("{set:?}").contains("live: false"));
    }

    #[test]
    fn mistyped_setter_does_not_render() {
        let target = MockTarget::new();
        target.hooks.borrow_mut().seed(0, 0_i32);

        target.setter::<String>(0).set("x".into());
        assert_eq!(target.renders.get(), 0);
        assert_eq!(target.hooks.borrow().read::<i32>(0), Some(0));
    }
}
