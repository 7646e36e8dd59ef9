//! Global variables
//!
//! A global variable is DSL-shared state: a value that lambdas in any
//! automation can read and write through a cheap cloneable handle. The
//! variable itself is a component, so it participates in the lifecycle;
//! with a [`GlobalStore`] attached it restores its value during `setup()`
//! and writes it back whenever a loop pass observes a change.

use std::cell::RefCell;
use std::rc::Rc;

use hearth_core::component::{setup_priority, Component};
use tracing::debug;

/// Persistence hook for a restored global. The engine only defines the
/// interface; a concrete backend (RTC memory, flash) lives with the
/// hardware layer.
pub trait GlobalStore<T> {
    /// Previously saved value, if any.
    fn load(&self) -> Option<T>;

    /// Persist the current value.
    fn save(&self, value: &T);
}

/// Shared read/write access to a global's value.
///
/// Handles are cheap to clone and are what automation lambdas capture.
pub struct GlobalHandle<T> {
    value: Rc<RefCell<T>>,
}

impl<T> Clone for GlobalHandle<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
        }
    }
}

impl<T: Clone> GlobalHandle<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    /// Update in place, e.g. `handle.modify(|n| *n += 1)`.
    pub fn modify(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.value.borrow_mut());
    }
}

/// A component owning one DSL-shared value, with optional persistence.
pub struct GlobalVariable<T: Clone + PartialEq + 'static> {
    value: Rc<RefCell<T>>,
    /// Value as of the last save, for change tracking in `loop_tick`.
    saved: RefCell<T>,
    store: Option<Box<dyn GlobalStore<T>>>,
}

impl<T: Clone + PartialEq + 'static> GlobalVariable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(initial.clone())),
            saved: RefCell::new(initial),
            store: None,
        }
    }

    /// A global restored from `store` at setup and saved back on change.
    pub fn with_store(initial: T, store: impl GlobalStore<T> + 'static) -> Self {
        let mut global = Self::new(initial);
        global.store = Some(Box::new(store));
        global
    }

    pub fn handle(&self) -> GlobalHandle<T> {
        GlobalHandle {
            value: self.value.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Component for GlobalVariable<T> {
    fn setup(&mut self) {
        if let Some(store) = &self.store {
            if let Some(restored) = store.load() {
                debug!("global restored from store");
                *self.value.borrow_mut() = restored.clone();
                *self.saved.borrow_mut() = restored;
            }
        }
    }

    fn loop_tick(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        let value = self.value.borrow();
        let mut saved = self.saved.borrow_mut();
        if *value != *saved {
            store.save(&value);
            *saved = value.clone();
        }
    }

    /// Restores early so every consumer's `setup()` sees the saved value.
    fn setup_priority(&self) -> f32 {
        setup_priority::HARDWARE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, LambdaAction};
    use crate::automation::Automation;
    use crate::trigger::Trigger;
    use std::cell::Cell;

    /// In-memory store counting saves.
    struct MemoryStore {
        slot: Rc<RefCell<Option<u32>>>,
        saves: Rc<Cell<u32>>,
    }

    impl GlobalStore<u32> for MemoryStore {
        fn load(&self) -> Option<u32> {
            *self.slot.borrow()
        }

        fn save(&self, value: &u32) {
            *self.slot.borrow_mut() = Some(*value);
            self.saves.set(self.saves.get() + 1);
        }
    }

    #[test]
    fn test_handles_share_one_value() {
        let global = GlobalVariable::new(0u32);
        let a = global.handle();
        let b = global.handle();

        a.set(5);
        assert_eq!(b.get(), 5);
        b.modify(|n| *n += 1);
        assert_eq!(a.get(), 6);
    }

    #[test]
    fn test_automation_lambdas_read_and_write_global() {
        let global = GlobalVariable::new(0u32);
        let counter = global.handle();

        let trigger: Rc<Trigger<()>> = Trigger::new();
        let automation = Automation::new(&trigger);
        automation.add_condition(crate::condition::LambdaCondition::new({
            let counter = counter.clone();
            move |_: &()| counter.get() < 2
        }));
        automation
            .add_action(LambdaAction::new({
                let counter = counter.clone();
                move |_: &()| counter.modify(|n| *n += 1)
            }) as Rc<dyn Action<()>>)
            .unwrap();

        // The condition reads the same state the action mutates: the
        // third firing is gated off.
        trigger.trigger(());
        trigger.trigger(());
        trigger.trigger(());
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn test_setup_restores_saved_value() {
        let slot = Rc::new(RefCell::new(Some(42u32)));
        let saves = Rc::new(Cell::new(0));
        let mut global = GlobalVariable::with_store(
            0,
            MemoryStore {
                slot,
                saves,
            },
        );
        let handle = global.handle();

        assert_eq!(handle.get(), 0);
        global.setup();
        assert_eq!(handle.get(), 42);
    }

    #[test]
    fn test_loop_saves_only_on_change() {
        let slot = Rc::new(RefCell::new(None));
        let saves = Rc::new(Cell::new(0));
        let mut global = GlobalVariable::with_store(
            7u32,
            MemoryStore {
                slot: slot.clone(),
                saves: saves.clone(),
            },
        );
        let handle = global.handle();
        global.setup();

        global.loop_tick();
        global.loop_tick();
        assert_eq!(saves.get(), 0);

        handle.set(8);
        global.loop_tick();
        assert_eq!(saves.get(), 1);
        assert_eq!(*slot.borrow(), Some(8));

        global.loop_tick();
        assert_eq!(saves.get(), 1);
    }

    #[test]
    fn test_plain_global_ticks_without_store() {
        let mut global = GlobalVariable::new(1u8);
        global.setup();
        global.loop_tick();
        assert_eq!(global.handle().get(), 1);
        assert_eq!(global.setup_priority(), setup_priority::HARDWARE);
    }
}
