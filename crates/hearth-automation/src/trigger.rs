//! Triggers
//!
//! A trigger is a typed event source bound to exactly one automation.
//! Firing it hands the payload synchronously to the bound automation; the
//! back-reference is weak, since both ends are process-lifetime objects
//! owned by the runtime root.
//!
//! Besides the generic [`Trigger`], this module ships the engine-level
//! event sources that are pure compositions of a trigger and the component
//! lifecycle: startup, shutdown, every-loop, and fixed-interval.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use hearth_core::component::{setup_priority, Component, PollingComponent};
use tracing::warn;

use crate::automation::Automation;

/// A typed event source bound to exactly one [`Automation`].
pub struct Trigger<T: Clone + 'static> {
    parent: RefCell<Weak<Automation<T>>>,
}

impl<T: Clone + 'static> Trigger<T> {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            parent: RefCell::new(Weak::new()),
        })
    }

    /// Fire with a payload, walking synchronously into the bound
    /// automation. Firing an unbound trigger discards the event.
    pub fn trigger(&self, x: T) {
        match self.parent.borrow().upgrade() {
            Some(automation) => automation.trigger(x),
            None => warn!("trigger fired with no automation bound"),
        }
    }

    /// Halt any in-flight action run of the bound automation.
    pub fn stop(&self) {
        if let Some(automation) = self.parent.borrow().upgrade() {
            automation.stop();
        }
    }

    pub(crate) fn set_parent(&self, parent: &Rc<Automation<T>>) {
        *self.parent.borrow_mut() = Rc::downgrade(parent);
    }
}

/// Fires once from `setup()`, by default late in the startup order so the
/// hardware it might act on is already up.
pub struct StartupTrigger {
    trigger: Rc<Trigger<()>>,
    priority: f32,
}

impl StartupTrigger {
    pub fn new() -> Self {
        Self::with_priority(setup_priority::LATE)
    }

    pub fn with_priority(priority: f32) -> Self {
        Self {
            trigger: Trigger::new(),
            priority,
        }
    }

    pub fn trigger(&self) -> &Rc<Trigger<()>> {
        &self.trigger
    }
}

impl Default for StartupTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for StartupTrigger {
    fn setup(&mut self) {
        self.trigger.trigger(());
    }

    fn setup_priority(&self) -> f32 {
        self.priority
    }
}

/// Fires with the shutdown reason during the runtime's shutdown walk.
pub struct ShutdownTrigger {
    trigger: Rc<Trigger<&'static str>>,
}

impl ShutdownTrigger {
    pub fn new() -> Self {
        Self {
            trigger: Trigger::new(),
        }
    }

    pub fn trigger(&self) -> &Rc<Trigger<&'static str>> {
        &self.trigger
    }
}

impl Default for ShutdownTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ShutdownTrigger {
    fn on_shutdown(&mut self, reason: &'static str) {
        self.trigger.trigger(reason);
    }
}

/// Fires on every pass of the cooperative loop.
pub struct LoopTrigger {
    trigger: Rc<Trigger<()>>,
}

impl LoopTrigger {
    pub fn new() -> Self {
        Self {
            trigger: Trigger::new(),
        }
    }

    pub fn trigger(&self) -> &Rc<Trigger<()>> {
        &self.trigger
    }
}

impl Default for LoopTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LoopTrigger {
    fn loop_tick(&mut self) {
        self.trigger.trigger(());
    }
}

/// Fires on a fixed period, driven by the scheduler like any other polling
/// component.
pub struct IntervalTrigger {
    trigger: Rc<Trigger<()>>,
    interval_ms: u32,
}

impl IntervalTrigger {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            trigger: Trigger::new(),
            interval_ms,
        }
    }

    pub fn trigger(&self) -> &Rc<Trigger<()>> {
        &self.trigger
    }
}

impl Component for IntervalTrigger {}

impl PollingComponent for IntervalTrigger {
    fn update(&mut self) {
        self.trigger.trigger(());
    }

    fn update_interval(&self) -> u32 {
        self.interval_ms
    }
}
