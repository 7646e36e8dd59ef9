//! Scripts
//!
//! A script is a reusable, independently invocable zero-payload trigger:
//! it serves as an automation entry point and as an action target
//! ([`crate::ScriptExecuteAction`] / [`crate::ScriptStopAction`]).
//!
//! Re-entrancy policy: restart. `execute()` first stops any in-flight run
//! of the bound automation (a no-op when idle), then fires, so two
//! overlapping runs can never race on shared captured state.

use std::rc::Rc;

use tracing::debug;

use crate::trigger::Trigger;

/// A reusable subroutine of the automation DSL.
pub struct Script {
    trigger: Rc<Trigger<()>>,
}

impl Script {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            trigger: Trigger::new(),
        })
    }

    /// The underlying trigger, for binding the script's automation. Only
    /// zero-payload automations can be bound.
    pub fn trigger(&self) -> &Rc<Trigger<()>> {
        &self.trigger
    }

    /// Run the script from the top, restarting a suspended prior run.
    pub fn execute(&self) {
        debug!("script execute");
        self.trigger.stop();
        self.trigger.trigger(());
    }

    /// Halt any in-flight run.
    pub fn stop(&self) {
        debug!("script stop");
        self.trigger.stop();
    }
}
