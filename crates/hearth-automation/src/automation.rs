//! Automations
//!
//! An automation couples one trigger, a conjunction of conditions, and one
//! action list. On trigger fire it checks the conditions in the order they
//! were added (short-circuiting) and, if all pass, plays the action list
//! with the payload. There is no "disabled" state; gating is entirely
//! condition-driven.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::debug;

use crate::action::{Action, ActionList};
use crate::condition::{check_all, Condition};
use crate::trigger::Trigger;

/// Upper bound on structural nesting of the action graph (If/While
/// bodies). Deeper graphs risk overflowing the target's stack; rejecting
/// them at build time keeps the runtime paths infallible.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Graph-construction errors. Runtime paths never fail; this surface only
/// exists at startup wiring time.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("action graph nesting depth {depth} exceeds the maximum of {max}")]
    GraphTooDeep { depth: usize, max: usize },
}

/// The binding of one [`Trigger`], a conjunction of [`Condition`]s, and one
/// [`ActionList`]. Constructed once at startup, lives for the process.
pub struct Automation<T: Clone + 'static> {
    trigger: Weak<Trigger<T>>,
    conditions: RefCell<Vec<Rc<dyn Condition<T>>>>,
    actions: ActionList<T>,
}

impl<T: Clone + 'static> Automation<T> {
    /// Create an automation bound to `trigger`; the trigger's parent
    /// back-reference is set here, once.
    pub fn new(trigger: &Rc<Trigger<T>>) -> Rc<Self> {
        let automation = Rc::new(Self {
            trigger: Rc::downgrade(trigger),
            conditions: RefCell::new(Vec::new()),
            actions: ActionList::new(),
        });
        trigger.set_parent(&automation);
        automation
    }

    /// Append a condition to the conjunction.
    pub fn add_condition(&self, condition: Rc<dyn Condition<T>>) {
        self.conditions.borrow_mut().push(condition);
    }

    pub fn add_conditions(&self, conditions: Vec<Rc<dyn Condition<T>>>) {
        self.conditions.borrow_mut().extend(conditions);
    }

    /// Append an action to the list, rejecting graphs nested deeper than
    /// [`MAX_NESTING_DEPTH`].
    pub fn add_action(&self, action: Rc<dyn Action<T>>) -> Result<(), AutomationError> {
        let depth = self.actions.depth().max(action.depth());
        if depth > MAX_NESTING_DEPTH {
            return Err(AutomationError::GraphTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        self.actions.add_action(action);
        Ok(())
    }

    pub fn add_actions(&self, actions: Vec<Rc<dyn Action<T>>>) -> Result<(), AutomationError> {
        for action in actions {
            self.add_action(action)?;
        }
        Ok(())
    }

    /// Handle a trigger firing: gate on the condition conjunction, then
    /// play the action list. A failed gate discards the firing with no
    /// side effect and does not un-arm future fires.
    pub fn trigger(&self, x: T) {
        if !check_all(&self.conditions.borrow(), &x) {
            debug!("automation firing gated off by conditions");
            return;
        }
        self.actions.play(x);
    }

    /// Halt any in-flight action run; future fires stay armed.
    pub fn stop(&self) {
        self.actions.stop();
    }

    /// The trigger this automation is bound to, if it is still alive.
    pub fn bound_trigger(&self) -> Option<Rc<Trigger<T>>> {
        self.trigger.upgrade()
    }
}
