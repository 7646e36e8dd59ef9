//! Automation engine for hearth nodes
//!
//! This crate implements the declarative automation vocabulary: a
//! [`Trigger`] is a typed event source bound to one [`Automation`], which
//! gates on a conjunction of [`Condition`]s and then plays an
//! [`ActionList`] against the event payload. Suspending actions (delay,
//! wait-until) park themselves on the scheduler instead of blocking the
//! loop.
//!
//! The object graph is wired once at startup through the `add_*` builder
//! calls and is structurally immutable afterwards; only the data values
//! flowing through it vary at runtime.

pub mod action;
pub mod automation;
pub mod condition;
pub mod globals;
pub mod script;
pub mod templatable;
pub mod trigger;

pub use action::{
    Action, ActionList, DelayAction, IfAction, LambdaAction, NextLink, ScriptExecuteAction,
    ScriptStopAction, UpdateComponentAction, WaitUntilAction, WhileAction,
};
pub use automation::{Automation, AutomationError, MAX_NESTING_DEPTH};
pub use condition::{
    check_all, AndCondition, Condition, LambdaCondition, OrCondition, RangeCondition,
};
pub use globals::{GlobalHandle, GlobalStore, GlobalVariable};
pub use script::Script;
pub use templatable::TemplatableValue;
pub use trigger::{IntervalTrigger, LoopTrigger, ShutdownTrigger, StartupTrigger, Trigger};
