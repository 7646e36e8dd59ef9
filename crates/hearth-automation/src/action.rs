//! Action pipelines
//!
//! An [`ActionList`] is a singly-linked chain of [`Action`] nodes executed
//! against an event payload. Playing a list invokes only the head;
//! propagation down the chain is each node's own responsibility through its
//! [`NextLink`], which is what lets suspending actions (delay, wait-until)
//! hand control back to the loop and resume from a scheduler callback.
//!
//! Every node's `stop` is a safe no-op when the node is idle, so
//! [`ActionList::stop`] simply stops every node unconditionally.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hearth_core::component::PollingComponent;
use hearth_scheduler::{OwnerId, Scheduler};
use tracing::trace;

use crate::condition::{check_all, Condition};
use crate::script::Script;
use crate::templatable::TemplatableValue;

/// Scheduler entry name used by [`DelayAction`].
const DELAY_NAME: &str = "delay";
/// Scheduler entry name used by [`WaitUntilAction`] for per-tick polling.
const WAIT_UNTIL_NAME: &str = "wait_until";

/// One step in a possibly-suspending pipeline.
///
/// `play` transitions idle → running (or waiting, for suspending actions)
/// and must eventually hand off through `self.link().play_next(..)` —
/// synchronously or from a scheduled callback — or go quiet if it
/// represents a terminal abort.
pub trait Action<T: Clone + 'static> {
    /// Execute this step against the payload.
    fn play(self: Rc<Self>, x: T);

    /// Cancel any suspended work so no already-scheduled callback has an
    /// effect. Must be a safe no-op when idle.
    fn stop(&self) {}

    /// Link to the following node in the enclosing list.
    fn link(&self) -> &NextLink<T>;

    /// Structural nesting depth; leaf actions are 1, branching actions add
    /// the depth of their deepest child list.
    fn depth(&self) -> usize {
        1
    }
}

/// Non-owning forward link between chain nodes.
///
/// Set once by the enclosing [`ActionList`] when the following node is
/// appended; the chain itself is owned by the list.
pub struct NextLink<T: Clone + 'static> {
    next: RefCell<Option<Rc<dyn Action<T>>>>,
}

impl<T: Clone + 'static> NextLink<T> {
    pub fn new() -> Self {
        Self {
            next: RefCell::new(None),
        }
    }

    /// Hand the payload to the following node, if any.
    pub fn play_next(&self, x: T) {
        let next = self.next.borrow().clone();
        if let Some(next) = next {
            next.play(x);
        }
    }

    /// Stop every node downstream of this link.
    pub fn stop_next(&self) {
        let mut current = self.next.borrow().clone();
        while let Some(node) = current {
            node.stop();
            current = node.link().next.borrow().clone();
        }
    }

    fn set(&self, next: Rc<dyn Action<T>>) {
        *self.next.borrow_mut() = Some(next);
    }

    fn get(&self) -> Option<Rc<dyn Action<T>>> {
        self.next.borrow().clone()
    }
}

impl<T: Clone + 'static> Default for NextLink<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered chain of actions with unified play/stop control.
pub struct ActionList<T: Clone + 'static> {
    head: RefCell<Option<Rc<dyn Action<T>>>>,
    tail: RefCell<Option<Rc<dyn Action<T>>>>,
}

impl<T: Clone + 'static> ActionList<T> {
    pub fn new() -> Self {
        Self {
            head: RefCell::new(None),
            tail: RefCell::new(None),
        }
    }

    /// Append an action to the end of the chain.
    pub fn add_action(&self, action: Rc<dyn Action<T>>) {
        match self.tail.borrow_mut().replace(action.clone()) {
            Some(previous_tail) => previous_tail.link().set(action),
            None => *self.head.borrow_mut() = Some(action),
        }
    }

    pub fn add_actions(&self, actions: Vec<Rc<dyn Action<T>>>) {
        for action in actions {
            self.add_action(action);
        }
    }

    /// Invoke the head node. Playing an empty list is a no-op success.
    pub fn play(&self, x: T) {
        let head = self.head.borrow().clone();
        if let Some(head) = head {
            head.play(x);
        }
    }

    /// Stop every node in the list, running or not.
    pub fn stop(&self) {
        let head = self.head.borrow().clone();
        if let Some(head) = head {
            head.stop();
            head.link().stop_next();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.borrow().is_none()
    }

    /// Deepest nesting among the chain's nodes; 0 for an empty list.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut current = self.head.borrow().clone();
        while let Some(node) = current {
            deepest = deepest.max(node.depth());
            current = node.link().get();
        }
        deepest
    }
}

impl<T: Clone + 'static> Default for ActionList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Suspends the chain for a templatable number of milliseconds.
pub struct DelayAction<T: Clone + 'static> {
    link: NextLink<T>,
    delay: TemplatableValue<u32, T>,
    scheduler: Rc<Scheduler>,
    owner: OwnerId,
}

impl<T: Clone + 'static> DelayAction<T> {
    pub fn new(scheduler: &Rc<Scheduler>, delay: impl Into<TemplatableValue<u32, T>>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            delay: delay.into(),
            scheduler: scheduler.clone(),
            owner: scheduler.allocate_owner(),
        })
    }
}

impl<T: Clone + 'static> Action<T> for DelayAction<T> {
    fn play(self: Rc<Self>, x: T) {
        let delay_ms = self.delay.value(&x);
        trace!(delay_ms, "delay action suspending");
        let this = Rc::downgrade(&self);
        self.scheduler
            .set_timeout(self.owner, DELAY_NAME, delay_ms, move || {
                if let Some(action) = this.upgrade() {
                    action.link.play_next(x.clone());
                }
            });
    }

    fn stop(&self) {
        self.scheduler.cancel_timeout(self.owner, DELAY_NAME);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

/// Synchronously invokes a user closure, then continues the chain.
pub struct LambdaAction<T: Clone + 'static> {
    link: NextLink<T>,
    f: Box<dyn Fn(&T)>,
}

impl<T: Clone + 'static> LambdaAction<T> {
    pub fn new(f: impl Fn(&T) + 'static) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            f: Box::new(f),
        })
    }
}

impl<T: Clone + 'static> Action<T> for LambdaAction<T> {
    fn play(self: Rc<Self>, x: T) {
        (self.f)(&x);
        self.link.play_next(x);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

/// Conditional branch: plays the `then` list when the condition
/// conjunction passes, the `else` list otherwise. Either branch's
/// completion continues the outer chain.
pub struct IfAction<T: Clone + 'static> {
    link: NextLink<T>,
    conditions: Vec<Rc<dyn Condition<T>>>,
    then_list: ActionList<T>,
    else_list: ActionList<T>,
}

impl<T: Clone + 'static> IfAction<T> {
    pub fn new(conditions: Vec<Rc<dyn Condition<T>>>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            conditions,
            then_list: ActionList::new(),
            else_list: ActionList::new(),
        })
    }

    /// Append the `then` branch. The branch gets a trailing continuation
    /// that resumes the outer chain when it finishes.
    pub fn add_then(self: &Rc<Self>, actions: Vec<Rc<dyn Action<T>>>) {
        self.then_list.add_actions(actions);
        let this = Rc::downgrade(self);
        self.then_list.add_action(LambdaAction::new(move |x: &T| {
            if let Some(action) = this.upgrade() {
                action.link.play_next(x.clone());
            }
        }));
    }

    /// Append the `else` branch, with the same trailing continuation.
    pub fn add_else(self: &Rc<Self>, actions: Vec<Rc<dyn Action<T>>>) {
        self.else_list.add_actions(actions);
        let this = Rc::downgrade(self);
        self.else_list.add_action(LambdaAction::new(move |x: &T| {
            if let Some(action) = this.upgrade() {
                action.link.play_next(x.clone());
            }
        }));
    }
}

impl<T: Clone + 'static> Action<T> for IfAction<T> {
    fn play(self: Rc<Self>, x: T) {
        if check_all(&self.conditions, &x) {
            if self.then_list.is_empty() {
                self.link.play_next(x);
            } else {
                self.then_list.play(x);
            }
        } else if self.else_list.is_empty() {
            self.link.play_next(x);
        } else {
            self.else_list.play(x);
        }
    }

    fn stop(&self) {
        self.then_list.stop();
        self.else_list.stop();
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }

    fn depth(&self) -> usize {
        1 + self.then_list.depth().max(self.else_list.depth())
    }
}

/// Loop: re-evaluates the condition conjunction before each body pass and
/// once more after each full pass; loops are re-plays of the body list,
/// never graph cycles.
pub struct WhileAction<T: Clone + 'static> {
    link: NextLink<T>,
    conditions: Vec<Rc<dyn Condition<T>>>,
    body: ActionList<T>,
    running: Cell<bool>,
}

impl<T: Clone + 'static> WhileAction<T> {
    pub fn new(conditions: Vec<Rc<dyn Condition<T>>>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            conditions,
            body: ActionList::new(),
            running: Cell::new(false),
        })
    }

    /// Append the loop body. The trailing continuation re-checks the
    /// condition once per full body pass: on pass it re-plays the body, on
    /// fail it resumes the outer chain.
    pub fn add_body(self: &Rc<Self>, actions: Vec<Rc<dyn Action<T>>>) {
        self.body.add_actions(actions);
        let this = Rc::downgrade(self);
        self.body.add_action(LambdaAction::new(move |x: &T| {
            let Some(action) = this.upgrade() else {
                return;
            };
            // A stop() mid-body cleared the flag; the loop must not resume.
            if !action.running.get() {
                return;
            }
            if check_all(&action.conditions, x) {
                action.body.play(x.clone());
            } else {
                action.running.set(false);
                action.link.play_next(x.clone());
            }
        }));
    }
}

impl<T: Clone + 'static> Action<T> for WhileAction<T> {
    fn play(self: Rc<Self>, x: T) {
        if !check_all(&self.conditions, &x) {
            self.link.play_next(x);
            return;
        }
        if self.body.is_empty() {
            self.link.play_next(x);
            return;
        }
        self.running.set(true);
        self.body.play(x);
    }

    fn stop(&self) {
        self.running.set(false);
        self.body.stop();
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }

    fn depth(&self) -> usize {
        1 + self.body.depth()
    }
}

/// Parks the chain until the condition conjunction holds, polling once per
/// loop tick against the payload captured at play time.
pub struct WaitUntilAction<T: Clone + 'static> {
    link: NextLink<T>,
    conditions: Vec<Rc<dyn Condition<T>>>,
    scheduler: Rc<Scheduler>,
    owner: OwnerId,
    pending: RefCell<Option<T>>,
}

impl<T: Clone + 'static> WaitUntilAction<T> {
    pub fn new(scheduler: &Rc<Scheduler>, conditions: Vec<Rc<dyn Condition<T>>>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            conditions,
            scheduler: scheduler.clone(),
            owner: scheduler.allocate_owner(),
            pending: RefCell::new(None),
        })
    }
}

impl<T: Clone + 'static> Action<T> for WaitUntilAction<T> {
    fn play(self: Rc<Self>, x: T) {
        if check_all(&self.conditions, &x) {
            self.link.play_next(x);
            return;
        }
        trace!("wait_until action suspending");
        *self.pending.borrow_mut() = Some(x);
        let this = Rc::downgrade(&self);
        self.scheduler
            .set_interval(self.owner, WAIT_UNTIL_NAME, 0, move || {
                let Some(action) = this.upgrade() else {
                    return;
                };
                let satisfied = match action.pending.borrow().as_ref() {
                    Some(x) => check_all(&action.conditions, x),
                    None => false,
                };
                if satisfied {
                    action.scheduler.cancel_interval(action.owner, WAIT_UNTIL_NAME);
                    let x = action.pending.borrow_mut().take();
                    if let Some(x) = x {
                        action.link.play_next(x);
                    }
                }
            });
    }

    fn stop(&self) {
        self.pending.borrow_mut().take();
        self.scheduler.cancel_interval(self.owner, WAIT_UNTIL_NAME);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

/// Forces a polling component's `update()` to run immediately.
pub struct UpdateComponentAction<T: Clone + 'static> {
    link: NextLink<T>,
    component: Rc<RefCell<dyn PollingComponent>>,
}

impl<T: Clone + 'static> UpdateComponentAction<T> {
    pub fn new(component: Rc<RefCell<dyn PollingComponent>>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            component,
        })
    }
}

impl<T: Clone + 'static> Action<T> for UpdateComponentAction<T> {
    fn play(self: Rc<Self>, x: T) {
        self.component.borrow_mut().update();
        self.link.play_next(x);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

/// Starts the bound script, then continues the chain.
pub struct ScriptExecuteAction<T: Clone + 'static> {
    link: NextLink<T>,
    script: Rc<Script>,
}

impl<T: Clone + 'static> ScriptExecuteAction<T> {
    pub fn new(script: Rc<Script>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            script,
        })
    }
}

impl<T: Clone + 'static> Action<T> for ScriptExecuteAction<T> {
    fn play(self: Rc<Self>, x: T) {
        self.script.execute();
        self.link.play_next(x);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

/// Halts any in-flight run of the bound script, then continues the chain.
pub struct ScriptStopAction<T: Clone + 'static> {
    link: NextLink<T>,
    script: Rc<Script>,
}

impl<T: Clone + 'static> ScriptStopAction<T> {
    pub fn new(script: Rc<Script>) -> Rc<Self> {
        Rc::new(Self {
            link: NextLink::new(),
            script,
        })
    }
}

impl<T: Clone + 'static> Action<T> for ScriptStopAction<T> {
    fn play(self: Rc<Self>, x: T) {
        self.script.stop();
        self.link.play_next(x);
    }

    fn link(&self) -> &NextLink<T> {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::LambdaCondition;
    use hearth_core::clock::ManualClock;

    fn harness() -> (Rc<ManualClock>, Rc<Scheduler>) {
        let clock = Rc::new(ManualClock::new(0));
        let scheduler = Scheduler::new(clock.clone());
        (clock, scheduler)
    }

    fn recorder<T: Clone + 'static>() -> (Rc<RefCell<Vec<T>>>, Rc<LambdaAction<T>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let inner = seen.clone();
        let action = LambdaAction::new(move |x: &T| inner.borrow_mut().push(x.clone()));
        (seen, action)
    }

    #[test]
    fn test_empty_list_plays_as_noop() {
        let list: ActionList<u32> = ActionList::new();
        assert!(list.is_empty());
        list.play(1);
        list.stop();
    }

    #[test]
    fn test_chain_executes_in_link_order() {
        let list: ActionList<u32> = ActionList::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            list.add_action(LambdaAction::new(move |_: &u32| {
                order.borrow_mut().push(tag)
            }));
        }

        list.play(0);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_delay_suspends_then_resumes() {
        let (clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        list.add_action(DelayAction::new(&scheduler, 50u32));
        list.add_action(record);

        list.play(7);
        assert!(seen.borrow().is_empty());

        clock.advance(49);
        scheduler.run_pending();
        assert!(seen.borrow().is_empty());

        clock.advance(1);
        scheduler.run_pending();
        assert_eq!(*seen.borrow(), vec![7]);

        clock.advance(1000);
        scheduler.run_pending();
        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn test_delay_stop_prevents_resume() {
        let (clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        list.add_action(DelayAction::new(&scheduler, 50u32));
        list.add_action(record);

        list.play(7);
        clock.advance(20);
        list.stop();

        clock.advance(1000);
        scheduler.run_pending();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_delay_resolves_templated_duration_from_payload() {
        let (clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        list.add_action(DelayAction::new(
            &scheduler,
            TemplatableValue::from_fn(|x: &u32| x * 10),
        ));
        list.add_action(record);

        list.play(3); // 30 ms
        clock.advance(29);
        scheduler.run_pending();
        assert!(seen.borrow().is_empty());
        clock.advance(1);
        scheduler.run_pending();
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn test_if_picks_then_branch_and_continues_chain() {
        let list: ActionList<i32> = ActionList::new();
        let (then_seen, then_record) = recorder();
        let (else_seen, else_record) = recorder();
        let (after_seen, after_record) = recorder();

        let branch = IfAction::new(vec![LambdaCondition::new(|x: &i32| *x > 0)]);
        branch.add_then(vec![then_record as Rc<dyn Action<i32>>]);
        branch.add_else(vec![else_record as Rc<dyn Action<i32>>]);
        list.add_action(branch);
        list.add_action(after_record);

        list.play(5);
        assert_eq!(*then_seen.borrow(), vec![5]);
        assert!(else_seen.borrow().is_empty());
        assert_eq!(*after_seen.borrow(), vec![5]);

        list.play(-5);
        assert_eq!(*else_seen.borrow(), vec![-5]);
        assert_eq!(*after_seen.borrow(), vec![5, -5]);
    }

    #[test]
    fn test_if_without_else_continues_chain() {
        let list: ActionList<i32> = ActionList::new();
        let (after_seen, after_record) = recorder();

        let branch = IfAction::new(vec![LambdaCondition::new(|x: &i32| *x > 0)]);
        list.add_action(branch);
        list.add_action(after_record);

        list.play(-1);
        assert_eq!(*after_seen.borrow(), vec![-1]);
    }

    #[test]
    fn test_while_false_initially_skips_body() {
        let list: ActionList<()> = ActionList::new();
        let (body_seen, body_record) = recorder();
        let (after_seen, after_record) = recorder();

        let looped = WhileAction::new(vec![LambdaCondition::new(|_: &()| false)]);
        looped.add_body(vec![body_record as Rc<dyn Action<()>>]);
        list.add_action(looped);
        list.add_action(after_record);

        list.play(());
        assert!(body_seen.borrow().is_empty());
        assert_eq!(after_seen.borrow().len(), 1);
    }

    #[test]
    fn test_while_plays_body_once_per_passing_check() {
        let list: ActionList<()> = ActionList::new();
        let (body_seen, body_record) = recorder();
        let (after_seen, after_record) = recorder();

        // Condition true for the first 3 checks.
        let remaining = Rc::new(Cell::new(3u32));
        let gate = LambdaCondition::new(move |_: &()| {
            if remaining.get() > 0 {
                remaining.set(remaining.get() - 1);
                true
            } else {
                false
            }
        });

        let looped = WhileAction::new(vec![gate]);
        looped.add_body(vec![body_record as Rc<dyn Action<()>>]);
        list.add_action(looped);
        list.add_action(after_record);

        list.play(());
        assert_eq!(body_seen.borrow().len(), 3);
        assert_eq!(after_seen.borrow().len(), 1);
    }

    #[test]
    fn test_while_stop_mid_body_does_not_resume() {
        let (clock, scheduler) = harness();
        let list: ActionList<()> = ActionList::new();
        let (body_seen, body_record) = recorder();
        let (after_seen, after_record) = recorder();

        // Body suspends on a delay each pass, so stop() can land mid-body.
        let looped = WhileAction::new(vec![LambdaCondition::new(|_: &()| true)]);
        looped.add_body(vec![
            body_record as Rc<dyn Action<()>>,
            DelayAction::new(&scheduler, 10u32) as Rc<dyn Action<()>>,
        ]);
        list.add_action(looped.clone());
        list.add_action(after_record);

        list.play(());
        assert_eq!(body_seen.borrow().len(), 1);

        list.stop();
        clock.advance(1000);
        scheduler.run_pending();
        scheduler.run_pending();
        assert_eq!(body_seen.borrow().len(), 1);
        assert!(after_seen.borrow().is_empty());
    }

    #[test]
    fn test_wait_until_passes_immediately_when_satisfied() {
        let (_clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        list.add_action(WaitUntilAction::new(
            &scheduler,
            vec![LambdaCondition::new(|_: &u32| true)],
        ));
        list.add_action(record);

        list.play(1);
        assert_eq!(*seen.borrow(), vec![1]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_wait_until_polls_stored_payload_each_tick() {
        let (_clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        let ready = Rc::new(Cell::new(false));
        let gate = ready.clone();
        list.add_action(WaitUntilAction::new(
            &scheduler,
            vec![LambdaCondition::new(move |_: &u32| gate.get())],
        ));
        list.add_action(record);

        list.play(9);
        scheduler.run_pending();
        scheduler.run_pending();
        assert!(seen.borrow().is_empty());

        ready.set(true);
        scheduler.run_pending();
        assert_eq!(*seen.borrow(), vec![9]);
        // Deregistered after firing.
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_wait_until_never_satisfied_survives_many_ticks() {
        let (_clock, scheduler) = harness();
        let list: ActionList<()> = ActionList::new();
        let (seen, record) = recorder();

        let wait = WaitUntilAction::new(&scheduler, vec![LambdaCondition::new(|_: &()| false)]);
        list.add_action(wait.clone());
        list.add_action(record);

        list.play(());
        for _ in 0..10_000 {
            scheduler.run_pending();
        }
        assert!(seen.borrow().is_empty());
        assert_eq!(scheduler.pending(), 1);

        list.stop();
        assert_eq!(scheduler.pending(), 0);
        for _ in 0..100 {
            scheduler.run_pending();
        }
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_wait_until_satisfied_after_very_long_wait() {
        let (clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        let (seen, record) = recorder();

        let ready = Rc::new(Cell::new(false));
        let gate = ready.clone();
        list.add_action(WaitUntilAction::new(
            &scheduler,
            vec![LambdaCondition::new(move |_: &u32| gate.get())],
        ));
        list.add_action(record);

        list.play(9);
        // Wait out more than half the counter range, polling as the loop
        // would; the suspension must still be live afterwards.
        for _ in 0..3 {
            clock.advance(u32::MAX / 4);
            scheduler.run_pending();
        }
        assert!(seen.borrow().is_empty());

        ready.set(true);
        scheduler.run_pending();
        assert_eq!(*seen.borrow(), vec![9]);
    }

    #[test]
    fn test_stop_is_safe_when_idle() {
        let (_clock, scheduler) = harness();
        let list: ActionList<u32> = ActionList::new();
        list.add_action(DelayAction::new(&scheduler, 10u32));
        list.add_action(WaitUntilAction::new(
            &scheduler,
            vec![LambdaCondition::new(|_: &u32| false)],
        ));

        // Nothing played yet.
        list.stop();
        list.stop();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_depth_counts_nesting_not_chain_length() {
        let (_clock, scheduler) = harness();
        let list: ActionList<()> = ActionList::new();
        for _ in 0..5 {
            list.add_action(DelayAction::new(&scheduler, 1u32));
        }
        assert_eq!(list.depth(), 1);

        let inner = IfAction::new(vec![LambdaCondition::new(|_: &()| true)]);
        inner.add_then(vec![LambdaAction::new(|_: &()| {}) as Rc<dyn Action<()>>]);
        let outer = WhileAction::new(vec![LambdaCondition::new(|_: &()| false)]);
        outer.add_body(vec![inner as Rc<dyn Action<()>>]);
        list.add_action(outer);
        assert_eq!(list.depth(), 3);
    }
}
