//! Condition types
//!
//! Conditions are boolean predicates over an event payload, composed into
//! trees at startup. Evaluation order is the order children were added;
//! And/Or short-circuit, which matters when a child predicate is
//! side-effecting or expensive.

use std::rc::Rc;

use crate::templatable::TemplatableValue;

/// A boolean predicate over an event payload.
pub trait Condition<T> {
    fn check(&self, x: &T) -> bool;
}

/// Conjunction over a slice of conditions; true when the slice is empty.
///
/// Shared by everything that gates on "all conditions pass": Automation,
/// If, While, WaitUntil.
pub fn check_all<T>(conditions: &[Rc<dyn Condition<T>>], x: &T) -> bool {
    conditions.iter().all(|c| c.check(x))
}

/// True iff all children are true; stops at the first false child.
pub struct AndCondition<T> {
    conditions: Vec<Rc<dyn Condition<T>>>,
}

impl<T> AndCondition<T> {
    pub fn new(conditions: Vec<Rc<dyn Condition<T>>>) -> Rc<Self> {
        Rc::new(Self { conditions })
    }
}

impl<T> Condition<T> for AndCondition<T> {
    fn check(&self, x: &T) -> bool {
        self.conditions.iter().all(|c| c.check(x))
    }
}

/// True iff any child is true; stops at the first true child.
pub struct OrCondition<T> {
    conditions: Vec<Rc<dyn Condition<T>>>,
}

impl<T> OrCondition<T> {
    pub fn new(conditions: Vec<Rc<dyn Condition<T>>>) -> Rc<Self> {
        Rc::new(Self { conditions })
    }
}

impl<T> Condition<T> for OrCondition<T> {
    fn check(&self, x: &T) -> bool {
        self.conditions.iter().any(|c| c.check(x))
    }
}

/// Delegates to a user-supplied predicate.
pub struct LambdaCondition<T> {
    f: Box<dyn Fn(&T) -> bool>,
}

impl<T> LambdaCondition<T> {
    pub fn new(f: impl Fn(&T) -> bool + 'static) -> Rc<Self> {
        Rc::new(Self { f: Box::new(f) })
    }
}

impl<T> Condition<T> for LambdaCondition<T> {
    fn check(&self, x: &T) -> bool {
        (self.f)(x)
    }
}

/// Numeric range test over a float payload: `min <= x <= max`.
///
/// Bounds are templatable and re-resolved on every check; a bound that
/// resolves to NaN leaves that side unbounded. Both bounds default to NaN.
pub struct RangeCondition {
    min: TemplatableValue<f32, f32>,
    max: TemplatableValue<f32, f32>,
}

impl RangeCondition {
    pub fn new() -> Self {
        Self {
            min: TemplatableValue::Static(f32::NAN),
            max: TemplatableValue::Static(f32::NAN),
        }
    }

    pub fn with_min(mut self, min: impl Into<TemplatableValue<f32, f32>>) -> Self {
        self.min = min.into();
        self
    }

    pub fn with_max(mut self, max: impl Into<TemplatableValue<f32, f32>>) -> Self {
        self.max = max.into();
        self
    }
}

impl Default for RangeCondition {
    fn default() -> Self {
        Self::new()
    }
}

impl Condition<f32> for RangeCondition {
    fn check(&self, x: &f32) -> bool {
        let min = self.min.value(x);
        if !min.is_nan() && *x < min {
            return false;
        }
        let max = self.max.value(x);
        if !max.is_nan() && *x > max {
            return false;
        }
        true
    }
}
