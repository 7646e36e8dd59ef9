//! Templatable parameter slots
//!
//! Action and condition parameters accept either a constant or a formula
//! over the event payload, so DSL authors can write `delay: 500` as easily
//! as `delay: |brightness| brightness * 10`. The tag is fixed at
//! construction and never changes.

use std::fmt;

/// A parameter slot holding either nothing, a fixed `T`, or a function
/// computing a `T` from the event payload `X`.
pub enum TemplatableValue<T, X = T> {
    /// Behaves as a default-constructed `T`.
    Empty,
    /// A fixed value.
    Static(T),
    /// Computed from the payload on every read.
    Computed(Box<dyn Fn(&X) -> T>),
}

impl<T, X> TemplatableValue<T, X> {
    /// Wrap a payload formula.
    pub fn from_fn(f: impl Fn(&X) -> T + 'static) -> Self {
        Self::Computed(Box::new(f))
    }

    pub fn has_value(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl<T: Clone + Default, X> TemplatableValue<T, X> {
    /// Resolve against the payload. Pure with respect to the payload and
    /// any state captured by a computed slot.
    pub fn value(&self, x: &X) -> T {
        match self {
            Self::Empty => T::default(),
            Self::Static(value) => value.clone(),
            Self::Computed(f) => f(x),
        }
    }
}

impl<T, X> Default for TemplatableValue<T, X> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<T, X> From<T> for TemplatableValue<T, X> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}

impl<T, X> fmt::Debug for TemplatableValue<T, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("TemplatableValue::Empty"),
            Self::Static(_) => f.write_str("TemplatableValue::Static(..)"),
            Self::Computed(_) => f.write_str("TemplatableValue::Computed(..)"),
        }
    }
}
