//! Core contracts for hearth nodes
//!
//! This crate provides the pieces every other hearth crate builds on: the
//! [`Component`] lifecycle contract, the setup-priority constants used to
//! order startup, and the wrapping 32-bit monotonic clock the scheduler
//! measures time with.

pub mod clock;
pub mod component;

pub use clock::{deadline_reached, millis_since, ManualClock, MonotonicClock, SystemClock};
pub use component::{setup_priority, Component, PollingComponent};
