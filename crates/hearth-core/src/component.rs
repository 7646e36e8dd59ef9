//! Component lifecycle contract
//!
//! Every hardware or logic unit on a node is a [`Component`]: the runtime
//! calls `setup` once at boot (highest setup priority first) and `loop_tick`
//! on every pass of the cooperative loop. [`PollingComponent`] layers a
//! periodic `update` on top, which the runtime drives through the scheduler.

/// Setup ordering constants, highest first.
///
/// Values are plain floats so integrations can slot between the named
/// levels when they have to.
pub mod setup_priority {
    /// Communication buses (I2C, SPI, UART) other components read through.
    pub const BUS: f32 = 1000.0;

    /// Hardware peripherals and GPIO.
    pub const HARDWARE: f32 = 100.0;

    /// Data-producing components (sensors, filters).
    pub const DATA: f32 = 50.0;

    /// Default for components with no ordering needs.
    pub const DEFAULT: f32 = 0.0;

    /// After everything else has come up.
    pub const LATE: f32 = -10.0;
}

/// A unit with a startup and a per-tick entry point.
///
/// All methods default to no-ops so simple components only implement what
/// they use. Nothing here may block: a component that needs to wait
/// registers a scheduler callback and returns.
pub trait Component {
    /// Called once at boot, ordered by [`Component::setup_priority`].
    fn setup(&mut self) {}

    /// Called on every pass of the cooperative loop, in registration order.
    fn loop_tick(&mut self) {}

    /// Priority used only to order `setup` calls; higher runs earlier.
    fn setup_priority(&self) -> f32 {
        setup_priority::DEFAULT
    }

    /// Components flag themselves failed on unrecoverable errors (typically
    /// device communication); the runtime stops ticking them.
    fn is_failed(&self) -> bool {
        false
    }

    /// Called during the runtime's shutdown walk, reverse setup order.
    fn on_shutdown(&mut self, _reason: &'static str) {}
}

/// A [`Component`] additionally invoked on a fixed period.
///
/// The runtime registers a scheduler interval keyed by the component's
/// owner identity under the reserved name `"update"`.
pub trait PollingComponent: Component {
    /// Periodic work, e.g. sampling a sensor.
    fn update(&mut self);

    /// Period between `update` calls, in milliseconds.
    fn update_interval(&self) -> u32;
}
