//! Demo node on a simulated clock: a fake temperature sensor polled every
//! second, a range-gated automation that reacts to warm readings with a
//! delayed notification, and a startup script.
//!
//! Run with `RUST_LOG=debug cargo run -p hearth-sim` to watch the engine.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hearth_automation::{
    Action, Automation, DelayAction, LambdaAction, RangeCondition, Script, ScriptExecuteAction,
    StartupTrigger, Trigger,
};
use hearth_core::clock::ManualClock;
use hearth_core::component::{setup_priority, Component, PollingComponent};
use hearth_runtime::App;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sensor producing a slow temperature ramp and firing a trigger with each
/// reading, the way a real driver hands readings to its filter chain.
struct RampSensor {
    reading: Cell<f32>,
    on_value: Rc<Trigger<f32>>,
}

impl RampSensor {
    fn new() -> Self {
        Self {
            reading: Cell::new(15.0),
            on_value: Trigger::new(),
        }
    }
}

impl Component for RampSensor {
    fn setup(&mut self) {
        info!("ramp sensor ready");
    }

    fn setup_priority(&self) -> f32 {
        setup_priority::DATA
    }
}

impl PollingComponent for RampSensor {
    fn update(&mut self) {
        let value = self.reading.get() + 1.5;
        self.reading.set(value);
        info!(value, "sensor reading");
        self.on_value.trigger(value);
    }

    fn update_interval(&self) -> u32 {
        1000
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let clock = Rc::new(ManualClock::new(0));
    let mut app = App::new(clock.clone());
    let scheduler = app.scheduler().clone();

    // Startup banner through a script, kicked off by a startup trigger.
    let banner = Script::new();
    let banner_automation = Automation::new(banner.trigger());
    banner_automation
        .add_action(
            LambdaAction::new(|_: &()| info!("node is up")) as Rc<dyn Action<()>>
        )
        .expect("banner script graph");

    let startup = Rc::new(RefCell::new(StartupTrigger::new()));
    let startup_automation = Automation::new(startup.borrow().trigger());
    startup_automation
        .add_action(ScriptExecuteAction::new(banner.clone()) as Rc<dyn Action<()>>)
        .expect("startup graph");
    app.register(startup);

    // Warm-reading automation: gate on 20..=30 °C, wait half a second,
    // then report.
    let sensor = Rc::new(RefCell::new(RampSensor::new()));
    let on_value = sensor.borrow().on_value.clone();
    let warm = Automation::new(&on_value);
    warm.add_condition(Rc::new(RangeCondition::new().with_min(20.0).with_max(30.0)));
    warm.add_actions(vec![
        DelayAction::new(&scheduler, 500u32) as Rc<dyn Action<f32>>,
        LambdaAction::new(|value: &f32| info!(value = *value, "warm reading confirmed"))
            as Rc<dyn Action<f32>>,
    ])
    .expect("warm automation graph");
    app.register_polling(sensor);

    app.setup();

    // Simulate 15 seconds of node time, 10 ms per tick.
    for _ in 0..1500 {
        clock.advance(10);
        app.run_tick();
    }

    app.shutdown("simulation complete");
}
