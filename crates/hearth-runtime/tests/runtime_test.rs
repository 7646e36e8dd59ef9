//! Runtime integration: polling components driven through the scheduler,
//! engine triggers riding the component lifecycle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hearth_automation::{
    Action, Automation, IntervalTrigger, LambdaAction, StartupTrigger, UpdateComponentAction,
};
use hearth_core::clock::ManualClock;
use hearth_core::component::{Component, PollingComponent};
use hearth_runtime::App;

struct FakeSensor {
    samples: Rc<Cell<u32>>,
    interval_ms: u32,
}

impl Component for FakeSensor {}

impl PollingComponent for FakeSensor {
    fn update(&mut self) {
        self.samples.set(self.samples.get() + 1);
    }

    fn update_interval(&self) -> u32 {
        self.interval_ms
    }
}

fn harness() -> (Rc<ManualClock>, App) {
    let clock = Rc::new(ManualClock::new(0));
    let app = App::new(clock.clone());
    (clock, app)
}

#[test]
fn polling_component_updates_on_its_period() {
    let (clock, mut app) = harness();
    let samples = Rc::new(Cell::new(0));
    app.register_polling(Rc::new(RefCell::new(FakeSensor {
        samples: samples.clone(),
        interval_ms: 100,
    })));
    app.setup();

    app.run_tick();
    assert_eq!(samples.get(), 0);

    clock.advance(100);
    app.run_tick();
    assert_eq!(samples.get(), 1);

    clock.advance(200);
    app.run_tick();
    app.run_tick();
    assert_eq!(samples.get(), 3);
}

#[test]
fn startup_trigger_fires_during_setup() {
    let (_clock, mut app) = harness();
    let startup = Rc::new(RefCell::new(StartupTrigger::new()));
    let automation = Automation::new(startup.borrow().trigger());

    let fired = Rc::new(Cell::new(0));
    let inner = fired.clone();
    automation
        .add_action(
            LambdaAction::new(move |_: &()| inner.set(inner.get() + 1)) as Rc<dyn Action<()>>
        )
        .unwrap();

    app.register(startup);
    assert_eq!(fired.get(), 0);
    app.setup();
    assert_eq!(fired.get(), 1);

    app.run_tick();
    assert_eq!(fired.get(), 1);
}

#[test]
fn interval_trigger_fires_on_period() {
    let (clock, mut app) = harness();
    let interval = Rc::new(RefCell::new(IntervalTrigger::new(50)));
    let automation = Automation::new(interval.borrow().trigger());

    let fired = Rc::new(Cell::new(0));
    let inner = fired.clone();
    automation
        .add_action(
            LambdaAction::new(move |_: &()| inner.set(inner.get() + 1)) as Rc<dyn Action<()>>
        )
        .unwrap();

    app.register_polling(interval);
    app.setup();

    clock.advance(49);
    app.run_tick();
    assert_eq!(fired.get(), 0);

    clock.advance(1);
    app.run_tick();
    assert_eq!(fired.get(), 1);

    clock.advance(50);
    app.run_tick();
    assert_eq!(fired.get(), 2);
}

#[test]
fn update_component_action_forces_an_update() {
    let (_clock, mut app) = harness();
    let samples = Rc::new(Cell::new(0));
    let sensor = Rc::new(RefCell::new(FakeSensor {
        samples: samples.clone(),
        interval_ms: 60_000,
    }));
    app.register_polling(sensor.clone());
    app.setup();

    let trigger: Rc<hearth_automation::Trigger<()>> = hearth_automation::Trigger::new();
    let automation = Automation::new(&trigger);
    automation
        .add_action(UpdateComponentAction::new(sensor) as Rc<dyn Action<()>>)
        .unwrap();

    app.run_tick();
    assert_eq!(samples.get(), 0);

    // Forced immediately, well before the 60 s period.
    trigger.trigger(());
    assert_eq!(samples.get(), 1);
}
