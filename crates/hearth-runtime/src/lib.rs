//! Runtime root for hearth nodes
//!
//! [`App`] owns the component registry and the process-wide scheduler. It
//! calls `setup()` on every component once (highest setup priority first),
//! then repeatedly ticks: `loop_tick()` on every non-failed component in
//! registration order, followed by one scheduler pass. Anything inside the
//! tick may fire triggers; suspending work always goes through the
//! scheduler, never blocks.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::Duration;

use hearth_core::clock::{MonotonicClock, SystemClock};
use hearth_core::component::{Component, PollingComponent};
use hearth_scheduler::{OwnerId, Scheduler};
use tracing::{debug, info, warn};

/// Reserved scheduler entry name for polling-component updates.
const UPDATE_NAME: &str = "update";

struct Slot {
    component: Rc<RefCell<dyn Component>>,
    owner: OwnerId,
    priority: f32,
}

/// The runtime root.
pub struct App {
    scheduler: Rc<Scheduler>,
    components: Vec<Slot>,
}

impl App {
    pub fn new(clock: Rc<dyn MonotonicClock>) -> Self {
        Self {
            scheduler: Scheduler::new(clock),
            components: Vec::new(),
        }
    }

    /// Host-side convenience: an `App` on the instant-backed clock.
    pub fn with_system_clock() -> Self {
        Self::new(Rc::new(SystemClock::new()))
    }

    /// The process-wide scheduler, shared with actions and drivers.
    pub fn scheduler(&self) -> &Rc<Scheduler> {
        &self.scheduler
    }

    /// Register a component; returns the owner identity scoping its
    /// scheduler entries.
    pub fn register<C: Component + 'static>(&mut self, component: Rc<RefCell<C>>) -> OwnerId {
        let owner = self.scheduler.allocate_owner();
        let priority = component.borrow().setup_priority();
        self.components.push(Slot {
            component,
            owner,
            priority,
        });
        owner
    }

    /// Register a polling component and arm its periodic `update()` under
    /// the reserved `"update"` name.
    pub fn register_polling<C: PollingComponent + 'static>(
        &mut self,
        component: Rc<RefCell<C>>,
    ) -> OwnerId {
        let owner = self.register(component.clone());
        let interval = component.borrow().update_interval();
        let weak = Rc::downgrade(&component);
        self.scheduler
            .set_interval(owner, UPDATE_NAME, interval, move || {
                if let Some(component) = weak.upgrade() {
                    let mut component = component.borrow_mut();
                    if !component.is_failed() {
                        component.update();
                    }
                }
            });
        owner
    }

    /// Run every component's `setup()` once, highest priority first.
    /// Registration order breaks ties.
    pub fn setup(&mut self) {
        self.components.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(Ordering::Equal)
        });
        info!(components = self.components.len(), "setting up components");
        for slot in &self.components {
            debug!(owner = ?slot.owner, priority = slot.priority, "component setup");
            slot.component.borrow_mut().setup();
        }
    }

    /// One pass of the cooperative loop.
    pub fn run_tick(&mut self) {
        for slot in &self.components {
            let mut component = slot.component.borrow_mut();
            if !component.is_failed() {
                component.loop_tick();
            }
        }
        self.scheduler.run_pending();
    }

    /// Host-side loop: tick forever with a short sleep. Firmware targets
    /// call [`App::run_tick`] from their own main loop instead.
    pub fn run(&mut self) -> ! {
        loop {
            self.run_tick();
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    /// Walk components in reverse setup order, handing each the reason.
    pub fn shutdown(&mut self, reason: &'static str) {
        warn!(reason, "shutting down");
        for slot in self.components.iter().rev() {
            slot.component.borrow_mut().on_shutdown(reason);
        }
    }
}
