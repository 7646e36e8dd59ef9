//! Cooperative scheduler
//!
//! The scheduler is the one process-wide facility for waiting without
//! blocking the loop: one-shot timeouts, repeating intervals, and deferred
//! calls, all keyed by (owner, name) so unrelated components share it
//! without colliding. The runtime root advances it once per loop tick via
//! [`Scheduler::run_pending`].
//!
//! Re-registering a name cancels and replaces the previous entry, which is
//! what lets device drivers implement debounce by re-arming a timeout on
//! every edge. Intervals re-arm from the previous *scheduled* due time, not
//! the actual fire time, so long-running intervals do not accumulate skew.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hearth_core::clock::{deadline_reached, millis_since, MonotonicClock};
use indexmap::IndexMap;
use tracing::{trace, warn};

/// Identity of the component or action that owns a set of entries.
///
/// Handed out by [`Scheduler::allocate_owner`]; names are only unique
/// within one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntryKind {
    Timeout,
    Interval,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum EntryKey {
    Named {
        owner: OwnerId,
        kind: EntryKind,
        name: String,
    },
    /// Anonymous defer; never de-duplicated.
    Anon(u64),
}

type Callback = Box<dyn FnMut()>;

struct Entry {
    key: EntryKey,
    due: Cell<u32>,
    /// `Some` makes this a repeating interval with the given period.
    period: Option<u32>,
    callback: RefCell<Callback>,
    cancelled: Cell<bool>,
}

/// Process-wide cooperative scheduler.
///
/// Strictly single-threaded; callbacks run to completion on the loop thread
/// and are fire-and-forget — there is no retry and no error channel.
pub struct Scheduler {
    clock: Rc<dyn MonotonicClock>,
    entries: RefCell<IndexMap<EntryKey, Rc<Entry>>>,
    next_owner: Cell<u64>,
    next_anon: Cell<u64>,
}

impl Scheduler {
    pub fn new(clock: Rc<dyn MonotonicClock>) -> Rc<Self> {
        Rc::new(Self {
            clock,
            entries: RefCell::new(IndexMap::new()),
            next_owner: Cell::new(1),
            next_anon: Cell::new(1),
        })
    }

    /// Hand out a fresh owner identity.
    pub fn allocate_owner(&self) -> OwnerId {
        let id = self.next_owner.get();
        self.next_owner.set(id + 1);
        OwnerId(id)
    }

    /// Current clock reading in milliseconds.
    pub fn now(&self) -> u32 {
        self.clock.millis()
    }

    /// Register a one-shot callback due `delay_ms` from now.
    ///
    /// An existing timeout with the same (owner, name) is cancelled and
    /// replaced; returns whether that happened. A delay of 0 fires on the
    /// next tick, never synchronously.
    pub fn set_timeout(
        &self,
        owner: OwnerId,
        name: &str,
        delay_ms: u32,
        callback: impl FnMut() + 'static,
    ) -> bool {
        let key = EntryKey::Named {
            owner,
            kind: EntryKind::Timeout,
            name: name.to_owned(),
        };
        trace!(?owner, name, delay_ms, "set_timeout");
        self.insert(key, delay_ms, None, Box::new(callback))
    }

    /// Register a repeating callback; first fire after `period_ms`, then
    /// every `period_ms`, re-armed from the previous scheduled due time.
    ///
    /// An existing interval with the same (owner, name) is cancelled and
    /// replaced; returns whether that happened.
    pub fn set_interval(
        &self,
        owner: OwnerId,
        name: &str,
        period_ms: u32,
        callback: impl FnMut() + 'static,
    ) -> bool {
        let key = EntryKey::Named {
            owner,
            kind: EntryKind::Interval,
            name: name.to_owned(),
        };
        trace!(?owner, name, period_ms, "set_interval");
        self.insert(key, period_ms, Some(period_ms), Box::new(callback))
    }

    /// Register a callback for the next tick.
    ///
    /// With a name this is exactly `set_timeout(owner, name, 0, ..)`,
    /// including the de-duplication; without one the entry is anonymous and
    /// never replaces anything. Used to break synchronous re-entrancy, e.g.
    /// publishing a new state from inside a state-change callback.
    pub fn defer(&self, owner: OwnerId, name: Option<&str>, callback: impl FnMut() + 'static) {
        match name {
            Some(name) => {
                self.set_timeout(owner, name, 0, callback);
            }
            None => {
                let id = self.next_anon.get();
                self.next_anon.set(id + 1);
                self.insert(EntryKey::Anon(id), 0, None, Box::new(callback));
            }
        }
    }

    /// Cancel a pending timeout. Idempotent; returns whether one existed.
    pub fn cancel_timeout(&self, owner: OwnerId, name: &str) -> bool {
        self.cancel(&EntryKey::Named {
            owner,
            kind: EntryKind::Timeout,
            name: name.to_owned(),
        })
    }

    /// Cancel a pending interval. Idempotent; returns whether one existed.
    pub fn cancel_interval(&self, owner: OwnerId, name: &str) -> bool {
        self.cancel(&EntryKey::Named {
            owner,
            kind: EntryKind::Interval,
            name: name.to_owned(),
        })
    }

    /// Whether a timeout with this (owner, name) is pending.
    pub fn has_timeout(&self, owner: OwnerId, name: &str) -> bool {
        self.entries.borrow().contains_key(&EntryKey::Named {
            owner,
            kind: EntryKind::Timeout,
            name: name.to_owned(),
        })
    }

    /// Whether an interval with this (owner, name) is registered.
    pub fn has_interval(&self, owner: OwnerId, name: &str) -> bool {
        self.entries.borrow().contains_key(&EntryKey::Named {
            owner,
            kind: EntryKind::Interval,
            name: name.to_owned(),
        })
    }

    /// Number of live entries.
    pub fn pending(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Fire everything that has come due. Called once per loop tick.
    ///
    /// The due set is snapshotted on entry: each due entry fires at most
    /// once per tick, in the order entries became due (insertion order for
    /// equal due times), and entries registered by a running callback wait
    /// for the next tick. Cancellations performed by a callback suppress
    /// later firings within the same tick.
    pub fn run_pending(&self) {
        let now = self.clock.millis();
        let mut due: Vec<Rc<Entry>> = self
            .entries
            .borrow()
            .values()
            .filter(|e| !e.cancelled.get() && deadline_reached(now, e.due.get()))
            .cloned()
            .collect();
        // Fire in the order entries became due; the stable sort keeps
        // insertion order as the tie-break for equal due times.
        due.sort_by_key(|e| std::cmp::Reverse(now.wrapping_sub(e.due.get())));

        for entry in due {
            if entry.cancelled.get() {
                continue;
            }
            match entry.period {
                // One-shots leave the table before their callback runs so
                // the callback can re-register the same name.
                None => {
                    self.entries.borrow_mut().shift_remove(&entry.key);
                }
                // Re-arm from the previous scheduled time (no drift). A
                // stalled loop catches up at one fire per tick, but the
                // backlog is capped at one period: left unbounded, a
                // period-0 poller keeps its original due time forever and,
                // once the clock drifts half the counter range past it,
                // stops registering as due at all.
                Some(period) => {
                    let mut next = entry.due.get().wrapping_add(period);
                    if deadline_reached(now, next) && millis_since(now, next) > period {
                        next = now;
                    }
                    entry.due.set(next);
                }
            }
            trace!(key = ?entry.key, "firing scheduler entry");
            let callback = &mut *entry.callback.borrow_mut();
            callback();
        }
    }

    fn insert(&self, key: EntryKey, delay_ms: u32, period: Option<u32>, callback: Callback) -> bool {
        let replaced = self.cancel(&key);
        if replaced {
            trace!(?key, "replacing scheduler entry");
        }
        let due = self.clock.millis().wrapping_add(delay_ms);
        let entry = Rc::new(Entry {
            key: key.clone(),
            due: Cell::new(due),
            period,
            callback: RefCell::new(callback),
            cancelled: Cell::new(false),
        });
        self.entries.borrow_mut().insert(key, entry);
        replaced
    }

    fn cancel(&self, key: &EntryKey) -> bool {
        match self.entries.borrow_mut().shift_remove(key) {
            Some(entry) => {
                entry.cancelled.set(true);
                true
            }
            None => false,
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let pending = self.entries.borrow().len();
        if pending > 0 {
            warn!(pending, "scheduler dropped with live entries");
        }
    }
}
