//! Cooperative timer queue
//!
//! The source of all time-based suspensions in the sim: "wait a second then
//! unfreeze the player", "spawn the next obstacle row in three seconds".
//! Entries fire on the tick loop, never on real threads, and the whole
//! queue is cancelled in one call when the time scale drops to zero.

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// End of the intro sequence: unfreeze the player and arm the spawner
    ActivatePlayer,
    /// Spawn an obstacle row, then re-schedule
    SpawnObstacles,
}

#[derive(Debug, Clone)]
struct Entry {
    fire_at: u64,
    action: ScheduledAction,
}

/// Pending `(fire_at_tick, action)` entries, dispatched in fire order
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, fire_at: u64, action: ScheduledAction) {
        self.pending.push(Entry { fire_at, action });
    }

    /// Drain every entry due at or before `now`, in fire order.
    /// Entries with the same deadline keep insertion order.
    pub fn due(&mut self, now: u64) -> Vec<ScheduledAction> {
        let mut fired: Vec<(u64, ScheduledAction)> = Vec::new();
        self.pending.retain(|e| {
            if e.fire_at <= now {
                fired.push((e.fire_at, e.action));
                false
            } else {
                true
            }
        });
        fired.sort_by_key(|(at, _)| *at);
        fired.into_iter().map(|(_, a)| a).collect()
    }

    /// Drop every pending entry. The sole cancellation path: called once
    /// when the time scale is set to zero at death.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
