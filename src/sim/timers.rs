//! One-shot scheduled events
//!
//! Every event is tagged with the attempt token that was current when it was
//! scheduled. Resets cancel everything, and anything that still surfaces with
//! an older token is dropped instead of acting on the new game.

/// What happens when a scheduled event comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// End the exploding phase and enter game over
    FinishExplosion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub token: u64,
    /// World clock time (seconds) at which the event fires
    pub due_at: f64,
    pub action: ScheduledAction,
}

/// Pending one-shot events owned by the world
#[derive(Debug, Clone, Default)]
pub struct Timers {
    pending: Vec<ScheduledEvent>,
}

impl Timers {
    pub fn schedule(&mut self, token: u64, due_at: f64, action: ScheduledAction) {
        self.pending.push(ScheduledEvent {
            token,
            due_at,
            action,
        });
    }

    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending timer(s)", self.pending.len());
        }
        self.pending.clear();
    }

    /// Remove and return the actions due at `now` for the current attempt
    ///
    /// Due events carrying a different token are discarded.
    pub fn take_due(&mut self, now: f64, token: u64) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        self.pending.retain(|event| {
            if event.due_at > now {
                return true;
            }
            if event.token == token {
                due.push(event.action);
            } else {
                log::debug!(
                    "Dropping stale {:?} from attempt {} (current {})",
                    event.action,
                    event.token,
                    token
                );
            }
            false
        });
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
