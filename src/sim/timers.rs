//! Frame-driven delayed actions
//!
//! Timers fire from `tick` on the single update path. An action carries
//! enough context to check at fire time that its target still exists;
//! the caller drops it silently otherwise.

use serde::{Deserialize, Serialize};

use super::state::{CollectibleId, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// What to do when a timer comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerAction {
    /// Enable pickup detection for a collectible shown during room visit `visit`
    ArmPickup { collectible: CollectibleId, visit: u32 },
    DismissMessage(MessageId),
    /// Remove the store border drawn when room visit `visit` began
    ClearStoreBorder { visit: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub due_ms: u64,
    pub action: TimerAction,
}

/// Pending timers, kept sorted by (due, id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    pending: Vec<Timer>,
    next_id: u32,
}

impl Timers {
    /// Invoke `action` once `delay_ms` has passed since `now_ms`
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due_ms = now_ms.saturating_add(delay_ms);
        let at = self
            .pending
            .partition_point(|t| (t.due_ms, t.id.0) <= (due_ms, id.0));
        self.pending.insert(at, Timer { id, due_ms, action });
        id
    }

    /// Cancel a timer; returns false if it already fired or never existed
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    /// Cancel every pending timer whose action matches
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&TimerAction) -> bool) {
        self.pending.retain(|t| !pred(&t.action));
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove and return every action due at `now_ms`, in firing order
    pub fn take_due(&mut self, now_ms: u64) -> Vec<TimerAction> {
        let split = self.pending.partition_point(|t| t.due_ms <= now_ms);
        self.pending.drain(..split).map(|t| t.action).collect()
    }
}
