/**
 * Purpose: Boundary-delivery queue for the Operation Scheduler (spec §4.4).
 *
 * Invariants enforced:
 * - Order invariance: different submission orders with the same
 *   `(scheduled_time_h, priority, event_id)` tuples produce an identical
 *   `flush_due` ordering.
 * - No side effects: submitting an intent does not perturb any
 *   downstream result until a boundary (`flush_due`) crosses it.
 *
 * What this file does NOT do:
 * - Does not assign `event_id` (the caller, typically the world
 *   orchestrator's event-id allocator, assigns it before submission,
 *   so that submission order and `event_id` order may differ).
 * - Does not compute hash chains (that is `EventLog::append`'s job, run
 *   against whichever log head is current at flush time).
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bvm_events::EventPayload;

/// Opaque handle returned by [`OperationScheduler::submit_intent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduledId(pub u64);

/// A queued, not-yet-delivered operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Intent {
    pub event_id: u64,
    pub scheduled_time_h: f64,
    pub priority: i32,
    pub payload: EventPayload,
    pub metadata: BTreeMap<String, String>,
}

/// Pure envelope queue owning delivery timing and order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OperationScheduler {
    queue: Vec<Intent>,
    next_scheduled_id: u64,
}

impl OperationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an intent. Has no effect on any read until a boundary
    /// (`flush_due`) delivers it.
    pub fn submit_intent(
        &mut self,
        event_id: u64,
        scheduled_time_h: f64,
        priority: i32,
        payload: EventPayload,
        metadata: BTreeMap<String, String>,
    ) -> ScheduledId {
        let scheduled_id = ScheduledId(self.next_scheduled_id);
        self.next_scheduled_id += 1;
        self.queue.push(Intent {
            event_id,
            scheduled_time_h,
            priority,
            payload,
            metadata,
        });
        scheduled_id
    }

    /// Remove and return every intent with `scheduled_time_h <= now_h`,
    /// in the fixed delivery order:
    /// 1. ascending `scheduled_time_h`
    /// 2. ascending `priority` (`SEED=0, WASHOUT=10, FEED=20, TREAT=30`)
    /// 3. ascending `event_id` (stable tie-break)
    pub fn flush_due(&mut self, now_h: f64) -> Vec<Intent> {
        let mut due = Vec::new();
        let mut pending = Vec::with_capacity(self.queue.len());
        for intent in self.queue.drain(..) {
            if intent.scheduled_time_h <= now_h {
                due.push(intent);
            } else {
                pending.push(intent);
            }
        }
        self.queue = pending;
        due.sort_by(|a, b| {
            a.scheduled_time_h
                .total_cmp(&b.scheduled_time_h)
                .then(a.priority.cmp(&b.priority))
                .then(a.event_id.cmp(&b.event_id))
        });
        due
    }

    /// Number of intents still queued (not yet due).
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn treat(event_id: u64, vessel_id: &str) -> EventPayload {
        EventPayload::TreatCompound {
            vessel_id: vessel_id.to_string(),
            compound_id: "compound-x".to_string(),
            dose_um: 10.0,
        }
    }

    #[test]
    fn flush_due_orders_by_time_then_priority_then_event_id() {
        let mut scheduler = OperationScheduler::new();
        // Submitted out of delivery order, deliberately.
        scheduler.submit_intent(2, 24.0, bvm_events::priority::TREAT, treat(2, "A1"), BTreeMap::new());
        scheduler.submit_intent(1, 24.0, bvm_events::priority::WASHOUT, treat(1, "A1"), BTreeMap::new());
        scheduler.submit_intent(0, 0.0, bvm_events::priority::SEED, treat(0, "A1"), BTreeMap::new());

        let due = scheduler.flush_due(24.0);
        let event_ids: Vec<u64> = due.iter().map(|i| i.event_id).collect();
        assert_eq!(event_ids, vec![0, 1, 2]);
    }

    #[test]
    fn washout_before_treat_at_equal_time_due_to_priority() {
        let mut scheduler = OperationScheduler::new();
        scheduler.submit_intent(30, 24.0, bvm_events::priority::TREAT, treat(30, "A1"), BTreeMap::new());
        scheduler.submit_intent(10, 24.0, bvm_events::priority::WASHOUT, treat(10, "A1"), BTreeMap::new());

        let due = scheduler.flush_due(24.0);
        assert_eq!(due[0].priority, bvm_events::priority::WASHOUT);
        assert_eq!(due[1].priority, bvm_events::priority::TREAT);
    }

    #[test]
    fn not_yet_due_intents_stay_queued() {
        let mut scheduler = OperationScheduler::new();
        scheduler.submit_intent(0, 48.0, bvm_events::priority::TREAT, treat(0, "A1"), BTreeMap::new());

        let due = scheduler.flush_due(24.0);
        assert!(due.is_empty());
        assert_eq!(scheduler.pending_count(), 1);

        let due = scheduler.flush_due(48.0);
        assert_eq!(due.len(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn submission_order_does_not_affect_flush_order() {
        let mut scheduler_a = OperationScheduler::new();
        scheduler_a.submit_intent(0, 24.0, bvm_events::priority::SEED, treat(0, "A1"), BTreeMap::new());
        scheduler_a.submit_intent(1, 24.0, bvm_events::priority::TREAT, treat(1, "A1"), BTreeMap::new());
        scheduler_a.submit_intent(2, 24.0, bvm_events::priority::WASHOUT, treat(2, "A1"), BTreeMap::new());

        let mut scheduler_b = OperationScheduler::new();
        scheduler_b.submit_intent(2, 24.0, bvm_events::priority::WASHOUT, treat(2, "A1"), BTreeMap::new());
        scheduler_b.submit_intent(1, 24.0, bvm_events::priority::TREAT, treat(1, "A1"), BTreeMap::new());
        scheduler_b.submit_intent(0, 24.0, bvm_events::priority::SEED, treat(0, "A1"), BTreeMap::new());

        let ids_a: Vec<u64> = scheduler_a.flush_due(24.0).iter().map(|i| i.event_id).collect();
        let ids_b: Vec<u64> = scheduler_b.flush_due(24.0).iter().map(|i| i.event_id).collect();
        assert_eq!(ids_a, ids_b);
    }
}
