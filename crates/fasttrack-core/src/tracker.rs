//! Tracker facade: the timer and the review gate, wired together.
//!
//! The timer's completion events are the sole hand-off into the review
//! gate, and the gate blocks new sessions until the previous one is
//! resolved. Hosts that embed the two halves separately can replicate this
//! wiring; the facade exists so the joint semantics live (and are tested)
//! in one place.

use std::sync::Arc;

use crate::api::FastLogClient;
use crate::clock::Clock;
use crate::events::{Event, Notification};
use crate::lifecycle::AppPhase;
use crate::review::ReviewGate;
use crate::storage::KvStore;
use crate::timer::FastingTimer;

/// Result of a start attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum StartOutcome {
    /// A new session began.
    Started(Event),
    /// A completed fast awaits review; it was re-presented instead of
    /// starting a new session.
    ReviewPending,
    /// A session is already running.
    AlreadyActive,
}

/// A fasting timer and its completion review gate.
pub struct FastingTracker {
    timer: FastingTimer,
    review: ReviewGate,
}

impl FastingTracker {
    pub fn new(
        goal_duration_seconds: u64,
        clock: Arc<dyn Clock>,
        store: Arc<dyn KvStore>,
    ) -> Self {
        Self {
            timer: FastingTimer::new(goal_duration_seconds, clock, store.clone()),
            review: ReviewGate::new(store),
        }
    }

    /// Restore both halves from durable storage. A persisted session whose
    /// goal already elapsed completes here and lands in the review gate.
    pub fn restore(&mut self) -> Option<Event> {
        self.review.restore();
        let event = self.timer.restore();
        if let Some(Event::FastCompleted { ref fast, .. }) = event {
            self.review.open(fast.clone());
        }
        event
    }

    /// Start a new fast -- unless one is already running, or a completed
    /// fast still awaits review (in which case the pending record is
    /// re-presented instead).
    pub fn start_fast(&mut self) -> StartOutcome {
        if self.review.pending().is_some() {
            self.review.resurface();
            return StartOutcome::ReviewPending;
        }
        match self.timer.start_fast() {
            Some(event) => StartOutcome::Started(event),
            None => StartOutcome::AlreadyActive,
        }
    }

    pub fn stop_fast(&mut self) -> Option<Event> {
        let event = self.timer.stop_fast();
        if let Some(Event::FastCompleted { ref fast, .. }) = event {
            self.review.open(fast.clone());
        }
        event
    }

    pub fn tick(&mut self) -> Option<Event> {
        let event = self.timer.tick();
        if let Some(Event::FastCompleted { ref fast, .. }) = event {
            self.review.open(fast.clone());
        }
        event
    }

    pub fn reset_timer(&mut self) -> Option<Event> {
        self.timer.reset_timer()
    }

    pub fn handle_app_phase(&mut self, next: AppPhase) {
        self.timer.handle_app_phase(next);
    }

    pub async fn save_fast(&mut self, client: &FastLogClient) -> Option<Notification> {
        self.review.save_fast(client).await
    }

    pub fn discard_fast(&mut self) -> Notification {
        self.review.discard_fast()
    }

    pub fn timer(&self) -> &FastingTimer {
        &self.timer
    }

    pub fn review(&self) -> &ReviewGate {
        &self.review
    }

    pub fn review_mut(&mut self) -> &mut ReviewGate {
        &mut self.review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    const GOAL: u64 = 16 * 3600;

    fn tracker_at(now_ms: i64) -> (FastingTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now_ms));
        let store = Arc::new(MemoryStore::new());
        (FastingTracker::new(GOAL, clock.clone(), store), clock)
    }

    #[test]
    fn stop_hands_completion_to_review() {
        let (mut tracker, clock) = tracker_at(0);
        assert!(matches!(tracker.start_fast(), StartOutcome::Started(_)));
        clock.advance(3_600_000);
        tracker.stop_fast().unwrap();

        let pending = tracker.review().pending().unwrap();
        assert_eq!(pending.actual_duration_seconds, 3600);
        assert!(tracker.review().is_visible());
    }

    #[test]
    fn start_blocked_while_review_pending() {
        let (mut tracker, clock) = tracker_at(0);
        tracker.start_fast();
        clock.advance(60_000);
        tracker.stop_fast();

        let before = tracker.review().pending().cloned();
        assert_eq!(tracker.start_fast(), StartOutcome::ReviewPending);
        assert!(!tracker.timer().is_active());
        assert_eq!(tracker.review().pending().cloned(), before);
        assert!(tracker.review().is_visible());
    }

    #[test]
    fn start_allowed_after_discard() {
        let (mut tracker, clock) = tracker_at(0);
        tracker.start_fast();
        clock.advance(60_000);
        tracker.stop_fast();

        tracker.discard_fast();
        assert!(matches!(tracker.start_fast(), StartOutcome::Started(_)));
        assert!(tracker.timer().is_active());
    }

    #[test]
    fn second_start_reports_already_active() {
        let (mut tracker, _) = tracker_at(0);
        tracker.start_fast();
        assert_eq!(tracker.start_fast(), StartOutcome::AlreadyActive);
    }

    #[test]
    fn auto_completion_lands_in_review() {
        let (mut tracker, clock) = tracker_at(0);
        tracker.start_fast();
        clock.set(GOAL as i64 * 1000 + 3_000);
        tracker.tick().unwrap();

        let pending = tracker.review().pending().unwrap();
        assert_eq!(pending.actual_duration_seconds, GOAL);
    }

    #[test]
    fn reset_does_not_touch_review() {
        let (mut tracker, clock) = tracker_at(0);
        tracker.start_fast();
        clock.advance(60_000);
        tracker.stop_fast();

        tracker.reset_timer();
        assert!(tracker.review().pending().is_some());
    }
}
