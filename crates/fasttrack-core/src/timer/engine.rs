//! Fasting timer engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads -- the caller is responsible for calling `tick()` about once a
//! second while a fast is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle
//! ```
//!
//! A session ends by explicit `stop_fast()`, by a tick observing that the
//! goal elapsed, or by `restore()` discovering a persisted session whose
//! goal elapsed while the process was down. All three produce the same
//! `Event::FastCompleted` shape.
//!
//! ## Persistence
//!
//! `{ startTime, goalDurationSeconds }` is written under a fixed key when a
//! fast starts and removed when the session ends. Writes are best-effort:
//! failures are logged and never block a transition. The in-memory state is
//! the source of truth for the current process lifetime.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::session::{CompletedFast, CompletionTrigger, PersistedSession};
use crate::clock::Clock;
use crate::events::Event;
use crate::lifecycle::{is_wake_transition, AppPhase};
use crate::storage::KvStore;

pub const TIMER_STATE_KEY: &str = "fasting-timer-state";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
}

/// Core fasting timer.
///
/// Operates on wall-clock reads from an injected [`Clock`] -- elapsed time
/// is always `now - start_time`, never an incremented counter, so delayed
/// ticks self-correct.
pub struct FastingTimer {
    goal_duration_seconds: u64,
    start_time: Option<i64>,
    elapsed_seconds: u64,
    is_active: bool,
    app_phase: AppPhase,
    clock: Arc<dyn Clock>,
    store: Arc<dyn KvStore>,
}

impl FastingTimer {
    /// Create an idle timer with the given goal.
    ///
    /// Call [`restore`](Self::restore) afterwards to resume a persisted
    /// session from a previous process.
    pub fn new(goal_duration_seconds: u64, clock: Arc<dyn Clock>, store: Arc<dyn KvStore>) -> Self {
        Self {
            goal_duration_seconds,
            start_time: None,
            elapsed_seconds: 0,
            is_active: false,
            app_phase: AppPhase::Active,
            clock,
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        if self.is_active {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    pub fn goal_duration_seconds(&self) -> u64 {
        self.goal_duration_seconds
    }

    /// Seconds since the session started, as of the last tick or
    /// reconciliation.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.goal_duration_seconds.saturating_sub(self.elapsed_seconds)
    }

    /// 0.0 .. 100.0 progress toward the goal.
    pub fn progress_percentage(&self) -> f64 {
        if self.goal_duration_seconds == 0 {
            return 0.0;
        }
        (self.elapsed_seconds as f64 / self.goal_duration_seconds as f64 * 100.0).min(100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase(),
            start_time: self.start_time,
            elapsed_seconds: self.elapsed_seconds,
            remaining_seconds: self.remaining_seconds(),
            progress_pct: self.progress_percentage(),
            goal_duration_seconds: self.goal_duration_seconds,
            at: self.now_utc(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new fast. No-op while a session is already running.
    pub fn start_fast(&mut self) -> Option<Event> {
        if self.is_active {
            return None;
        }
        let now = self.clock.now_ms();
        self.start_time = Some(now);
        self.elapsed_seconds = 0;
        self.is_active = true;
        self.persist_session();
        Some(Event::FastStarted {
            start_time: now,
            goal_duration_seconds: self.goal_duration_seconds,
            at: self.now_utc(),
        })
    }

    /// End the running fast at the current wall-clock instant.
    /// No-op on an idle timer: no state change, no event.
    pub fn stop_fast(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        let end_time = self.clock.now_ms();
        self.complete(end_time, CompletionTrigger::Manual)
    }

    /// Call about once a second while running. Recomputes elapsed time from
    /// the clock and auto-completes once the goal is reached.
    ///
    /// On auto-completion the end instant is `start + goal`, not raw "now",
    /// so the recorded duration equals the goal even if the tick fired late.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_active {
            return None;
        }
        let start = self.start_time?;
        self.elapsed_seconds = self.elapsed_since(start);
        if self.elapsed_seconds >= self.goal_duration_seconds {
            let end_time = start + self.goal_duration_seconds as i64 * 1000;
            return self.complete(end_time, CompletionTrigger::GoalReached);
        }
        None
    }

    /// Forcibly return to idle from any state, clearing persisted session
    /// storage. A deliberate abandon: no completion event is emitted.
    pub fn reset_timer(&mut self) -> Option<Event> {
        self.is_active = false;
        self.start_time = None;
        self.elapsed_seconds = 0;
        self.clear_persisted();
        Some(Event::TimerReset { at: self.now_utc() })
    }

    /// Load a persisted session from a previous process, if any.
    ///
    /// A stored session is resumed only when its goal matches the currently
    /// configured goal. If the goal already elapsed while the process was
    /// down, the completion is synthesized here (`CompletionTrigger::Restore`)
    /// with `end = start + goal`, so the fast is not silently lost.
    pub fn restore(&mut self) -> Option<Event> {
        if self.is_active {
            return None;
        }
        let stored = match self.store.get(TIMER_STATE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("failed to load timer state: {e}");
                return None;
            }
        };
        let session: PersistedSession = match serde_json::from_str(&stored) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("discarding unreadable timer state: {e}");
                self.clear_persisted();
                return None;
            }
        };
        if session.goal_duration_seconds != self.goal_duration_seconds {
            // Stale record from a different plan.
            self.clear_persisted();
            return None;
        }

        let elapsed = self.elapsed_since(session.start_time);
        if elapsed < self.goal_duration_seconds {
            self.start_time = Some(session.start_time);
            self.elapsed_seconds = elapsed;
            self.is_active = true;
            return Some(Event::FastRestored {
                start_time: session.start_time,
                elapsed_seconds: elapsed,
                at: self.now_utc(),
            });
        }

        // Goal elapsed while the app was not running.
        self.start_time = Some(session.start_time);
        let end_time = session.start_time + self.goal_duration_seconds as i64 * 1000;
        self.complete(end_time, CompletionTrigger::Restore)
    }

    /// Feed a host lifecycle transition into the timer.
    ///
    /// On return to the foreground while running, elapsed time is
    /// recomputed from the clock (ticking may not have happened while
    /// backgrounded) and clamped to the goal. The reconciliation itself
    /// never completes the session; the next `tick()` does.
    pub fn handle_app_phase(&mut self, next: AppPhase) {
        if is_wake_transition(self.app_phase, next) {
            if let (true, Some(start)) = (self.is_active, self.start_time) {
                self.elapsed_seconds = self.elapsed_since(start).min(self.goal_duration_seconds);
            }
        }
        self.app_phase = next;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self, end_time: i64, trigger: CompletionTrigger) -> Option<Event> {
        let start = self.start_time?;
        let fast = CompletedFast::from_bounds(start, end_time, self.goal_duration_seconds);
        self.is_active = false;
        self.elapsed_seconds = fast.actual_duration_seconds;
        self.clear_persisted();
        Some(Event::FastCompleted {
            fast,
            trigger,
            at: self.now_utc(),
        })
    }

    fn elapsed_since(&self, start: i64) -> u64 {
        ((self.clock.now_ms() - start).max(0) / 1000) as u64
    }

    fn persist_session(&self) {
        let Some(start_time) = self.start_time else {
            return;
        };
        let session = PersistedSession {
            start_time,
            goal_duration_seconds: self.goal_duration_seconds,
        };
        match serde_json::to_string(&session) {
            Ok(json) => {
                if let Err(e) = self.store.set(TIMER_STATE_KEY, &json) {
                    log::warn!("failed to save timer state: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize timer state: {e}"),
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.store.remove(TIMER_STATE_KEY) {
            log::warn!("failed to clear timer state: {e}");
        }
    }

    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.now_ms()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    const GOAL: u64 = 16 * 3600;

    fn timer_at(now_ms: i64) -> (FastingTimer, Arc<ManualClock>, Arc<MemoryStore>) {
        let clock = Arc::new(ManualClock::new(now_ms));
        let store = Arc::new(MemoryStore::new());
        let timer = FastingTimer::new(GOAL, clock.clone(), store.clone());
        (timer, clock, store)
    }

    #[test]
    fn initial_state_is_idle() {
        let (timer, _, _) = timer_at(0);
        assert_eq!(timer.phase(), TimerPhase::Idle);
        assert!(!timer.is_active());
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(timer.start_time(), None);
        assert_eq!(timer.remaining_seconds(), GOAL);
    }

    #[test]
    fn start_persists_session() {
        let (mut timer, _, store) = timer_at(1_000);
        let event = timer.start_fast().unwrap();
        assert!(matches!(event, Event::FastStarted { start_time: 1_000, .. }));
        assert!(timer.is_active());

        let json = store.get(TIMER_STATE_KEY).unwrap().unwrap();
        let session: PersistedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session.start_time, 1_000);
        assert_eq!(session.goal_duration_seconds, GOAL);
    }

    #[test]
    fn second_start_is_ignored() {
        let (mut timer, clock, _) = timer_at(1_000);
        timer.start_fast();
        clock.advance(5_000);
        assert!(timer.start_fast().is_none());
        assert_eq!(timer.start_time(), Some(1_000));
    }

    #[test]
    fn stop_reports_exact_duration() {
        let (mut timer, clock, store) = timer_at(1_000);
        timer.start_fast();
        clock.advance(3600 * 1000);

        let event = timer.stop_fast().unwrap();
        let Event::FastCompleted { fast, trigger, .. } = event else {
            panic!("expected FastCompleted");
        };
        assert_eq!(trigger, CompletionTrigger::Manual);
        assert_eq!(fast.start_time, 1_000);
        assert_eq!(fast.end_time, 1_000 + 3600 * 1000);
        assert_eq!(fast.actual_duration_seconds, 3600);
        assert_eq!(fast.goal_duration_seconds, GOAL);
        assert!(!timer.is_active());
        assert_eq!(store.get(TIMER_STATE_KEY).unwrap(), None);
    }

    #[test]
    fn stop_while_idle_is_noop() {
        let (mut timer, _, _) = timer_at(1_000);
        assert!(timer.stop_fast().is_none());
        assert!(!timer.is_active());
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(timer.start_time(), None);
    }

    #[test]
    fn tick_recomputes_from_wall_clock() {
        let (mut timer, clock, _) = timer_at(1_000);
        timer.start_fast();
        clock.advance(10_000);
        assert!(timer.tick().is_none());
        assert_eq!(timer.elapsed_seconds(), 10);

        // A delayed tick self-corrects -- no counter drift.
        clock.advance(5_000);
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 15);
    }

    #[test]
    fn late_tick_completes_with_exact_goal_duration() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        // Tick fires 7 seconds after the goal boundary.
        clock.set(GOAL as i64 * 1000 + 7_000);

        let Some(Event::FastCompleted { fast, trigger, .. }) = timer.tick() else {
            panic!("expected completion");
        };
        assert_eq!(trigger, CompletionTrigger::GoalReached);
        assert_eq!(fast.actual_duration_seconds, GOAL);
        assert_eq!(fast.end_time, GOAL as i64 * 1000);
        assert!(!timer.is_active());
    }

    #[test]
    fn no_duplicate_completion_after_goal() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        clock.set(GOAL as i64 * 1000);
        assert!(timer.tick().is_some());
        assert!(timer.tick().is_none());
        assert!(timer.stop_fast().is_none());
    }

    #[test]
    fn reset_clears_without_completion() {
        let (mut timer, clock, store) = timer_at(1_000);
        timer.start_fast();
        clock.advance(5_000);
        timer.tick();

        let event = timer.reset_timer().unwrap();
        assert!(matches!(event, Event::TimerReset { .. }));
        assert!(!timer.is_active());
        assert_eq!(timer.start_time(), None);
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(store.get(TIMER_STATE_KEY).unwrap(), None);
    }

    #[test]
    fn restore_resumes_running_session() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(TIMER_STATE_KEY, r#"{"startTime":0,"goalDurationSeconds":57600}"#)
            .unwrap();
        let clock = Arc::new(ManualClock::new(5_000));
        let mut timer = FastingTimer::new(GOAL, clock, store);

        let Some(Event::FastRestored {
            start_time,
            elapsed_seconds,
            ..
        }) = timer.restore()
        else {
            panic!("expected FastRestored");
        };
        assert_eq!(start_time, 0);
        assert_eq!(elapsed_seconds, 5);
        assert!(timer.is_active());
        assert_eq!(timer.start_time(), Some(0));
    }

    #[test]
    fn restore_ignores_goal_mismatch() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(TIMER_STATE_KEY, r#"{"startTime":0,"goalDurationSeconds":3600}"#)
            .unwrap();
        let clock = Arc::new(ManualClock::new(5_000));
        let mut timer = FastingTimer::new(GOAL, clock, store.clone());

        assert!(timer.restore().is_none());
        assert!(!timer.is_active());
        assert_eq!(timer.start_time(), None);
        // Stale record is deleted opportunistically.
        assert_eq!(store.get(TIMER_STATE_KEY).unwrap(), None);
    }

    #[test]
    fn restore_synthesizes_completion_past_goal() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(TIMER_STATE_KEY, r#"{"startTime":0,"goalDurationSeconds":57600}"#)
            .unwrap();
        let clock = Arc::new(ManualClock::new(GOAL as i64 * 1000 + 120_000));
        let mut timer = FastingTimer::new(GOAL, clock, store.clone());

        let Some(Event::FastCompleted { fast, trigger, .. }) = timer.restore() else {
            panic!("expected synthesized completion");
        };
        assert_eq!(trigger, CompletionTrigger::Restore);
        assert_eq!(fast.actual_duration_seconds, GOAL);
        assert_eq!(fast.end_time, GOAL as i64 * 1000);
        assert!(!timer.is_active());
        assert_eq!(store.get(TIMER_STATE_KEY).unwrap(), None);
    }

    #[test]
    fn restore_discards_unreadable_state() {
        let store = Arc::new(MemoryStore::new());
        store.set(TIMER_STATE_KEY, "not json").unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let mut timer = FastingTimer::new(GOAL, clock, store.clone());

        assert!(timer.restore().is_none());
        assert_eq!(store.get(TIMER_STATE_KEY).unwrap(), None);
    }

    #[test]
    fn foreground_reconciliation_clamps_to_goal() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        timer.handle_app_phase(AppPhase::Background);

        // Device slept well past the goal.
        clock.set(GOAL as i64 * 1000 + 600_000);
        timer.handle_app_phase(AppPhase::Active);
        assert_eq!(timer.elapsed_seconds(), GOAL);
        // Reconciliation does not complete; the next tick does.
        assert!(timer.is_active());
        assert!(matches!(
            timer.tick(),
            Some(Event::FastCompleted { .. })
        ));
    }

    #[test]
    fn foreground_reconciliation_updates_elapsed() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        timer.handle_app_phase(AppPhase::Inactive);
        clock.set(42_000);
        timer.handle_app_phase(AppPhase::Active);
        assert_eq!(timer.elapsed_seconds(), 42);
        assert!(timer.is_active());
    }

    #[test]
    fn active_to_active_does_not_reconcile() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        clock.set(42_000);
        timer.handle_app_phase(AppPhase::Active);
        // No wake transition: elapsed untouched until the next tick.
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn backward_clock_jump_clamps_elapsed() {
        let (mut timer, clock, _) = timer_at(100_000);
        timer.start_fast();
        clock.set(40_000);
        timer.tick();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(timer.remaining_seconds(), GOAL);
    }

    #[test]
    fn progress_and_remaining() {
        let (mut timer, clock, _) = timer_at(0);
        timer.start_fast();
        clock.set(GOAL as i64 * 500); // halfway
        timer.tick();
        assert_eq!(timer.remaining_seconds(), GOAL / 2);
        assert!((timer.progress_percentage() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_goal_progress_is_zero() {
        let clock = Arc::new(ManualClock::new(0));
        let store = Arc::new(MemoryStore::new());
        let timer = FastingTimer::new(0, clock, store);
        assert_eq!(timer.progress_percentage(), 0.0);
    }
}
