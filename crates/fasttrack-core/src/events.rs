use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::timer::{CompletedFast, CompletionTrigger, TimerPhase};

/// Every state change in the timer produces an Event.
/// The host polls for events; the review gate consumes completions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FastStarted {
        start_time: i64,
        goal_duration_seconds: u64,
        at: DateTime<Utc>,
    },
    /// A session ended -- by explicit stop, by a tick reaching the goal, or
    /// synthesized at restore time for a goal that elapsed while the
    /// process was down. The record is handed to the review gate.
    FastCompleted {
        fast: CompletedFast,
        trigger: CompletionTrigger,
        at: DateTime<Utc>,
    },
    /// A persisted session was resumed with its original start time.
    FastRestored {
        start_time: i64,
        elapsed_seconds: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        start_time: Option<i64>,
        elapsed_seconds: u64,
        remaining_seconds: u64,
        progress_pct: f64,
        goal_duration_seconds: u64,
        at: DateTime<Utc>,
    },
}

/// User-facing outcomes of review-gate operations. The host renders these
/// however it likes (toast, stderr line); the core only types them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    FastSaved {
        duration_label: String,
    },
    SaveFailed {
        error: SaveError,
    },
    FastDiscarded,
}

impl Notification {
    pub fn title(&self) -> &'static str {
        match self {
            Notification::FastSaved { .. } => "Fast Saved!",
            Notification::SaveFailed { .. } => "Save Failed",
            Notification::FastDiscarded => "Fast Discarded",
        }
    }

    pub fn body(&self) -> String {
        match self {
            Notification::FastSaved { duration_label } => {
                format!("Your {duration_label} fast has been logged.")
            }
            Notification::SaveFailed {
                error: SaveError::Timeout { .. },
            } => "Request timed out. Please check your connection and try again.".to_string(),
            Notification::SaveFailed { .. } => {
                "Could not save your fast. Please try again.".to_string()
            }
            Notification::FastDiscarded => "Your fast was not saved.".to_string(),
        }
    }
}
