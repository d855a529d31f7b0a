//! Session data model.
//!
//! `PersistedSession` is the storage record the engine writes while a fast
//! is running; `CompletedFast` is the immutable completion record handed to
//! the review gate. Both use camelCase JSON on the wire.

use serde::{Deserialize, Serialize};

/// The durable record of an in-progress fast.
///
/// Only the start instant and the goal are persisted -- elapsed time is
/// always recomputed from the wall clock, so a stale cached value can never
/// survive a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    pub start_time: i64,
    pub goal_duration_seconds: u64,
}

/// What ended the session that produced a [`CompletedFast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionTrigger {
    /// User stopped the fast before the goal.
    Manual,
    /// A tick observed elapsed >= goal.
    GoalReached,
    /// The goal elapsed while the process was not running; the completion
    /// was synthesized when the persisted session was restored.
    Restore,
}

/// A finished fasting session awaiting disposition (save or discard).
///
/// Notes are attached only at save time and are not part of this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedFast {
    /// Stable identifier, derived from the start instant.
    pub id: String,
    pub start_time: i64,
    pub end_time: i64,
    pub actual_duration_seconds: u64,
    pub goal_duration_seconds: u64,
}

impl CompletedFast {
    /// Build a completion record from session bounds.
    ///
    /// The duration is `floor((end - start) / 1000)`, clamped to zero so a
    /// backward clock jump can never produce a negative duration.
    pub fn from_bounds(start_time: i64, end_time: i64, goal_duration_seconds: u64) -> Self {
        let actual_duration_seconds = ((end_time - start_time).max(0) / 1000) as u64;
        Self {
            id: start_time.to_string(),
            start_time,
            end_time,
            actual_duration_seconds,
            goal_duration_seconds,
        }
    }
}
