pub mod config;
pub mod fast;
pub mod plan;
pub mod review;

use std::sync::Arc;

use fasttrack_core::storage::{Config, FileStore};
use fasttrack_core::{Event, FastingTracker, SystemClock};

/// Build the tracker from durable storage and restore any persisted state.
///
/// The CLI is a short-lived host: every invocation reconstructs the core
/// from the file store, so a fast started in one invocation keeps running
/// across the next. Returns the restore event, if one fired (a resumed
/// session, or a completion synthesized for a goal that elapsed in the
/// meantime).
pub(crate) fn open_tracker(
    config: &Config,
) -> Result<(FastingTracker, Option<Event>), Box<dyn std::error::Error>> {
    let store = Arc::new(FileStore::open()?);
    let mut tracker = FastingTracker::new(
        config.goal_duration_seconds(),
        Arc::new(SystemClock),
        store,
    );
    let restored = tracker.restore();
    Ok((tracker, restored))
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
