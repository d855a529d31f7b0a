//! Completion review gate.
//!
//! Holds at most one completed fast awaiting user disposition. While a
//! record is pending, the tracker refuses to start a new session and
//! re-presents the pending record instead, so an unresolved fast is never
//! silently lost.

use std::sync::Arc;

use crate::api::FastLogClient;
use crate::events::Notification;
use crate::storage::KvStore;
use crate::timer::{format_duration, CompletedFast};

pub const PENDING_REVIEW_KEY: &str = "pending-fast-review";

/// Review state for a completed fast: pending record, draft notes, request
/// progress, and a visibility flag for the host's modal-equivalent.
pub struct ReviewGate {
    visible: bool,
    pending: Option<CompletedFast>,
    notes: String,
    loading: bool,
    store: Arc<dyn KvStore>,
}

impl ReviewGate {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            visible: false,
            pending: None,
            notes: String::new(),
            loading: false,
            store,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pending(&self) -> Option<&CompletedFast> {
        self.pending.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Load a pending record left behind by a previous process, if any.
    pub fn restore(&mut self) {
        let stored = match self.store.get(PENDING_REVIEW_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return,
            Err(e) => {
                log::warn!("failed to load pending review: {e}");
                return;
            }
        };
        match serde_json::from_str::<CompletedFast>(&stored) {
            Ok(fast) => {
                self.pending = Some(fast);
                self.visible = true;
            }
            Err(e) => {
                log::warn!("discarding unreadable pending review: {e}");
                self.clear_persisted();
            }
        }
    }

    /// Present a completed fast for review. Any previous draft notes are
    /// cleared.
    pub fn open(&mut self, fast: CompletedFast) {
        self.persist_pending(&fast);
        self.pending = Some(fast);
        self.notes.clear();
        self.visible = true;
    }

    /// Re-present the pending record (e.g. when a start attempt was
    /// blocked). Draft notes survive.
    pub fn resurface(&mut self) {
        if self.pending.is_some() {
            self.visible = true;
        }
    }

    /// Host-initiated dismissal: clears everything, no network call, no
    /// notification. Distinct from [`discard_fast`](Self::discard_fast).
    pub fn close(&mut self) {
        self.visible = false;
        self.pending = None;
        self.notes.clear();
        self.loading = false;
        self.clear_persisted();
    }

    /// Update draft notes. Any string is accepted, including empty.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Save the pending fast through the given client. No-op (no network
    /// call) when nothing is pending.
    ///
    /// Success clears the pending record, notes, and visibility. Failure
    /// leaves everything except `loading` untouched so the user can retry
    /// or discard.
    pub async fn save_fast(&mut self, client: &FastLogClient) -> Option<Notification> {
        let fast = self.pending.clone()?;
        self.loading = true;

        let notes = if self.notes.is_empty() {
            None
        } else {
            Some(self.notes.clone())
        };
        let result = client.log_fast(&fast, notes.as_deref()).await;
        self.loading = false;

        match result {
            Ok(()) => {
                // A discard that raced the request wins: only clear if the
                // record we sent is still the pending one.
                if self.pending.as_ref().map(|p| p.id.as_str()) == Some(fast.id.as_str()) {
                    self.close();
                }
                Some(Notification::FastSaved {
                    duration_label: format_duration(fast.actual_duration_seconds),
                })
            }
            Err(error) => Some(Notification::SaveFailed { error }),
        }
    }

    /// Drop the pending fast without saving. Never touches the network.
    pub fn discard_fast(&mut self) -> Notification {
        self.close();
        Notification::FastDiscarded
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_pending(&self, fast: &CompletedFast) {
        match serde_json::to_string(fast) {
            Ok(json) => {
                if let Err(e) = self.store.set(PENDING_REVIEW_KEY, &json) {
                    log::warn!("failed to save pending review: {e}");
                }
            }
            Err(e) => log::warn!("failed to serialize pending review: {e}"),
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.store.remove(PENDING_REVIEW_KEY) {
            log::warn!("failed to clear pending review: {e}");
        }
    }
}
