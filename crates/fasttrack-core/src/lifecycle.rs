//! App lifecycle phases.
//!
//! The host runtime owns the real foreground/background signal; it forwards
//! each transition into [`FastingTimer::handle_app_phase`]. Keeping the
//! phase as plain data means tests can simulate suspension without a host.
//!
//! [`FastingTimer::handle_app_phase`]: crate::timer::FastingTimer::handle_app_phase

use serde::{Deserialize, Serialize};

/// Foreground state of the host process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppPhase {
    Active,
    Inactive,
    Background,
}

impl AppPhase {
    pub fn is_foreground(self) -> bool {
        matches!(self, AppPhase::Active)
    }
}

/// True when the process returns to the foreground after being suspended
/// or backgrounded. This is the only transition the timer reconciles on.
pub fn is_wake_transition(prev: AppPhase, next: AppPhase) -> bool {
    !prev.is_foreground() && next.is_foreground()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wake_transitions() {
        assert!(is_wake_transition(AppPhase::Background, AppPhase::Active));
        assert!(is_wake_transition(AppPhase::Inactive, AppPhase::Active));
        assert!(!is_wake_transition(AppPhase::Active, AppPhase::Active));
        assert!(!is_wake_transition(AppPhase::Active, AppPhase::Background));
        assert!(!is_wake_transition(AppPhase::Background, AppPhase::Inactive));
    }
}
