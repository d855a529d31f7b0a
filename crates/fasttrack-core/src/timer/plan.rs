//! Fasting plan presets and physiological milestones.

use serde::Serialize;

/// A named fasting schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FastingPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// 0 for the custom plan -- duration is user-supplied.
    pub fasting_hours: u64,
    pub description: &'static str,
}

impl FastingPlan {
    pub fn goal_duration_seconds(&self) -> u64 {
        self.fasting_hours.saturating_mul(3600)
    }

    pub fn is_custom(&self) -> bool {
        self.fasting_hours == 0
    }
}

pub const FASTING_PLANS: [FastingPlan; 4] = [
    FastingPlan {
        id: "16:8",
        name: "16:8",
        fasting_hours: 16,
        description: "Fast for 16 hours, eat within 8 hours.",
    },
    FastingPlan {
        id: "18:6",
        name: "18:6",
        fasting_hours: 18,
        description: "Fast for 18 hours, eat within 6 hours.",
    },
    FastingPlan {
        id: "20:4",
        name: "20:4",
        fasting_hours: 20,
        description: "Fast for 20 hours, eat within 4 hours.",
    },
    FastingPlan {
        id: "custom",
        name: "Custom",
        fasting_hours: 0,
        description: "Set your own fasting duration.",
    },
];

pub fn plan_by_id(id: &str) -> Option<&'static FastingPlan> {
    FASTING_PLANS.iter().find(|p| p.id == id)
}

/// A physiological marker reached at a given point into a fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub id: &'static str,
    pub at_hours: u64,
    pub name: &'static str,
    pub description: &'static str,
}

impl Milestone {
    pub fn at_seconds(&self) -> u64 {
        self.at_hours.saturating_mul(3600)
    }
}

pub const FASTING_MILESTONES: [Milestone; 7] = [
    Milestone {
        id: "blood_sugar_drop",
        at_hours: 4,
        name: "Blood Sugar Drops",
        description: "Blood sugar levels begin to fall as the body uses recently consumed \
                      glucose and starts tapping into stored glycogen.",
    },
    Milestone {
        id: "glycogen_depletion",
        at_hours: 8,
        name: "Glycogen Depletion Nears",
        description: "Liver glycogen stores significantly deplete, signaling the body to \
                      switch to alternative energy sources like fat.",
    },
    Milestone {
        id: "ketosis_starts",
        at_hours: 12,
        name: "Ketosis Begins",
        description: "The body starts producing ketone bodies from fat as glycogen stores \
                      are nearly exhausted.",
    },
    Milestone {
        id: "fat_burning_increases",
        at_hours: 18,
        name: "Fat Burning Increases",
        description: "Fat breakdown and ketone production ramp up, providing sustained \
                      energy.",
    },
    Milestone {
        id: "autophagy_activated",
        at_hours: 24,
        name: "Autophagy Activated",
        description: "Cellular self-cleaning is significantly upregulated, helping remove \
                      damaged cells.",
    },
    Milestone {
        id: "growth_hormone_surges",
        at_hours: 48,
        name: "Growth Hormone Surges",
        description: "Growth hormone levels can increase substantially, supporting muscle \
                      preservation and fat metabolism.",
    },
    Milestone {
        id: "immune_reset",
        at_hours: 72,
        name: "Immune System Reset",
        description: "Prolonged fasting may trigger the regeneration of immune stem cells.",
    },
];

/// Milestones already reached after `elapsed_seconds` of fasting.
pub fn milestones_reached(elapsed_seconds: u64) -> Vec<&'static Milestone> {
    FASTING_MILESTONES
        .iter()
        .filter(|m| m.at_seconds() <= elapsed_seconds)
        .collect()
}

/// The next milestone ahead of `elapsed_seconds`, if any.
pub fn next_milestone(elapsed_seconds: u64) -> Option<&'static Milestone> {
    FASTING_MILESTONES
        .iter()
        .find(|m| m.at_seconds() > elapsed_seconds)
}

/// Format a duration in seconds as a compact "16h 30m" label.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    } else {
        format!("{minutes}m")
    }
}
