mod engine;
mod plan;
mod session;

pub use engine::{FastingTimer, TimerPhase, TIMER_STATE_KEY};
pub use plan::{
    format_duration, milestones_reached, next_milestone, plan_by_id, FastingPlan, Milestone,
    FASTING_MILESTONES, FASTING_PLANS,
};
pub use session::{CompletedFast, CompletionTrigger, PersistedSession};
