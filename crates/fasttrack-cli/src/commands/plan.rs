use clap::Subcommand;
use fasttrack_core::storage::Config;
use fasttrack_core::timer::{milestones_reached, next_milestone, FASTING_MILESTONES, FASTING_PLANS};

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List the available fasting plans
    List,
    /// Show fasting milestones, marking those reached by the running fast
    Milestones,
}

pub fn run(action: PlanAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::List => print_json(&FASTING_PLANS)?,
        PlanAction::Milestones => {
            let config = Config::load_or_default();
            let (mut tracker, _) = open_tracker(&config)?;
            tracker.tick();
            let elapsed = tracker.timer().elapsed_seconds();
            print_json(&serde_json::json!({
                "all": FASTING_MILESTONES,
                "reached": milestones_reached(elapsed),
                "next": next_milestone(elapsed),
            }))?;
        }
    }
    Ok(())
}
