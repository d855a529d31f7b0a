use clap::Subcommand;
use fasttrack_core::storage::Config;
use fasttrack_core::timer::plan_by_id;
use fasttrack_core::StartOutcome;

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum FastAction {
    /// Begin a new fast
    Start {
        /// Plan id to switch to before starting (e.g. "16:8")
        #[arg(long)]
        plan: Option<String>,
        /// Custom goal in hours (implies the custom plan)
        #[arg(long)]
        hours: Option<u64>,
    },
    /// Print current timer state as JSON (ticks the timer)
    Status,
    /// End the running fast and queue it for review
    Stop,
    /// Abandon the running fast without recording it
    Reset,
}

pub fn run(action: FastAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();

    if let FastAction::Start { plan, hours } = &action {
        if let Some(hours) = hours {
            config.set("fasting.plan", "custom")?;
            config.set("fasting.custom_goal_hours", &hours.to_string())?;
        } else if let Some(plan) = plan {
            if plan_by_id(plan).is_none() {
                return Err(format!("unknown plan '{plan}'; see `plan list`").into());
            }
            config.set("fasting.plan", plan)?;
        }
    }

    let (mut tracker, restored) = open_tracker(&config)?;
    if let Some(event) = &restored {
        print_json(event)?;
    }

    match action {
        FastAction::Start { .. } => match tracker.start_fast() {
            StartOutcome::Started(event) => print_json(&event)?,
            StartOutcome::ReviewPending => {
                print_json(&tracker.review().pending())?;
                eprintln!("a completed fast is awaiting review; save or discard it first");
            }
            StartOutcome::AlreadyActive => {
                eprintln!("a fast is already running");
                print_json(&tracker.timer().snapshot())?;
            }
        },
        FastAction::Status => {
            if let Some(event) = tracker.tick() {
                print_json(&event)?;
            }
            print_json(&tracker.timer().snapshot())?;
        }
        FastAction::Stop => match tracker.stop_fast() {
            Some(event) => print_json(&event)?,
            None => eprintln!("no fast is running"),
        },
        FastAction::Reset => {
            if let Some(event) = tracker.reset_timer() {
                print_json(&event)?;
            }
        }
    }

    Ok(())
}
