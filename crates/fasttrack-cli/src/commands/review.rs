use clap::Subcommand;
use fasttrack_core::storage::Config;
use fasttrack_core::FastLogClient;

use super::{open_tracker, print_json};

#[derive(Subcommand)]
pub enum ReviewAction {
    /// Show the completed fast awaiting review, if any
    Show,
    /// Save the pending fast to the logging endpoint
    Save {
        /// Free-text notes to attach
        #[arg(long)]
        notes: Option<String>,
    },
    /// Discard the pending fast without saving
    Discard,
}

pub fn run(action: ReviewAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let (mut tracker, _) = open_tracker(&config)?;

    match action {
        ReviewAction::Show => {
            print_json(&serde_json::json!({
                "pending": tracker.review().pending(),
                "notes": tracker.review().notes(),
                "visible": tracker.review().is_visible(),
            }))?;
        }
        ReviewAction::Save { notes } => {
            if tracker.review().pending().is_none() {
                eprintln!("no fast is awaiting review");
                return Ok(());
            }
            if let Some(notes) = notes {
                tracker.review_mut().set_notes(notes);
            }
            let client = FastLogClient::from_config(&config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            if let Some(notification) = runtime.block_on(tracker.save_fast(&client)) {
                eprintln!("{}: {}", notification.title(), notification.body());
                print_json(&notification)?;
            }
        }
        ReviewAction::Discard => {
            let notification = tracker.discard_fast();
            eprintln!("{}: {}", notification.title(), notification.body());
            print_json(&notification)?;
        }
    }

    Ok(())
}
