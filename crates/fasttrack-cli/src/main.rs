use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fasttrack-cli", version, about = "FastTrack CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fasting timer control
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Completed-fast review
    Review {
        #[command(subcommand)]
        action: commands::review::ReviewAction,
    },
    /// Fasting plans and milestones
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fast { action } => commands::fast::run(action),
        Commands::Review { action } => commands::review::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
