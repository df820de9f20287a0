use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "dailydose", version, about = "Take it or pay for it: daily habit tracker")]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today instead of the local clock
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Balance, streak and today's day
    Status,
    /// Month-by-month day grid
    Calendar,
    /// Mark today's day as completed
    Take {
        #[command(flatten)]
        target: commands::decide::Target,
    },
    /// Mark today's day as missed
    Miss {
        #[command(flatten)]
        target: commands::decide::Target,
    },
    /// Running balance, totals and activity log
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("DAILYDOSE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let ctx = commands::Context {
        today: cli.today,
        json: cli.json,
    };
    let result = match cli.command {
        Commands::Status => commands::status::run(&ctx),
        Commands::Calendar => commands::calendar::run(&ctx),
        Commands::Take { target } => {
            commands::decide::run(&ctx, dailydose_core::Decision::Completed, target)
        }
        Commands::Miss { target } => {
            commands::decide::run(&ctx, dailydose_core::Decision::Missed, target)
        }
        Commands::Stats => commands::stats::run(&ctx),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
