use clap::{Parser, Subcommand};
use sleepwell_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod bell;
mod commands;

#[derive(Parser)]
#[command(name = "sleepwell", version, about = "SleepWell sleep tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive tracker: start, wake, snooze and the alarm
    Run,
    /// Sleep history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Sleep goal, alarm style and snooze length
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Generate an AI summary of recent sleep
    Summary,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// API key management for the summary service
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Run => commands::run::run(&config),
        Commands::History { action } => commands::history::run(action),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Summary => commands::summary::run(&config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Auth { action } => commands::auth::run(action, &config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
