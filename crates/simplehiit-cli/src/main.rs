use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "simplehiit-cli", version, about = "SimpleHiit CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run or plan a session
    Session {
        #[command(subcommand)]
        action: commands::session::SessionAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// User management
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// Statistics for one user
    Stats {
        /// User ID
        user_id: i64,
    },
    /// List exercise types and their exercises
    Exercises,
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("SIMPLEHIIT_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Session { action } => commands::session::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Users { action } => commands::users::run(action),
        Commands::Stats { user_id } => commands::stats::run(user_id),
        Commands::Exercises => commands::exercises::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
