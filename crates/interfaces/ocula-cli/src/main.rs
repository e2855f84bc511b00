use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ocula_app_core::OculaApplication;
use ocula_cli::{commands, CliRole, CliStatus, CliTheme};
use ocula_repository::Latency;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Keep theme preferences in this JSON file instead of in memory
    #[arg(long, global = true, env = "OCULA_PREFS")]
    prefs: Option<PathBuf>,
    /// Simulated backend latency per repository call
    #[arg(long, global = true)]
    latency_ms: Option<u64>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        #[arg(long, env = "OCULA_PASSWORD")]
        password: String,
    },
    Appointments {
        #[arg(long, value_enum)]
        status: Option<CliStatus>,
        #[arg(long, help = "Mark this appointment completed first")]
        complete: Option<String>,
    },
    Customers {
        #[arg(short, long)]
        search: Option<String>,
    },
    Employees {
        #[arg(long, value_enum)]
        role: Option<CliRole>,
    },
    /// Show a patient's care routine
    Care {
        #[arg(long)]
        customer: String,
    },
    /// Show a patient's progress, optionally completing a milestone
    Journey {
        #[arg(long)]
        customer: String,
        #[arg(long)]
        complete: Option<String>,
    },
    Theme {
        #[arg(long)]
        dark: Option<bool>,
        #[arg(long, value_enum)]
        variant: Option<CliTheme>,
        #[arg(long, help = "Restore default theme settings")]
        reset: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("default subscriber")?;

    let latency = match cli.latency_ms {
        Some(ms) => Latency::new(Duration::from_millis(ms)),
        None => Latency::default(),
    };
    let app = match &cli.prefs {
        Some(path) => OculaApplication::with_preferences_file(path, latency)?,
        None => OculaApplication::in_memory(latency),
    };

    match cli.command {
        Commands::Login { email, password } => {
            commands::cmd_login(&app, email, password).await?;
        }
        Commands::Appointments { status, complete } => {
            commands::cmd_appointments(&app, status.map(Into::into), complete).await?;
        }
        Commands::Customers { search } => {
            commands::cmd_customers(&app, search).await?;
        }
        Commands::Employees { role } => {
            commands::cmd_employees(&app, role.map(Into::into)).await?;
        }
        Commands::Care { customer } => {
            commands::cmd_care(&app, customer).await?;
        }
        Commands::Journey { customer, complete } => {
            commands::cmd_journey(&app, customer, complete).await?;
        }
        Commands::Theme {
            dark,
            variant,
            reset,
        } => {
            commands::cmd_theme(&app, dark, variant.map(Into::into), reset).await?;
        }
    }

    Ok(())
}
