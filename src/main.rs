//! # Celebrations CLI
//!
//! Birthday and work-anniversary reminders for Slack, meant to run once a day
//! from cron or a CI scheduler.
//!
//! Usage:
//!   celebrations send-reminders                   # Notify for today
//!   celebrations send-reminders --date 2024-06-01 # Pretend it is another day
//!   celebrations send-reminders --dry-run         # Log instead of sending
//!   celebrations download-users                   # Write people.toml from Slack
//!   celebrations config show                      # Show configuration
//!   celebrations version                          # Print version

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use celebrations_channels::roster::{self, DEFAULT_LIMIT, DEFAULT_OUTPUT};
use celebrations_channels::{DryRunNotifier, SlackClient};
use celebrations_core::types::DATE_FORMAT;
use celebrations_core::{CelebrationsConfig, Clock, FixedClock, Notifier, SystemClock};
use celebrations_engine::Dispatcher;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "celebrations",
    version,
    about = "🎂 Celebrations — birthday and work anniversary reminders for Slack"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send today's reminders to Slack
    SendReminders {
        /// Run as if today were this date (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// Log notifications instead of sending them
        #[arg(long)]
        dry_run: bool,
    },

    /// Download users from Slack into a people file
    /// (bots and deleted users are skipped)
    DownloadUsers {
        /// Maximum number of users to download
        #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print version
    Version,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (tokens masked)
    Show,
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn load_config(path: Option<&Path>) -> Result<CelebrationsConfig> {
    let config = match path {
        Some(path) => CelebrationsConfig::load_from(path),
        None => CelebrationsConfig::load(),
    };
    config.context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "celebrations=debug,celebrations_core=debug,celebrations_engine=debug,celebrations_channels=debug"
    } else {
        "celebrations=info,celebrations_engine=info,celebrations_channels=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.command {
        Commands::SendReminders { date, dry_run } => {
            let config = load_config(cli.config.as_deref())?;

            let clock: Box<dyn Clock> = match date {
                Some(d) => Box::new(FixedClock(d)),
                None => Box::new(SystemClock),
            };
            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(DryRunNotifier)
            } else {
                if config.slack.features.birthdays_personal_reminder.enabled
                    && config.slack.user_token.trim().is_empty()
                {
                    anyhow::bail!("slack.user_token is required when birthdays_personal_reminder is enabled");
                }
                Box::new(SlackClient::new(&config.slack)?)
            };

            let dispatcher = Dispatcher::from_config(&config.slack.features);
            let report = dispatcher
                .run(&*clock, &config.people, &*notifier)
                .await;

            if report.tally.failed > 0 {
                tracing::warn!("{} notifications failed, see errors above", report.tally.failed);
            }
        }

        Commands::DownloadUsers { limit, output } => {
            let config = load_config(cli.config.as_deref())?;
            let client = SlackClient::new(&config.slack)?;

            let people = roster::download_people(&client, &config.slack.downloading_users, limit)
                .await
                .context("Error downloading users from Slack")?;
            let count = people.len();
            roster::write_people_file(&output, people)
                .with_context(|| format!("Error writing {}", output.display()))?;

            tracing::info!("{count} users downloaded and persisted to file {}", output.display());
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let config = load_config(cli.config.as_deref())?;
                let content = toml::to_string_pretty(&config.masked())?;
                println!("{content}");
            }
        },

        Commands::Version => {
            println!("celebrations v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
