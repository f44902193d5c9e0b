mod commands;
mod datetime;
mod notifier;
mod render;

use std::sync::Arc;

use agenda_core::clock::SystemClock;
use agenda_core::config::AgendaConfig;
use agenda_core::store::{EventStore, FileStore};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::render::short_id;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Schedule recurring events and get reminded before they start")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Repeat {
    Once,
    Daily,
    Yearly,
    Custom,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new event (prompts for a missing title or time)
    New {
        title: Option<String>,

        /// Start date/time (e.g., "2026-03-20T15:00" or "friday 7pm")
        #[arg(short, long)]
        at: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        /// Free-form event type, e.g. "concert"
        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long, value_enum)]
        repeat: Option<Repeat>,

        /// Weekdays for a custom rule, e.g. "tuesday,thursday" (implies --repeat custom)
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,

        /// Last day of a custom rule
        #[arg(long)]
        until: Option<String>,

        /// Maximum number of occurrences of a custom rule
        #[arg(long)]
        count: Option<u32>,

        /// Remind this many minutes before each occurrence
        #[arg(long)]
        remind: Option<i64>,
    },
    /// List upcoming events
    List {
        /// Match title or description
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        /// Date prefix, e.g. "2026-03" or "2026-03-20"
        #[arg(short, long)]
        date: Option<String>,

        /// Only favorites
        #[arg(short, long)]
        favorites: bool,

        /// Show at most this many events
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Change a single occurrence
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New start date/time
        #[arg(short, long)]
        at: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short = 't', long = "type")]
        event_type: Option<String>,

        #[arg(short, long)]
        location: Option<String>,
    },
    /// Delete a single occurrence
    Delete { id: String },
    /// Mark or unmark an occurrence as favorite
    Favorite { id: String },
    /// Set or clear the reminder of an occurrence
    Remind {
        id: String,

        /// Minutes before the start
        #[arg(required_unless_present = "off", conflicts_with = "off")]
        minutes: Option<i64>,

        #[arg(long)]
        off: bool,
    },
    /// Run the reminder scheduler until interrupted
    Watch,
    /// Show configuration paths and values
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AgendaConfig::load()?;

    match cli.command {
        Commands::New {
            title,
            at,
            description,
            category,
            event_type,
            location,
            repeat,
            days,
            until,
            count,
            remind,
        } => {
            let args = commands::new::NewArgs {
                title,
                at,
                description,
                category,
                event_type,
                location,
                repeat,
                days,
                until,
                count,
                remind,
            };
            commands::new::run(args, &mut open_store(&config), config)
        }
        Commands::List {
            search,
            category,
            event_type,
            date,
            favorites,
            limit,
        } => {
            let filter = agenda_core::filter::EventFilter {
                search,
                category,
                event_type,
                date,
                favorites_only: favorites,
            };
            commands::list::run(&open_store(&config), &filter, limit)
        }
        Commands::Edit {
            id,
            title,
            at,
            description,
            category,
            event_type,
            location,
        } => {
            let mut store = open_store(&config);
            let id = resolve_id(&store, &id)?;
            let changes = commands::edit::Changes {
                title,
                at,
                description,
                category,
                event_type,
                location,
            };
            commands::edit::run(&mut store, &id, changes)
        }
        Commands::Delete { id } => {
            let mut store = open_store(&config);
            let id = resolve_id(&store, &id)?;
            commands::delete::run(&mut store, &id)
        }
        Commands::Favorite { id } => {
            let mut store = open_store(&config);
            let id = resolve_id(&store, &id)?;
            commands::favorite::run(&mut store, &id)
        }
        Commands::Remind { id, minutes, off } => {
            let mut store = open_store(&config);
            let id = resolve_id(&store, &id)?;
            let minutes = if off { None } else { minutes };
            commands::remind::run(&mut store, &id, minutes, config)
        }
        Commands::Watch => commands::watch::run(open_store(&config), config).await,
        Commands::Config => commands::config::run(&config),
    }
}

fn open_store(config: &AgendaConfig) -> EventStore<FileStore> {
    EventStore::load(
        FileStore::new(config.data_path()),
        Arc::new(SystemClock),
        config.weekday_names,
    )
}

/// Accept a full id or any unambiguous prefix of one.
fn resolve_id(store: &EventStore<FileStore>, input: &str) -> Result<String> {
    if store.get(input).is_some() {
        return Ok(input.to_string());
    }

    let matches: Vec<&str> = store
        .events()
        .iter()
        .map(|e| e.id.as_str())
        .filter(|id| id.starts_with(input))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => anyhow::bail!(
            "No event with id '{}'.\n\nRun `agenda list` to see event ids.",
            input
        ),
        many => {
            let shown: Vec<_> = many.iter().map(|id| short_id(id)).collect();
            anyhow::bail!(
                "Id '{}' is ambiguous. Matches: {}",
                input,
                shown.join(", ")
            )
        }
    }
}
