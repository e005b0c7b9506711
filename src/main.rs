use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use score_keeper::config::{self, TracingConfig};
use score_keeper::Store;

#[derive(Parser, Debug)]
#[command(version, author, about = "Score keeper database maintenance")]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// Print row counts per table
    Stats,
}

/// Installs the fmt subscriber, plus Jaeger export when configured.
/// Returns whether an OpenTelemetry pipeline needs flushing on exit.
fn install_tracing(config: Option<&TracingConfig>) -> Result<bool, Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match config.and_then(|t| t.jaeger.as_deref()) {
        Some(jaeger) => {
            let tracer = opentelemetry_jaeger::new_agent_pipeline()
                .with_endpoint(jaeger)
                .with_service_name("score-keeper")
                .install_simple()?;
            registry.with(tracing_opentelemetry::layer().with_tracer(tracer)).try_init()?;
            tracing::info!("Installed jaeger tracing");
            Ok(true)
        }
        None => {
            registry.try_init()?;
            Ok(false)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)
        .map_err(|e| format!("Failed to load {}: {}", cli.config.display(), e))?;
    let otel = install_tracing(config.tracing_config.as_ref())?;

    tracing::info!("Opening database...");
    let store = Store::connect(&config.db_config)?;

    match cli.command {
        Command::Migrate => {
            let applied = store.run_migrations()?;
            if applied.is_empty() {
                println!("Schema is up to date");
            } else {
                println!("Applied:\n{}", applied.iter().join("\n"));
            }
        }
        Command::Stats => {
            let counts = store.counts()?;
            println!(
                "users: {}\ngames: {}\nplayers: {}\ngame players: {}",
                counts.users, counts.games, counts.players, counts.game_players
            );
        }
    }

    if otel {
        opentelemetry::global::shutdown_tracer_provider();
    }
    Ok(())
}
