//! Mazestate CLI - inspect and maintain the DarkMaze game-state database

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use mazestate::config::{self, StoreConfig};
use mazestate::service;
use mazestate::storage::GameStateStore;
use mazestate::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "mazestate")]
#[command(version)]
#[command(about = "Game-state store for DarkMaze - create, reset and inspect player progress")]
#[command(long_about = r#"
Mazestate manages the SQLite table holding each player's maze progress.

The database is resolved from --database, then the DB_PATH environment
variable, then `database` in mazestate.toml, then ./game.db.

Example usage:
  mazestate init
  mazestate create alice
  mazestate get alice --json
  mazestate reset alice
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the database file
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and game_state table if missing
    Init,

    /// Ensure a player has a game state (existing players are left alone)
    Create {
        /// Player username
        username: String,
    },

    /// Put an existing player back at the start of the maze
    Reset {
        /// Player username
        username: String,
    },

    /// Show a player's latest game state
    Get {
        /// Player username
        username: String,

        /// Print the JSON payload sent to the game client
        #[arg(long)]
        json: bool,
    },

    /// Show how many players are stored
    Stats,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let file_config = config::load_config(cli.config.as_deref())?;
    let store_config = StoreConfig::resolve(
        cli.database.as_deref(),
        file_config.as_ref(),
        |key| std::env::var(key).ok(),
    );
    config::ensure_db_dir(&store_config.path)?;

    tracing::debug!(path = %store_config.path.display(), "Opening game state store");
    let store = GameStateStore::open(store_config)?;

    match cli.command {
        Commands::Init => {
            ui::header("Game state store ready");
            ui::status(Icons::DATABASE, "Database", &store.config().path.display().to_string());
        }

        Commands::Create { username } => {
            if !service::create_user(&store, &username) {
                anyhow::bail!("could not create user {username}");
            }
            ui::success(&format!("User {username} is ready"));
        }

        Commands::Reset { username } => {
            if !service::reset_game_state(&store, &username) {
                anyhow::bail!("could not reset game state for {username}");
            }
            ui::success(&format!("Game state reset for {username}"));
        }

        Commands::Get { username, json } => {
            let Some(view) = service::get_latest_game_state(&store, &username) else {
                anyhow::bail!("no game state for {username}");
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                ui::section(&format!("{} {}", Icons::PERSON, view.username));
                println!("{}", ui::game_state_table(&view));
            }
        }

        Commands::Stats => {
            let count = store.count_records()?;
            ui::section("Statistics");
            ui::info(&format!("{} Players", Icons::STATS), &count.to_string());
            ui::status(Icons::DATABASE, "Database", &store.config().path.display().to_string());
        }
    }

    Ok(())
}
