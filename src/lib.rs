//! # Mazestate - DarkMaze game-state persistence
//!
//! Stores each player's maze progress in a single SQLite table and hands it
//! back to the game server.
//!
//! Mazestate provides:
//! - A typed store ([`GameStateStore`]) with create, reset and load operations
//! - Exclusive per-operation transactions ([`storage::ConnectionScope`]) so
//!   concurrent writers serialize instead of racing
//! - Username sanitization applied before every query
//! - A boundary adapter ([`service`]) that logs failures and flattens them to
//!   `bool` / `Option` for callers that only need success or failure

pub mod state;
pub mod sanitize;
pub mod storage;
pub mod service;
pub mod config;
pub mod output;
pub mod ui;

use std::path::{Path, PathBuf};

// Re-exports for convenient access
pub use config::StoreConfig;
pub use state::{Cell, GameStateRecord, GameStateView, MapSize};
pub use storage::{CreateOutcome, GameStateStore};

/// Result type alias for Mazestate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Mazestate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store unavailable at {}: {source}", path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("No game state for user: {0}")]
    NotFound(String),

    #[error("Stored {field} is malformed: {source}")]
    Decode {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn unavailable(path: &Path, source: rusqlite::Error) -> Self {
        Self::StoreUnavailable {
            path: path.to_path_buf(),
            source,
        }
    }
}
