//! Storage Layer - SQLite-backed persistence
//!
//! A single table, `game_state(id, username, current_level_name, map_size,
//! health, path, current_position)`, one row per player. Every operation
//! runs inside its own [`ConnectionScope`]: a fresh connection holding an
//! exclusive transaction, so concurrent callers serialize on the file lock.

pub mod schema;
pub mod scope;
pub mod sqlite;

pub use scope::ConnectionScope;
pub use sqlite::{CreateOutcome, GameStateStore};
