//! Game state records and the read view handed to the serving layer

use serde::{Deserialize, Serialize};

/// Level every new or reset player starts on
pub const DEFAULT_LEVEL_NAME: &str = "maze-level-1";

/// Health every new or reset player starts with
pub const DEFAULT_HEALTH: i64 = 3;

/// Width/height of the starting maze
pub const DEFAULT_MAP_SIZE: MapSize = MapSize(10, 10);

/// Cell the player enters the maze on
pub const SEED_CELL: Cell = Cell(1, 0);

/// Message attached to every successful load
pub const LOAD_SUCCESS_MESSAGE: &str = "Load successful";

/// Status code attached to every successful load
pub const LOAD_SUCCESS_STATUS: i64 = 1;

/// A maze cell, serialized as `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell(pub i64, pub i64);

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Maze dimensions, serialized as `[width, height]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSize(pub i64, pub i64);

impl std::fmt::Display for MapSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.0, self.1)
    }
}

/// One row of `game_state`, minus the storage id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateRecord {
    pub username: String,
    pub current_level_name: String,
    pub map_size: MapSize,
    pub health: i64,
    pub path: Vec<Cell>,
    pub current_position: Cell,
}

impl GameStateRecord {
    /// Record with the starting values used by both creation and reset
    pub fn with_defaults(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            current_level_name: DEFAULT_LEVEL_NAME.to_string(),
            map_size: DEFAULT_MAP_SIZE,
            health: DEFAULT_HEALTH,
            path: vec![SEED_CELL],
            current_position: SEED_CELL,
        }
    }

    /// Whether every mutable field matches the starting values
    pub fn is_default(&self) -> bool {
        *self == Self::with_defaults(self.username.clone())
    }

    /// Wrap the record in the load envelope expected by the serving layer
    pub fn into_view(self) -> GameStateView {
        GameStateView {
            username: self.username,
            current_level_name: self.current_level_name,
            map_size: self.map_size,
            health: self.health,
            path: self.path,
            current_position: self.current_position,
            message: LOAD_SUCCESS_MESSAGE.to_string(),
            cookies: Vec::new(),
            status: LOAD_SUCCESS_STATUS,
        }
    }
}

/// What `get_latest_game_state` hands back across the service boundary.
///
/// Serializes to the JSON shape the game server forwards to the browser:
/// `{username, current_level_name, map_size, health, path, current_position,
/// message, cookies, status}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    pub username: String,
    pub current_level_name: String,
    pub map_size: MapSize,
    pub health: i64,
    pub path: Vec<Cell>,
    pub current_position: Cell,
    pub message: String,
    /// Reserved, always empty
    pub cookies: Vec<serde_json::Value>,
    pub status: i64,
}

impl GameStateView {
    /// Drop the envelope and keep the stored fields
    pub fn record(&self) -> GameStateRecord {
        GameStateRecord {
            username: self.username.clone(),
            current_level_name: self.current_level_name.clone(),
            map_size: self.map_size,
            health: self.health,
            path: self.path.clone(),
            current_position: self.current_position,
        }
    }
}
