//! Database schema definitions

/// SQL to create the game_state table
///
/// `map_size`, `path` and `current_position` hold JSON arrays of integers.
pub const CREATE_GAME_STATE_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS game_state (
    id INTEGER PRIMARY KEY,
    username TEXT UNIQUE,
    current_level_name TEXT,
    map_size TEXT,
    health INTEGER,
    path TEXT,
    current_position TEXT
)
"#;

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    vec![CREATE_GAME_STATE_TABLE]
}
