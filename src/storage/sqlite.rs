//! SQLite storage implementation

use rusqlite::{OptionalExtension, Transaction, params};
use serde::de::DeserializeOwned;

use super::schema;
use super::scope::ConnectionScope;
use crate::config::StoreConfig;
use crate::sanitize::sanitize_username;
use crate::state::{Cell, GameStateRecord, GameStateView, MapSize};
use crate::{Error, Result};

/// What `create_user` found when it ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    /// The username was taken; the existing row is untouched
    AlreadyExists,
}

/// SQLite-backed storage for player game state.
///
/// Holds only configuration; every call opens its own [`ConnectionScope`],
/// so a single store can be cloned or shared across threads.
#[derive(Debug, Clone)]
pub struct GameStateStore {
    config: StoreConfig,
}

impl GameStateStore {
    /// Open a database file (creates the file and table if missing)
    pub fn open(config: StoreConfig) -> Result<Self> {
        let store = Self { config };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn scope(&self) -> Result<ConnectionScope> {
        ConnectionScope::open(&self.config)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        self.scope()?.run(|tx| {
            for stmt in schema::all_schema_statements() {
                tx.execute(stmt, [])?;
            }
            Ok(())
        })
    }

    // ========== Game State Operations ==========

    /// Insert a fresh record for `username`, or leave an existing one alone
    pub fn create_user(&self, username: &str) -> Result<CreateOutcome> {
        let username = sanitize_username(username);
        let fields = EncodedFields::encode(&GameStateRecord::with_defaults(username.as_ref()))?;

        self.scope()?.run(|tx| {
            let inserted = tx.execute(
                r#"
                INSERT INTO game_state (username, current_level_name, map_size, health, path, current_position)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    username.as_ref(),
                    fields.current_level_name,
                    fields.map_size,
                    fields.health,
                    fields.path,
                    fields.current_position,
                ],
            );

            match inserted {
                Ok(_) => {
                    tracing::info!(username = %username, "User created");
                    Ok(CreateOutcome::Created)
                }
                Err(e) if is_unique_violation(&e) => {
                    tracing::info!(username = %username, "User already exists");
                    Ok(CreateOutcome::AlreadyExists)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Put an existing record back to the starting values.
    ///
    /// Fails with [`Error::NotFound`] rather than creating the record.
    pub fn reset_game_state(&self, username: &str) -> Result<()> {
        let username = sanitize_username(username);
        let fields = EncodedFields::encode(&GameStateRecord::with_defaults(username.as_ref()))?;

        self.scope()?.run(|tx| {
            if find_id(tx, &username)?.is_none() {
                return Err(Error::NotFound(username.to_string()));
            }

            tx.execute(
                r#"
                UPDATE game_state
                SET current_level_name = ?1, map_size = ?2, health = ?3, path = ?4, current_position = ?5
                WHERE username = ?6
                "#,
                params![
                    fields.current_level_name,
                    fields.map_size,
                    fields.health,
                    fields.path,
                    fields.current_position,
                    username.as_ref(),
                ],
            )?;

            tracing::info!(username = %username, "Game state reset");
            Ok(())
        })
    }

    /// Load the stored record for `username`, wrapped in the load envelope
    pub fn get_latest_game_state(&self, username: &str) -> Result<GameStateView> {
        let username = sanitize_username(username);

        let raw = self.scope()?.run(|tx| {
            tx.query_row(
                r#"
                SELECT username, current_level_name, map_size, health, path, current_position
                FROM game_state WHERE username = ?1
                "#,
                [username.as_ref()],
                row_to_raw,
            )
            .optional()
            .map_err(Into::into)
        })?;

        let raw = raw.ok_or_else(|| Error::NotFound(username.to_string()))?;
        Ok(raw.decode()?.into_view())
    }

    /// Count all records
    pub fn count_records(&self) -> Result<usize> {
        let count: i64 = self
            .scope()?
            .run(|tx| Ok(tx.query_row("SELECT COUNT(*) FROM game_state", [], |row| row.get(0))?))?;
        Ok(count as usize)
    }
}

fn find_id(tx: &Transaction<'_>, username: &str) -> Result<Option<i64>> {
    tx.query_row("SELECT id FROM game_state WHERE username = ?1", [username], |row| row.get(0))
        .optional()
        .map_err(Into::into)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Structured columns in their stored (JSON text) form
struct EncodedFields {
    current_level_name: String,
    map_size: String,
    health: i64,
    path: String,
    current_position: String,
}

impl EncodedFields {
    fn encode(record: &GameStateRecord) -> Result<Self> {
        Ok(Self {
            current_level_name: record.current_level_name.clone(),
            map_size: serde_json::to_string(&record.map_size).map_err(Error::Encode)?,
            health: record.health,
            path: serde_json::to_string(&record.path).map_err(Error::Encode)?,
            current_position: serde_json::to_string(&record.current_position).map_err(Error::Encode)?,
        })
    }
}

/// A row as read, before the JSON columns are parsed
struct RawRow {
    username: String,
    current_level_name: String,
    map_size: String,
    health: i64,
    path: String,
    current_position: String,
}

fn row_to_raw(row: &rusqlite::Row) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        username: row.get("username")?,
        current_level_name: row.get("current_level_name")?,
        map_size: row.get("map_size")?,
        health: row.get("health")?,
        path: row.get("path")?,
        current_position: row.get("current_position")?,
    })
}

impl RawRow {
    fn decode(self) -> Result<GameStateRecord> {
        let map_size: MapSize = decode_field("map_size", &self.map_size)?;
        let path: Vec<Cell> = decode_field("path", &self.path)?;
        let current_position: Cell = decode_field("current_position", &self.current_position)?;

        Ok(GameStateRecord {
            username: self.username,
            current_level_name: self.current_level_name,
            map_size,
            health: self.health,
            path,
            current_position,
        })
    }
}

fn decode_field<T: DeserializeOwned>(field: &'static str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|source| Error::Decode { field, source })
}
