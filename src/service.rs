//! Boundary adapter for the game server.
//!
//! The server only distinguishes "worked" from "didn't". These functions log
//! the cause with the operation and username, then flatten it: `false` for
//! create/reset, `None` for load. Callers that need the cause should use
//! [`GameStateStore`] directly.

use tracing::{error, warn};

use crate::state::GameStateView;
use crate::storage::GameStateStore;
use crate::Error;

/// Ensure `username` has a record. Already existing counts as success.
pub fn create_user(store: &GameStateStore, username: &str) -> bool {
    match store.create_user(username) {
        Ok(_) => true,
        Err(e) => {
            error!(username, error = %e, "Error creating user");
            false
        }
    }
}

/// Reset `username` to the starting state; `false` if there is no record
pub fn reset_game_state(store: &GameStateStore, username: &str) -> bool {
    match store.reset_game_state(username) {
        Ok(()) => true,
        Err(Error::NotFound(name)) => {
            warn!(username = %name, "User not found");
            false
        }
        Err(e) => {
            error!(username, error = %e, "Error resetting game state");
            false
        }
    }
}

/// Load `username`'s state; `None` on absence or any failure
pub fn get_latest_game_state(store: &GameStateStore, username: &str) -> Option<GameStateView> {
    match store.get_latest_game_state(username) {
        Ok(view) => Some(view),
        Err(Error::NotFound(name)) => {
            warn!(username = %name, "Game state not found for user");
            None
        }
        Err(e) => {
            error!(username, error = %e, "Error getting game state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn test_flattened_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStateStore::open(StoreConfig::new(dir.path().join("game.db"))).unwrap();

        assert!(get_latest_game_state(&store, "alice").is_none());
        assert!(!reset_game_state(&store, "alice"));

        assert!(create_user(&store, "alice"));
        assert!(create_user(&store, "alice"));
        assert!(reset_game_state(&store, "alice"));

        let view = get_latest_game_state(&store, "alice").unwrap();
        assert_eq!(view.message, "Load successful");
    }

    #[test]
    fn test_unavailable_store_collapses() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStateStore::open(StoreConfig::new(dir.path().join("game.db"))).unwrap();
        std::fs::remove_dir_all(dir.path()).unwrap();

        assert!(!create_user(&store, "alice"));
        assert!(!reset_game_state(&store, "alice"));
        assert!(get_latest_game_state(&store, "alice").is_none());
    }
}
