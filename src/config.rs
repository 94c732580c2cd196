use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the database file
pub const DB_PATH_ENV: &str = "DB_PATH";

/// Database file used when nothing else is configured
pub const DEFAULT_DB_PATH: &str = "game.db";

/// How long a caller waits on another caller's exclusive lock
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// On-disk settings file (`mazestate.toml`)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MazestateConfig {
    pub database: Option<String>,
    pub busy_timeout_ms: Option<u64>,
}

/// Where the store lives and how long it waits for the lock.
///
/// Passed to [`crate::GameStateStore::open`]; the store never reads the
/// environment itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub busy_timeout: Duration,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Resolve from `DB_PATH`, falling back to `game.db`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = lookup(DB_PATH_ENV)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        Self::new(path)
    }

    /// Resolve with precedence: explicit path, `DB_PATH`, config file, default
    pub fn resolve(
        explicit: Option<&Path>,
        file: Option<&MazestateConfig>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| lookup(DB_PATH_ENV).filter(|v| !v.trim().is_empty()).map(PathBuf::from))
            .or_else(|| file.and_then(|c| c.database.as_ref()).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let busy_timeout = file
            .and_then(|c| c.busy_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT);

        Self { path, busy_timeout }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DB_PATH)
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("mazestate.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<MazestateConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: MazestateConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

pub fn ensure_db_dir(db_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_default() {
        let config = StoreConfig::from_lookup(|_| None);
        assert_eq!(config.path, PathBuf::from("game.db"));
        assert_eq!(config.busy_timeout, DEFAULT_BUSY_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_env() {
        let config = StoreConfig::from_lookup(|key| {
            (key == DB_PATH_ENV).then(|| "/tmp/maze/state.db".to_string())
        });
        assert_eq!(config.path, PathBuf::from("/tmp/maze/state.db"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = StoreConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.path, PathBuf::from("game.db"));
    }

    #[test]
    fn test_resolve_precedence() {
        let file = MazestateConfig {
            database: Some("from_file.db".to_string()),
            busy_timeout_ms: Some(250),
        };

        let config = StoreConfig::resolve(Some(Path::new("explicit.db")), Some(&file), |_| {
            Some("from_env.db".to_string())
        });
        assert_eq!(config.path, PathBuf::from("explicit.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));

        let config = StoreConfig::resolve(None, Some(&file), |_| Some("from_env.db".to_string()));
        assert_eq!(config.path, PathBuf::from("from_env.db"));

        let config = StoreConfig::resolve(None, Some(&file), |_| None);
        assert_eq!(config.path, PathBuf::from("from_file.db"));

        let config = StoreConfig::resolve(None, None, |_| None);
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mazestate.toml");
        assert!(load_config(Some(&path)).unwrap().is_none());

        std::fs::write(&path, "database = \"saves/game.db\"\nbusy_timeout_ms = 1000\n").unwrap();
        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.as_deref(), Some("saves/game.db"));
        assert_eq!(config.busy_timeout_ms, Some(1000));
    }

    #[test]
    fn test_ensure_db_dir_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("game.db");
        ensure_db_dir(&db_path).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
