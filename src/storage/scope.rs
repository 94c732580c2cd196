//! Per-operation connection with an exclusive transaction

use std::path::{Path, PathBuf};

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::config::StoreConfig;
use crate::{Error, Result};

/// One connection, held for exactly one store operation.
///
/// [`ConnectionScope::run`] takes the database-wide write lock with
/// `BEGIN EXCLUSIVE`, commits when the closure succeeds, rolls back when it
/// fails, and closes the connection either way. A failure while closing is
/// logged and dropped so it never replaces the operation's own result.
pub struct ConnectionScope {
    conn: Connection,
    path: PathBuf,
}

impl ConnectionScope {
    /// Open a connection to the configured database file
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let conn = Connection::open(&config.path)
            .map_err(|source| Error::unavailable(&config.path, source))?;
        conn.busy_timeout(config.busy_timeout)
            .map_err(|source| Error::unavailable(&config.path, source))?;

        Ok(Self {
            conn,
            path: config.path.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` inside an exclusive transaction, then close the connection
    pub fn run<T, F>(mut self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let result = exclusive(&mut self.conn, &self.path, f);
        self.close();
        result
    }

    fn close(self) {
        if let Err((_conn, e)) = self.conn.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "Error closing database connection");
        }
    }
}

fn exclusive<T, F>(conn: &mut Connection, path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&Transaction<'_>) -> Result<T>,
{
    // Blocks up to the busy timeout while another scope holds the lock
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Exclusive)
        .map_err(|source| Error::unavailable(path, source))?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = tx.rollback() {
                tracing::warn!(path = %path.display(), error = %e, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    fn temp_config() -> (tempfile::TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("scope.db"));
        (dir, config)
    }

    fn create_table(config: &StoreConfig) {
        ConnectionScope::open(config)
            .unwrap()
            .run(|tx| {
                tx.execute("CREATE TABLE t (v INTEGER)", [])?;
                Ok(())
            })
            .unwrap();
    }

    fn count(config: &StoreConfig) -> i64 {
        ConnectionScope::open(config)
            .unwrap()
            .run(|tx| Ok(tx.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))?))
            .unwrap()
    }

    #[test]
    fn test_commit_on_success() {
        let (_dir, config) = temp_config();
        create_table(&config);

        ConnectionScope::open(&config)
            .unwrap()
            .run(|tx| {
                tx.execute("INSERT INTO t (v) VALUES (1)", [])?;
                Ok(())
            })
            .unwrap();

        assert_eq!(count(&config), 1);
    }

    #[test]
    fn test_rollback_on_error() {
        let (_dir, config) = temp_config();
        create_table(&config);

        let result: Result<()> = ConnectionScope::open(&config).unwrap().run(|tx| {
            tx.execute("INSERT INTO t (v) VALUES (1)", [])?;
            Err(Error::NotFound("nobody".to_string()))
        });

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(count(&config), 0);
    }

    #[test]
    fn test_open_failure_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("missing").join("dir").join("x.db"));

        let result = ConnectionScope::open(&config);
        assert!(matches!(result, Err(Error::StoreUnavailable { .. })));
    }

    #[test]
    fn test_lock_held_blocks_second_scope() {
        let (_dir, config) = temp_config();
        create_table(&config);
        let impatient = config.clone().with_busy_timeout(Duration::from_millis(50));

        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        std::thread::scope(|s| {
            let holder = s.spawn(move || {
                ConnectionScope::open(&config).unwrap().run(|_tx| {
                    locked_tx.send(()).unwrap();
                    release_rx.recv().unwrap();
                    Ok(())
                })
            });

            locked_rx.recv().unwrap();
            let blocked = ConnectionScope::open(&impatient).and_then(|scope| scope.run(|_tx| Ok(())));
            assert!(matches!(blocked, Err(Error::StoreUnavailable { .. })));

            release_tx.send(()).unwrap();
            holder.join().unwrap().unwrap();
        });

        // Lock released once the holder's scope closed
        assert_eq!(count(&impatient), 0);
    }
}
