//! DuckDB adapter - local persistent storage
//!
//! Implements the [`ListStore`] port against a local DuckDB file and
//! additionally holds the credential table used by the local session
//! provider. This is the fallback used when no remote document store
//! is configured; it mirrors the remote contract exactly (whole-list
//! documents, last write wins).

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use duckdb::{params, Connection};

use crate::domain::result::{Error, Result, SessionError};
use crate::domain::List;
use crate::migrations::MIGRATIONS;
use crate::ports::ListStore;
use crate::services::MigrationService;

/// Maximum number of retries when the database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("file is already open")
}

/// A local user credential row
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
}

/// DuckDB-backed list store and credential table
pub struct DuckDbStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbStore {
    /// Open (or create) the database at `db_path`.
    ///
    /// Includes retry logic with exponential backoff for file locking
    /// errors, which can occur when two invocations race on startup.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    return Ok(Self {
                        conn: Mutex::new(conn),
                        db_path: db_path.to_path_buf(),
                    });
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::database(format!("failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    fn try_open_connection(db_path: &Path) -> Result<Connection> {
        // Disable extension autoloading to avoid macOS code signing issues
        // (cached extensions in ~/.duckdb/extensions may have different Team IDs)
        let config = duckdb::Config::default()
            .enable_autoload_extension(false)
            .map_err(db_err)?;
        let conn = Connection::open_with_flags(db_path, config).map_err(db_err)?;
        Ok(conn)
    }

    /// Ensure the schema exists, applying any pending migrations
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        MigrationService::new(&conn, MIGRATIONS)
            .run_pending()
            .map_err(|e| Error::database(e.to_string()))?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::database(format!("lock poisoned: {}", e)))
    }

    // === Local user credentials ===

    /// Insert a new credential row. Fails with `EmailAlreadyInUse` when
    /// the email is taken.
    pub fn insert_user(&self, record: &UserRecord) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO sys_users (user_id, email, display_name, password_hash)
             VALUES (?, ?, ?, ?)",
            params![
                record.user_id,
                record.email,
                record.display_name,
                record.password_hash
            ],
        )
        .map_err(|e| {
            let msg = e.to_string();
            if msg.to_lowercase().contains("constraint") {
                Error::Session(SessionError::EmailAlreadyInUse)
            } else {
                db_err(e)
            }
        })?;
        Ok(())
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT user_id, email, display_name, password_hash
                 FROM sys_users WHERE lower(email) = lower(?)",
            )
            .map_err(db_err)?;

        let record = stmt
            .query_row([email], |row| {
                Ok(UserRecord {
                    user_id: row.get(0)?,
                    email: row.get(1)?,
                    display_name: row.get(2)?,
                    password_hash: row.get(3)?,
                })
            })
            .ok();

        Ok(record)
    }

    /// Number of lists stored for a user (used by the status summary)
    pub fn count_lists(&self, user_id: &str) -> Result<i64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sys_lists WHERE user_id = ?",
                [user_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;
        Ok(count)
    }
}

impl ListStore for DuckDbStore {
    fn list_all(&self, user_id: &str) -> Result<Vec<List>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare("SELECT doc FROM sys_lists WHERE user_id = ?")
            .map_err(db_err)?;

        let docs: Vec<String> = stmt
            .query_map([user_id], |row| row.get(0))
            .map_err(db_err)?
            .filter_map(|r| r.ok())
            .collect();

        let mut lists = Vec::with_capacity(docs.len());
        for doc in docs {
            lists.push(serde_json::from_str(&doc)?);
        }
        Ok(lists)
    }

    fn put(&self, list: &List) -> Result<()> {
        let doc = serde_json::to_string(list)?;
        let conn = self.lock_conn()?;
        // Whole-document upsert keyed by list id; last write wins
        conn.execute(
            "INSERT OR REPLACE INTO sys_lists (list_id, user_id, doc) VALUES (?, ?, ?)",
            params![list.id.to_string(), list.user_id, doc],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn delete_all(&self, user_id: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        // A single DELETE statement, so the batch is atomic
        conn.execute("DELETE FROM sys_lists WHERE user_id = ?", [user_id])
            .map_err(db_err)?;
        Ok(())
    }
}

fn db_err(e: duckdb::Error) -> Error {
    Error::database(e.to_string())
}
