//! SQLite persistence for served quotes.
//!
//! Each successful request appends one row to table `cotacao`. Rows are never
//! updated or deleted. The database file is opened per call and the table is
//! created on first use, so a missing file is not an error.
//!
//! Inserts are bounded by a [`Deadline`]:
//! - it is checked before every step (open, create table, prepare, execute, commit);
//! - SQLite's busy timeout is capped by the time left, which bounds lock waits
//!   when concurrent requests write at the same time;
//! - the row is written inside a transaction that is only committed while the
//!   deadline still holds, so a timed-out insert leaves nothing behind.
use chrono::NaiveDateTime;
use quote_common::{Deadline, Quote, QuoteError, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS cotacao (\
    id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
    date TEXT DEFAULT CURRENT_TIMESTAMP, \
    value TEXT NOT NULL)";

const INSERT_QUOTE: &str = "INSERT INTO cotacao (value) VALUES (?1) RETURNING id, date, value";

const LATEST_QUOTE: &str = "SELECT id, date, value FROM cotacao ORDER BY id DESC LIMIT 1";

/// A row of table `cotacao`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredQuote {
    /// Auto-incremented row id.
    pub id: i64,
    /// Insertion time (UTC), filled in by SQLite.
    pub date: NaiveDateTime,
    /// The bid as a JSON string, e.g. `"5.4321"`.
    pub value: String,
}

impl StoredQuote {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            value: row.get(2)?,
        })
    }
}

/// Handle on the SQLite file. Cheap to clone; holds no open connection.
#[derive(Debug, Clone)]
pub struct QuoteStore {
    path: PathBuf,
}

impl QuoteStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `quote`, finishing before `deadline` or not at all.
    ///
    /// Blocking; call it from a blocking-capable thread.
    pub fn insert(&self, quote: &Quote, deadline: Deadline) -> Result<StoredQuote> {
        // `value` is the JSON-encoded bid, the same bytes the handler responds
        // with. An empty bid is stored as `""`, so stored values are never empty.
        let value = quote.to_json_string()?;
        let mut conn = self.open(&deadline)?;

        deadline.check("begin transaction")?;
        let tx = conn
            .transaction()
            .map_err(persistence("failed to begin transaction"))?;

        let stored = {
            deadline.check("prepare statement")?;
            let mut stmt = tx
                .prepare(INSERT_QUOTE)
                .map_err(persistence("failed to prepare statement"))?;

            deadline.check("execute statement")?;
            stmt.query_row(params![value], StoredQuote::from_row)
                .map_err(persistence("failed to execute statement"))?
        };

        // Dropping `tx` on this error path rolls the insert back.
        deadline.check("commit")?;
        tx.commit().map_err(persistence("failed to commit"))?;

        Ok(stored)
    }

    /// Number of stored quotes.
    pub fn count(&self) -> Result<u64> {
        let conn = self.open(&Deadline::unbounded())?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cotacao", [], |row| row.get(0))
            .map_err(persistence("failed to count quotes"))?;
        Ok(count as u64)
    }

    /// Most recently inserted quote, if any.
    pub fn latest(&self) -> Result<Option<StoredQuote>> {
        let conn = self.open(&Deadline::unbounded())?;
        conn.query_row(LATEST_QUOTE, [], StoredQuote::from_row)
            .optional()
            .map_err(persistence("failed to read latest quote"))
    }

    fn open(&self, deadline: &Deadline) -> Result<Connection> {
        deadline.check("open database")?;
        let conn = Connection::open(&self.path).map_err(persistence("failed to open database"))?;

        if let Some(left) = deadline.remaining()? {
            conn.busy_timeout(left)
                .map_err(persistence("failed to set busy timeout"))?;
        }

        deadline.check("create table")?;
        conn.execute(CREATE_TABLE, [])
            .map_err(persistence("failed to create table"))?;

        Ok(conn)
    }
}

fn persistence(context: &'static str) -> impl Fn(rusqlite::Error) -> QuoteError {
    move |err| QuoteError::Persistence(format!("{context}: {err}"))
}
