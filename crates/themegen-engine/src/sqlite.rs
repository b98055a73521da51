//! `SQLite`-backed source and destination adapters.
//!
//! Stand-ins for the warehouse/transactional collaborators: the source
//! paginates an existing table in rowid order, the sink writes each
//! window's rows inside a single transaction. Each adapter holds one
//! `Mutex<Connection>` and runs its queries on the blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use themegen_types::{
    CommitRecord, DestinationError, RecordId, SourceError, SourceRecord, Window,
};

use crate::destination::ThemeSink;
use crate::source::RecordSource;

/// Quote an identifier for embedding in SQL text.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn json_from_column(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
        // Binary columns carry no promptable content.
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}

/// Extract a record id from its column value; integer and text ids are
/// both accepted, NULL and missing are not.
fn id_from_value(value: &serde_json::Value) -> Option<RecordId> {
    match value {
        serde_json::Value::String(s) => Some(RecordId::new(s.clone())),
        serde_json::Value::Number(n) => Some(RecordId::new(n.to_string())),
        _ => None,
    }
}

/// Paginating reader over one `SQLite` table.
pub struct SqliteSource {
    conn: Arc<Mutex<Connection>>,
    table: String,
    id_column: String,
    filter: Option<String>,
}

impl SqliteSource {
    /// Open the source database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] when the database can't be
    /// opened.
    pub fn open(
        path: &Path,
        table: impl Into<String>,
        id_column: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let conn =
            Connection::open(path).map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Self::with_connection(conn, table, id_column))
    }

    /// Wrap an existing connection (tests use an in-memory database).
    #[must_use]
    pub fn with_connection(
        conn: Connection,
        table: impl Into<String>,
        id_column: impl Into<String>,
    ) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.into(),
            id_column: id_column.into(),
            filter: None,
        }
    }

    /// Restrict the visible rows with a SQL predicate, applied to both
    /// the count and the page queries.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    fn where_clause(&self) -> String {
        match &self.filter {
            Some(predicate) => format!(" WHERE {predicate}"),
            None => String::new(),
        }
    }

    fn lock_conn(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, SourceError> {
        conn.lock()
            .map_err(|_| SourceError::Unavailable("source connection lock poisoned".into()))
    }
}

#[async_trait]
impl RecordSource for SqliteSource {
    async fn count(&self) -> Result<u64, SourceError> {
        let conn = Arc::clone(&self.conn);
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            quote_ident(&self.table),
            self.where_clause()
        );

        tokio::task::spawn_blocking(move || {
            let conn = Self::lock_conn(&conn)?;
            let count: i64 = conn
                .query_row(&sql, [], |row| row.get(0))
                .map_err(|e| SourceError::Unavailable(e.to_string()))?;
            Ok::<_, SourceError>(count.max(0) as u64)
        })
        .await
        .map_err(|e| SourceError::Unavailable(format!("count task panicked: {e}")))?
    }

    async fn fetch_page(&self, window: Window) -> Result<Vec<SourceRecord>, SourceError> {
        let conn = Arc::clone(&self.conn);
        let id_column = self.id_column.clone();
        let sql = format!(
            "SELECT * FROM {}{} ORDER BY rowid LIMIT ?1 OFFSET ?2",
            quote_ident(&self.table),
            self.where_clause()
        );

        tokio::task::spawn_blocking(move || {
            let conn = Self::lock_conn(&conn)?;
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| SourceError::Unavailable(e.to_string()))?;
            let column_names: Vec<String> =
                stmt.column_names().iter().map(|c| (*c).to_string()).collect();

            let mut rows = stmt
                .query(rusqlite::params![window.limit as i64, window.offset as i64])
                .map_err(|e| SourceError::Unavailable(e.to_string()))?;

            let mut records = Vec::new();
            while let Some(row) = rows
                .next()
                .map_err(|e| SourceError::Unavailable(e.to_string()))?
            {
                let mut fields = serde_json::Map::new();
                for (i, name) in column_names.iter().enumerate() {
                    let value = row
                        .get_ref(i)
                        .map_err(|e| SourceError::Unavailable(e.to_string()))?;
                    fields.insert(name.clone(), json_from_column(value));
                }
                let id = fields.get(&id_column).and_then(id_from_value);
                records.push(SourceRecord { id, fields });
            }
            Ok::<_, SourceError>(records)
        })
        .await
        .map_err(|e| SourceError::Unavailable(format!("fetch task panicked: {e}")))?
    }
}

/// Idempotent DDL for the destination table.
fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n\
         \x20   id TEXT PRIMARY KEY,\n\
         \x20   themes TEXT NOT NULL,\n\
         \x20   created_at TEXT NOT NULL DEFAULT (datetime('now'))\n\
         )",
        quote_ident(table)
    )
}

/// Transactional writer into one `SQLite` table.
pub struct SqliteSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSink {
    /// Open or create the destination database at `path` and ensure the
    /// target table exists.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError`] if the directory can't be created or
    /// the database can't be opened.
    pub fn open(path: &Path, table: &str) -> Result<Self, DestinationError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn =
            Connection::open(path).map_err(|e| DestinationError::Unavailable(e.to_string()))?;
        Self::with_connection(conn, table)
    }

    /// Create an in-memory sink (for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::Unavailable`] if the in-memory database
    /// can't be initialized.
    pub fn in_memory(table: &str) -> Result<Self, DestinationError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DestinationError::Unavailable(e.to_string()))?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, DestinationError> {
        conn.execute_batch(&create_table_sql(table))
            .map_err(|e| DestinationError::Unavailable(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock_conn(
        conn: &Mutex<Connection>,
    ) -> Result<MutexGuard<'_, Connection>, DestinationError> {
        conn.lock()
            .map_err(|_| DestinationError::Unavailable("sink connection lock poisoned".into()))
    }

    /// Count the rows currently visible in `table`.
    ///
    /// # Errors
    ///
    /// Returns [`DestinationError::Unavailable`] when the query fails.
    pub fn row_count(&self, table: &str) -> Result<u64, DestinationError> {
        let conn = Self::lock_conn(&self.conn)?;
        let count: i64 = conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
                [],
                |row| row.get(0),
            )
            .map_err(|e| DestinationError::Unavailable(e.to_string()))?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl ThemeSink for SqliteSink {
    async fn batch_write(&self, table: &str, rows: &[CommitRecord]) -> Result<(), DestinationError> {
        if rows.is_empty() {
            return Ok(());
        }

        let conn = Arc::clone(&self.conn);
        let sql = format!(
            "INSERT INTO {} (id, themes) VALUES (?1, ?2)",
            quote_ident(table)
        );
        let rows = rows.to_vec();

        tokio::task::spawn_blocking(move || {
            let conn = Self::lock_conn(&conn)?;
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| DestinationError::WriteFailed(format!("begin tx: {e}")))?;
            {
                let mut stmt = tx
                    .prepare(&sql)
                    .map_err(|e| DestinationError::WriteFailed(format!("prepare: {e}")))?;
                for row in &rows {
                    stmt.execute(rusqlite::params![row.id.as_str(), row.themes_json])
                        .map_err(|e| DestinationError::WriteFailed(e.to_string()))?;
                }
            }
            tx.commit()
                .map_err(|e| DestinationError::WriteFailed(format!("commit: {e}")))?;
            Ok::<_, DestinationError>(())
        })
        .await
        .map_err(|e| DestinationError::WriteFailed(format!("write task panicked: {e}")))?
    }
}
