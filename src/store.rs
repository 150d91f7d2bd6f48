//! SQLite persistence for harvested articles.
//!
//! The `news` table is keyed by `url_hash`, the fingerprint of the article
//! URL. Inserts go through `ON CONFLICT(url_hash) DO NOTHING`, so a second
//! record for the same fingerprint is dropped by SQLite itself: the first
//! write wins, nothing is overwritten, and no error surfaces. There is no
//! update or delete path.
//!
//! Each operation opens its own connection and closes it when done. The
//! harvester is a single sequential writer, so there is nothing to pool.

use crate::error::StoreError;
use crate::models::NewsRecord;
use crate::utils::ensure_parent_dir;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT,
        url TEXT,
        url_hash TEXT UNIQUE,
        text TEXT,
        image_url TEXT,
        parsed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Result of [`NewsStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was new and has been written.
    Inserted,
    /// A record with the same fingerprint was already stored; nothing changed.
    AlreadyPresent,
}

/// Handle on the SQLite file holding the `news` table.
#[derive(Debug, Clone)]
pub struct NewsStore {
    path: PathBuf,
    options: SqliteConnectOptions,
}

impl NewsStore {
    /// Describe a store backed by the SQLite file at `path`.
    ///
    /// No I/O happens here; the file is created by [`NewsStore::initialize`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        Self { path, options }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        self.options
            .connect()
            .await
            .map_err(|source| StoreError::Connect {
                path: self.path.display().to_string(),
                source,
            })
    }

    /// Create the database file and the `news` table if they do not exist.
    ///
    /// Safe to call on every run: existing rows and schema are left alone.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub async fn initialize(&self) -> Result<(), StoreError> {
        ensure_parent_dir(&self.path).await?;

        let mut conn = self.connect().await?;
        sqlx::query(SCHEMA).execute(&mut conn).await?;
        conn.close().await?;

        info!("News table ready");
        Ok(())
    }

    /// Store `record` unless its fingerprint is already present.
    ///
    /// The existence check and the write are a single statement, so two
    /// submissions of the same fingerprint can never both insert.
    ///
    /// # Errors
    ///
    /// Only genuine persistence failures (unreachable file, permissions,
    /// missing table). A duplicate fingerprint is [`InsertOutcome::AlreadyPresent`].
    #[instrument(level = "debug", skip_all, fields(fingerprint = %record.fingerprint))]
    pub async fn insert_if_absent(&self, record: &NewsRecord) -> Result<InsertOutcome, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            r#"
            INSERT INTO news (title, url, url_hash, text, image_url)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(url_hash) DO NOTHING
            "#,
        )
        .bind(&record.title)
        .bind(&record.source_url)
        .bind(&record.fingerprint)
        .bind(&record.body_text)
        .bind(record.image_url.as_deref())
        .execute(&mut conn)
        .await?;
        conn.close().await?;

        let outcome = if result.rows_affected() == 0 {
            InsertOutcome::AlreadyPresent
        } else {
            InsertOutcome::Inserted
        };
        debug!(?outcome, "Insert attempted");
        Ok(outcome)
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news")
            .fetch_one(&mut conn)
            .await?;
        conn.close().await?;
        Ok(count)
    }
}

/// Read helpers used to check what actually landed in the table.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::NaiveDateTime;
    use sqlx::Row;

    #[derive(Debug)]
    pub struct StoredRecord {
        pub id: i64,
        pub title: String,
        pub source_url: String,
        pub fingerprint: String,
        pub body_text: String,
        pub image_url: Option<String>,
        pub captured_at: NaiveDateTime,
    }

    pub async fn find_by_fingerprint(
        store: &NewsStore,
        fingerprint: &str,
    ) -> Option<StoredRecord> {
        let mut conn = store.connect().await.unwrap();
        let row = sqlx::query(
            "SELECT id, title, url, url_hash, text, image_url, parsed_at FROM news WHERE url_hash = ?1",
        )
        .bind(fingerprint)
        .fetch_optional(&mut conn)
        .await
        .unwrap()?;

        let parsed_at: String = row.get("parsed_at");
        Some(StoredRecord {
            id: row.get("id"),
            title: row.get("title"),
            source_url: row.get("url"),
            fingerprint: row.get("url_hash"),
            body_text: row.get("text"),
            image_url: row.get("image_url"),
            captured_at: NaiveDateTime::parse_from_str(&parsed_at, "%Y-%m-%d %H:%M:%S").unwrap(),
        })
    }

    pub async fn schema_sql(store: &NewsStore) -> Vec<Option<String>> {
        let mut conn = store.connect().await.unwrap();
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT sql FROM sqlite_master WHERE name = 'news' OR tbl_name = 'news' ORDER BY name",
        )
        .fetch_all(&mut conn)
        .await
        .unwrap()
    }
}
