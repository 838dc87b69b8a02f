use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use percent_encoding::percent_decode_str;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

pub mod models;
pub mod store;

use models::*;
pub use store::DocumentStore;

/// SQLite-backed document store (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    name: String,
}

impl Database {
    /// Open (or create) the database at `url`, reported under `name`.
    pub fn open(url: &str, name: &str) -> Result<Self> {
        let path = connection_path(url)?;
        let conn = Connection::open(&path)
            .with_context(|| format!("failed to open database at {}", path))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
            name: name.to_string(),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Run schema migrations (idempotent)
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection mutex poisoned"))
    }
}

#[async_trait]
impl DocumentStore for Database {
    fn name(&self) -> &str {
        &self.name
    }

    // ── Team ratings ──────────────────────────────────────────────────────────

    async fn find_team_rating(&self, team_name: &str) -> Result<Option<StoredRating>> {
        let conn = self.conn()?;
        let doc = conn
            .query_row(
                "SELECT id, team_name, rating, updated_at
                 FROM teamrating WHERE team_name = ?1 ORDER BY id LIMIT 1",
                params![team_name],
                map_rating,
            )
            .optional()?;
        Ok(doc)
    }

    async fn update_team_rating(&self, id: i64, rating: &TeamRating) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE teamrating SET team_name=?1, rating=?2, updated_at=?3 WHERE id=?4",
            params![rating.team_name, rating.rating, Utc::now(), id],
        )?;
        Ok(())
    }

    async fn insert_team_rating(&self, rating: &TeamRating) -> Result<i64> {
        let conn = self.conn()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO teamrating (team_name, rating, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![rating.team_name, rating.rating, now, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ── Match links ───────────────────────────────────────────────────────────

    async fn insert_match_link(&self, url: &str) -> Result<i64> {
        let conn = self.conn()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO matchlink (url, created_at, updated_at) VALUES (?1, ?2, ?3)",
            params![url, now, now],
        )?;
        Ok(conn.last_insert_rowid())
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    async fn list_collections(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_rating(row: &rusqlite::Row) -> rusqlite::Result<StoredRating> {
    Ok(StoredRating {
        id: row.get(0)?,
        team_name: row.get(1)?,
        rating: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Resolve a `DATABASE_URL` value to a path SQLite can open.
fn connection_path(url: &str) -> Result<String> {
    let url = url.trim();
    if url == ":memory:" || url == "sqlite::memory:" {
        return Ok(":memory:".to_string());
    }
    match Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "sqlite" | "file" => {
                let raw = format!("{}{}", parsed.host_str().unwrap_or(""), parsed.path());
                let path = percent_decode_str(&raw)
                    .decode_utf8()
                    .with_context(|| format!("database url {} is not valid UTF-8", url))?
                    .into_owned();
                if path.is_empty() {
                    anyhow::bail!("database url {} has no path", url);
                }
                Ok(path)
            }
            // Single-letter schemes are Windows drive letters.
            scheme if scheme.len() == 1 => Ok(url.to_string()),
            scheme => anyhow::bail!("unsupported database scheme: {}", scheme),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(url.to_string()),
        Err(e) => Err(e).with_context(|| format!("invalid database url {}", url)),
    }
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS).
///
/// `team_name` is indexed but not unique: upserts are find-then-write, so
/// concurrent writers for one team can leave duplicates behind.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS teamrating (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    team_name   TEXT    NOT NULL,
    rating      REAL    NOT NULL,
    created_at  TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS matchlink (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    url         TEXT    NOT NULL,
    created_at  TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_teamrating_team ON teamrating(team_name);
"#;
