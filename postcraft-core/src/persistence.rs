//! SQLite persistence for posts and user settings.
//!
//! The schema matches the tables the application has always used, so an
//! existing `social_media_posts.db` opens as-is:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS posts (
//!     id           INTEGER PRIMARY KEY AUTOINCREMENT,
//!     text         TEXT NOT NULL,
//!     hashtags     TEXT,
//!     platform     TEXT,
//!     tone         TEXT,
//!     content_type TEXT,
//!     timestamp    TEXT
//! );
//! CREATE TABLE IF NOT EXISTS user_settings (
//!     id                INTEGER PRIMARY KEY,
//!     default_tone      TEXT,
//!     default_platforms TEXT,
//!     api_key           TEXT
//! );
//! ```
//!
//! List-valued columns hold JSON arrays. Timestamps are RFC 3339 in UTC with
//! fixed microsecond precision so that text ordering is time ordering.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::{PersistenceError, Result};
use crate::store::PostStore;
use crate::types::{ContentType, Credential, Platform, Post, PostDraft, PostId, Tone, UserSettings};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS posts (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        text         TEXT NOT NULL,
        hashtags     TEXT,
        platform     TEXT,
        tone         TEXT,
        content_type TEXT,
        timestamp    TEXT
    );
    CREATE TABLE IF NOT EXISTS user_settings (
        id                INTEGER PRIMARY KEY,
        default_tone      TEXT,
        default_platforms TEXT,
        api_key           TEXT
    );";

/// Row id of the settings singleton.
const SETTINGS_ROW_ID: i64 = 1;

/// Raw `posts` row before label and JSON decoding.
type PostRow = (i64, String, Option<String>, Option<String>, Option<String>, Option<String>, Option<String>);

/// Handle to an open SQLite database holding posts and settings.
///
/// # Usage
///
/// ```no_run
/// # use postcraft_core::persistence::SqliteStore;
/// # use postcraft_core::config::StorageConfig;
/// # use postcraft_core::store::PostStore;
/// # use postcraft_core::types::{ContentType, Platform, PostDraft, Tone};
/// let store = SqliteStore::open("social_media_posts.db", &StorageConfig::default())?;
/// let draft = PostDraft::new("Hello!", Platform::Twitter, Tone::Casual, ContentType::Question);
/// let id = store.save_post(&draft)?;
/// store.delete_post(id)?;
/// # Ok::<(), postcraft_core::error::PersistenceError>(())
/// ```
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Open`] if the file cannot be opened or
    /// the schema cannot be created.
    pub fn open<P: AsRef<Path>>(path: P, config: &StorageConfig) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let open_err = |source| PersistenceError::Open {
            path: db_path.clone(),
            source,
        };

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&db_path, flags).map_err(open_err)?;

        if config.wal_mode {
            conn.execute_batch("PRAGMA journal_mode = WAL;")
                .map_err(open_err)?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA busy_timeout = 5000;")
            .map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;

        info!(
            path = %db_path.display(),
            wal = config.wal_mode,
            "Post database opened"
        );

        Ok(Self { conn, db_path })
    }

    /// Open a private in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Open`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let db_path = PathBuf::from(":memory:");
        let open_err = |source| PersistenceError::Open {
            path: db_path.clone(),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        Ok(Self { conn, db_path })
    }

    /// Path to the database file (or `:memory:`).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Run SQLite's integrity check. `Ok(false)` means corruption.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Database`] if the check itself fails.
    pub fn integrity_check(&self) -> Result<bool> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        Ok(result == "ok")
    }

    fn decode_post(row: PostRow) -> Result<Post> {
        let (id, text, hashtags, platform, tone, content_type, timestamp) = row;

        let hashtags = match hashtags.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str(json)
                .map_err(|e| PersistenceError::Serialization(format!("post {id} hashtags: {e}")))?,
        };
        let platform: Platform = decode_label(id, "platform", platform)?;
        let tone: Tone = decode_label(id, "tone", tone)?;
        let content_type: ContentType = decode_label(id, "content_type", content_type)?;
        let timestamp = decode_timestamp(id, timestamp.as_deref())?;

        Ok(Post {
            id: PostId(id),
            text,
            hashtags,
            platform,
            tone,
            content_type,
            timestamp,
        })
    }
}

fn decode_label<T>(id: i64, column: &str, value: Option<String>) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let value = value.unwrap_or_default();
    value
        .parse()
        .map_err(|e| PersistenceError::Serialization(format!("post {id} {column}: {e}")))
}

fn decode_timestamp(id: i64, value: Option<&str>) -> Result<DateTime<Utc>> {
    let raw = value.unwrap_or_default();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // Rows written without an offset (e.g. `2025-01-31T10:00:00.123456`).
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| PersistenceError::Serialization(format!("post {id} timestamp '{raw}': {e}")))
}

fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl PostStore for SqliteStore {
    fn save_post(&self, draft: &PostDraft) -> Result<PostId> {
        let start = Instant::now();
        let hashtags = serde_json::to_string(&draft.hashtags)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT INTO posts (text, hashtags, platform, tone, content_type, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                draft.text,
                hashtags,
                draft.platform.label(),
                draft.tone.label(),
                draft.content_type.label(),
                encode_timestamp(&draft.timestamp),
            ],
        )?;
        let id = PostId(self.conn.last_insert_rowid());

        info!(
            %id,
            platform = %draft.platform,
            hashtags = draft.hashtags.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Saved post"
        );
        Ok(id)
    }

    fn get_all_posts(&self) -> Result<Vec<Post>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, text, hashtags, platform, tone, content_type, timestamp
             FROM posts ORDER BY timestamp DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?;

        let mut posts = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            match Self::decode_post(row?) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    warn!(error = %e, "Skipping undecodable post row");
                    skipped += 1;
                }
            }
        }
        debug!(count = posts.len(), skipped, "Loaded post history");
        Ok(posts)
    }

    fn delete_post(&self, id: PostId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM posts WHERE id = ?1", params![id.0])?;
        if deleted == 0 {
            debug!(%id, "Delete requested for unknown post");
        } else {
            info!(%id, "Deleted post");
        }
        Ok(deleted > 0)
    }

    fn post_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|e| PersistenceError::Serialization(e.to_string()))
    }

    fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        let platforms: Vec<&str> = settings
            .default_platforms
            .iter()
            .map(|p| p.label())
            .collect();
        let platforms = serde_json::to_string(&platforms)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;

        self.conn.execute(
            "INSERT OR REPLACE INTO user_settings (id, default_tone, default_platforms, api_key)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                SETTINGS_ROW_ID,
                settings.default_tone.label(),
                platforms,
                settings.api_key.expose(),
            ],
        )?;

        info!(
            tone = %settings.default_tone,
            platforms = settings.default_platforms.len(),
            api_key = %settings.api_key,
            "Saved user settings"
        );
        Ok(())
    }

    fn load_settings(&self) -> Result<UserSettings> {
        let row: Option<(Option<String>, Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT default_tone, default_platforms, api_key FROM user_settings WHERE id = ?1",
                params![SETTINGS_ROW_ID],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((tone, platforms, api_key)) = row else {
            return Ok(UserSettings::default());
        };

        let default_tone = match tone.as_deref() {
            None | Some("") => Tone::default(),
            Some(label) => label.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Stored default tone is unknown, using default");
                Tone::default()
            }),
        };

        let default_platforms = match platforms.as_deref() {
            None | Some("") => UserSettings::default_platform_list(),
            Some(json) => {
                let labels: Vec<String> = serde_json::from_str(json)
                    .map_err(|e| PersistenceError::Serialization(format!("default_platforms: {e}")))?;
                labels
                    .iter()
                    .filter_map(|l| match l.parse::<Platform>() {
                        Ok(p) => Some(p),
                        Err(e) => {
                            warn!(error = %e, "Dropping unknown stored default platform");
                            None
                        }
                    })
                    .collect()
            }
        };

        Ok(UserSettings {
            default_tone,
            default_platforms,
            api_key: Credential::new(api_key.unwrap_or_default()),
        })
    }
}
