use std::path::Path;

use rusqlite::{params, Connection, ToSql};

use super::{Reporter, Written};
use crate::models::{TweetRecord, TweetSchema, UserRecord};
use crate::ReporterError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    description TEXT NOT NULL,
    url_items TEXT NOT NULL,
    hashtag_items TEXT NOT NULL,
    mention_items TEXT NOT NULL,
    location TEXT NOT NULL,
    pinned_tweet_id TEXT,
    pinned_tweet_text TEXT NOT NULL,
    profile_image_url TEXT NOT NULL,
    protected INTEGER NOT NULL,
    public_metrics TEXT NOT NULL,
    url TEXT NOT NULL,
    verified INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS user_tweets (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    source TEXT NOT NULL,
    language TEXT NOT NULL,
    public_metrics TEXT NOT NULL,
    url_items TEXT NOT NULL,
    hashtag_items TEXT NOT NULL,
    mention_items TEXT NOT NULL,
    media TEXT NOT NULL,
    places TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS search_tweets (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    created_at TEXT NOT NULL,
    source TEXT NOT NULL,
    language TEXT NOT NULL,
    public_metrics TEXT NOT NULL,
    url_items TEXT NOT NULL,
    hashtag_items TEXT NOT NULL,
    mention_items TEXT NOT NULL,
    media TEXT NOT NULL,
    places TEXT NOT NULL,
    author TEXT NOT NULL
);
";

const TWEET_COLUMNS: [&str; 11] = [
    "id",
    "text",
    "created_at",
    "source",
    "language",
    "public_metrics",
    "url_items",
    "hashtag_items",
    "mention_items",
    "media",
    "places",
];

/// Stores records keyed by id, records already present are skipped.
pub struct SqliteReporter {
    conn: Connection,
    destination: String,
}

impl SqliteReporter {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let conn = Connection::open(path.as_ref())?;
        Self::with_connection(conn, path.as_ref().display().to_string())
    }

    pub fn open_in_memory() -> Result<Self, ReporterError> {
        Self::with_connection(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn with_connection(conn: Connection, destination: String) -> Result<Self, ReporterError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, destination })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn written(&self, table: &str, id: &str, changes: usize) -> Written {
        if changes == 0 {
            tracing::info!("{} id={} already exists in {}, skipping", table, id, self.destination);
            Written::Skipped
        } else {
            Written::Saved
        }
    }
}

impl Reporter for SqliteReporter {
    fn write_user(&mut self, record: &UserRecord) -> Result<Written, ReporterError> {
        let changes = self.conn.execute(
            "INSERT OR IGNORE INTO users (
                id, username, name, created_at, description, url_items, hashtag_items,
                mention_items, location, pinned_tweet_id, pinned_tweet_text,
                profile_image_url, protected, public_metrics, url, verified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                record.id,
                record.username,
                record.name,
                record.created_at,
                record.description,
                serde_json::to_string(&record.url_items)?,
                serde_json::to_string(&record.hashtag_items)?,
                serde_json::to_string(&record.mention_items)?,
                record.location,
                record.pinned_tweet_id,
                record.pinned_tweet_text,
                record.profile_image_url,
                record.protected,
                serde_json::to_string(&record.public_metrics)?,
                record.url,
                record.verified,
            ],
        )?;
        Ok(self.written("users", &record.id, changes))
    }

    fn write_tweet(&mut self, record: &TweetRecord) -> Result<Written, ReporterError> {
        let table = match record.schema() {
            TweetSchema::Timeline => "user_tweets",
            TweetSchema::Search => "search_tweets",
        };
        let public_metrics = serde_json::to_string(&record.public_metrics)?;
        let url_items = serde_json::to_string(&record.url_items)?;
        let hashtag_items = serde_json::to_string(&record.hashtag_items)?;
        let mention_items = serde_json::to_string(&record.mention_items)?;
        let media = serde_json::to_string(&record.media)?;
        let places = serde_json::to_string(&record.places)?;

        let mut columns = TWEET_COLUMNS.to_vec();
        let mut values: Vec<&dyn ToSql> = vec![
            &record.id,
            &record.text,
            &record.created_at,
            &record.source,
            &record.language,
            &public_metrics,
            &url_items,
            &hashtag_items,
            &mention_items,
            &media,
            &places,
        ];
        if let Some(author) = &record.author {
            columns.push("author");
            values.push(author);
        }

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );
        let changes = self.conn.execute(&sql, values.as_slice())?;
        Ok(self.written(table, &record.id, changes))
    }

    fn finish(&mut self) -> Result<(), ReporterError> {
        Ok(())
    }

    fn destination(&self) -> String {
        self.destination.clone()
    }
}
