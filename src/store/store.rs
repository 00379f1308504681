//! SQLite-backed entries store
//!
//! Every statement is scoped by `user_id`, the application-layer
//! equivalent of the row-level-security policies the hosted backend
//! enforced: a row belonging to another user is indistinguishable
//! from a missing row. An `AFTER UPDATE` trigger maintains
//! `updated_at`, mirroring the hosted backend's auto-update trigger.

use crate::store::entry::{Entry, EntryPatch, NewEntry, User};
use crate::store::error::{StoreError, StoreResult};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Configuration for the entries store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for the database file
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("paceboard_data"),
        }
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Path to the SQLite database file
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("paceboard.db")
    }
}

/// SQLite-backed store for entries and users
pub struct EntryStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        handle TEXT NOT NULL,
        display_name TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
    );

    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT NOT NULL,
        date TEXT NOT NULL,
        entry_type TEXT NOT NULL,
        category TEXT NOT NULL,
        amount REAL NOT NULL,
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now')),
        updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ','now'))
    );

    CREATE INDEX IF NOT EXISTS idx_entries_user_date ON entries(user_id, date);

    CREATE TRIGGER IF NOT EXISTS entries_touch_updated_at
    AFTER UPDATE ON entries
    FOR EACH ROW
    BEGIN
        UPDATE entries SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ','now')
        WHERE id = NEW.id;
    END;
";

const ENTRY_COLUMNS: &str =
    "id, user_id, date, entry_type, category, amount, title, content, created_at, updated_at";

impl EntryStore {
    /// Create or open the store at the configured location
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let conn = Connection::open_with_flags(
            config.db_path(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Self::initialize(conn)
    }

    /// Open an in-memory store (tests and experiments)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// List all entries for a user, newest date first
    pub async fn list(&self, user_id: &str) -> StoreResult<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE user_id = ?1
             ORDER BY date DESC, id DESC"
        ))?;

        let rows = stmt.query_map(params![user_id], row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// List entries for a user within an inclusive date range
    pub async fn list_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StoreResult<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
             ORDER BY date DESC, id DESC"
        ))?;

        let rows = stmt.query_map(
            params![user_id, start.to_string(), end.to_string()],
            row_to_entry,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Insert a new entry for a user and return the stored row
    pub async fn create(&self, user_id: &str, new: NewEntry) -> StoreResult<Entry> {
        new.validate().map_err(StoreError::Validation)?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO entries (user_id, date, entry_type, category, amount, title, content)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                new.date.to_string(),
                new.entry_type.to_string(),
                new.category.to_string(),
                new.amount,
                new.title,
                new.content,
            ],
        )?;

        let id = conn.last_insert_rowid();
        fetch_entry(&conn, user_id, id)
    }

    /// Apply a partial update to an entry the user owns
    pub async fn update(&self, user_id: &str, id: i64, patch: EntryPatch) -> StoreResult<Entry> {
        patch.validate().map_err(StoreError::Validation)?;

        let conn = self.conn.lock().await;

        if patch.is_empty() {
            // Nothing to change; still 404 for rows the user does not own
            return fetch_entry(&conn, user_id, id);
        }

        let changed = conn.execute(
            "UPDATE entries SET
                date = COALESCE(?1, date),
                entry_type = COALESCE(?2, entry_type),
                category = COALESCE(?3, category),
                amount = COALESCE(?4, amount),
                title = COALESCE(?5, title),
                content = COALESCE(?6, content)
             WHERE id = ?7 AND user_id = ?8",
            params![
                patch.date.map(|d| d.to_string()),
                patch.entry_type.map(|t| t.to_string()),
                patch.category.map(|c| c.to_string()),
                patch.amount,
                patch.title,
                patch.content,
                id,
                user_id,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        fetch_entry(&conn, user_id, id)
    }

    /// Delete an entry the user owns
    pub async fn delete(&self, user_id: &str, id: i64) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    /// Insert or refresh a user record after sign-in
    pub async fn upsert_user(&self, user: &User) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO users (id, handle, display_name)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                handle = excluded.handle,
                display_name = excluded.display_name",
            params![user.id, user.handle, user.display_name],
        )?;
        Ok(())
    }

    /// Look up a user by id
    pub async fn get_user(&self, id: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare_cached("SELECT id, handle, display_name FROM users WHERE id = ?1")?;

        let mut rows = stmt.query_map(params![id], |row| {
            Ok(User {
                id: row.get(0)?,
                handle: row.get(1)?,
                display_name: row.get(2)?,
            })
        })?;

        rows.next().transpose().map_err(StoreError::from)
    }

    /// Cheap connectivity check for health probes
    pub async fn ping(&self) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    /// Number of entries a user has (health reporting)
    pub async fn count(&self, user_id: &str) -> StoreResult<u64> {
        let conn = self.conn.lock().await;
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn fetch_entry(conn: &Connection, user_id: &str, id: i64) -> StoreResult<Entry> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1 AND user_id = ?2"
    ))?;

    let mut rows = stmt.query_map(params![id, user_id], row_to_entry)?;
    match rows.next() {
        Some(row) => Ok(row?),
        None => Err(StoreError::NotFound(id)),
    }
}

/// Map a SELECTed row onto the Entry model
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    let date: String = row.get(2)?;
    let entry_type: String = row.get(3)?;
    let category: String = row.get(4)?;
    let created_at: String = row.get(8)?;
    let updated_at: String = row.get(9)?;

    Ok(Entry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        date: date.parse().map_err(|e| text_column_error(2, e))?,
        entry_type: entry_type
            .parse()
            .map_err(|e: String| text_column_error(3, e))?,
        category: category
            .parse()
            .map_err(|e: String| text_column_error(4, e))?,
        amount: row.get(5)?,
        title: row.get(6)?,
        content: row.get(7)?,
        created_at: parse_timestamp(8, &created_at)?,
        updated_at: parse_timestamp(9, &updated_at)?,
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| text_column_error(idx, e))
}

fn text_column_error(
    idx: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::entry::{Category, EntryType};

    fn new_entry(date: &str, ty: EntryType, category: Category, amount: f64) -> NewEntry {
        NewEntry {
            date: date.parse().unwrap(),
            entry_type: ty,
            category,
            amount,
            title: format!("{} {}", ty, category),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let store = EntryStore::open_in_memory().unwrap();

        let created = store
            .create(
                "alice",
                NewEntry {
                    date: "2024-01-15".parse().unwrap(),
                    entry_type: EntryType::Sales,
                    category: Category::Training,
                    amount: 2500.0,
                    title: "Workshop deposit".to_string(),
                    content: "Two-day onsite".to_string(),
                },
            )
            .await
            .unwrap();

        let listed = store.list("alice").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
        assert_eq!(listed[0].date.to_string(), "2024-01-15");
        assert_eq!(listed[0].entry_type, EntryType::Sales);
        assert_eq!(listed[0].category, Category::Training);
        assert_eq!(listed[0].amount, 2500.0);
        assert_eq!(listed[0].title, "Workshop deposit");
        assert_eq!(listed[0].content, "Two-day onsite");
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let store = EntryStore::open_in_memory().unwrap();

        let mut entry = new_entry("2024-01-15", EntryType::Sales, Category::Training, 100.0);
        entry.title = "  ".to_string();

        let err = store.create("alice", entry).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.list("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_date_descending() {
        let store = EntryStore::open_in_memory().unwrap();

        for date in ["2024-01-10", "2024-03-05", "2024-02-20"] {
            store
                .create(
                    "alice",
                    new_entry(date, EntryType::Sales, Category::Coaching, 100.0),
                )
                .await
                .unwrap();
        }

        let dates: Vec<String> = store
            .list("alice")
            .await
            .unwrap()
            .iter()
            .map(|e| e.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-05", "2024-02-20", "2024-01-10"]);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let store = EntryStore::open_in_memory().unwrap();

        let created = store
            .create(
                "alice",
                new_entry("2024-01-15", EntryType::Delivery, Category::Coaching, 1800.0),
            )
            .await
            .unwrap();

        let updated = store
            .update(
                "alice",
                created.id,
                EntryPatch {
                    amount: Some(2000.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.amount, 2000.0);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.entry_type, created.entry_type);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let store = EntryStore::open_in_memory().unwrap();

        let err = store
            .update("alice", 999, EntryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[tokio::test]
    async fn test_ownership_isolation() {
        let store = EntryStore::open_in_memory().unwrap();

        let bobs = store
            .create(
                "bob",
                new_entry("2024-01-15", EntryType::Sales, Category::Speaking, 500.0),
            )
            .await
            .unwrap();

        // Another user's row is indistinguishable from a missing row
        let err = store.delete("alice", bobs.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        let err = store
            .update(
                "alice",
                bobs.id,
                EntryPatch {
                    amount: Some(0.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        assert!(store.list("alice").await.unwrap().is_empty());
        let bobs_list = store.list("bob").await.unwrap();
        assert_eq!(bobs_list.len(), 1);
        assert_eq!(bobs_list[0].amount, 500.0);
    }

    #[tokio::test]
    async fn test_delete_removes_from_listing() {
        let store = EntryStore::open_in_memory().unwrap();

        let entry = store
            .create(
                "alice",
                new_entry("2024-01-15", EntryType::Sales, Category::Training, 100.0),
            )
            .await
            .unwrap();

        store.delete("alice", entry.id).await.unwrap();
        assert!(store.list("alice").await.unwrap().is_empty());

        let err = store.delete("alice", entry.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_range_bounds_are_inclusive() {
        let store = EntryStore::open_in_memory().unwrap();

        for date in ["2024-01-01", "2024-01-15", "2024-01-31", "2024-02-01"] {
            store
                .create(
                    "alice",
                    new_entry(date, EntryType::Sales, Category::Training, 100.0),
                )
                .await
                .unwrap();
        }

        let january = store
            .list_range(
                "alice",
                "2024-01-01".parse().unwrap(),
                "2024-01-31".parse().unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(january.len(), 3);
        assert!(january.iter().all(|e| e.date.to_string().starts_with("2024-01")));
    }

    #[tokio::test]
    async fn test_user_upsert_and_lookup() {
        let store = EntryStore::open_in_memory().unwrap();

        let user = User {
            id: "12345".to_string(),
            handle: "alice".to_string(),
            display_name: "Alice".to_string(),
        };
        store.upsert_user(&user).await.unwrap();
        assert_eq!(store.get_user("12345").await.unwrap(), Some(user));

        // Upsert refreshes the profile
        let renamed = User {
            id: "12345".to_string(),
            handle: "alice_v2".to_string(),
            display_name: "Alice V2".to_string(),
        };
        store.upsert_user(&renamed).await.unwrap();
        assert_eq!(store.get_user("12345").await.unwrap(), Some(renamed));

        assert_eq!(store.get_user("unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::new(dir.path());
        let store = EntryStore::open(&config).unwrap();

        store
            .create(
                "alice",
                new_entry("2024-01-15", EntryType::Sales, Category::Training, 100.0),
            )
            .await
            .unwrap();
        assert_eq!(store.count("alice").await.unwrap(), 1);
        assert!(config.db_path().exists());
    }
}
