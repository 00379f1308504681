//! SQLite-backed session store
//!
//! Sessions are opaque UUID tokens with an expiry. Expired tokens are
//! treated as absent and deleted on sight.

use crate::auth::error::AuthResult;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// SQLite-backed store for session tokens
pub struct SessionStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        created_at TEXT NOT NULL,
        expires_at TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_expiry ON sessions(expires_at);
";

impl SessionStore {
    /// Create or open the session table in the given database file
    pub fn open(db_path: &Path) -> AuthResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        Self::initialize(conn)
    }

    /// Open an in-memory session store (tests)
    pub fn open_in_memory() -> AuthResult<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> AuthResult<Self> {
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Issue a new session for a user
    pub async fn create(&self, user_id: &str, ttl: Duration) -> AuthResult<Session> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
            expires_at: Utc::now() + ttl,
        };

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO sessions (token, user_id, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                session.token,
                session.user_id,
                session.created_at.to_rfc3339(),
                session.expires_at.to_rfc3339(),
            ],
        )?;

        Ok(session)
    }

    /// Resolve a token to its session; expired tokens are deleted and
    /// reported as absent
    pub async fn lookup(&self, token: &str) -> AuthResult<Option<Session>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare_cached(
            "SELECT token, user_id, created_at, expires_at FROM sessions WHERE token = ?1",
        )?;

        let mut rows = stmt.query_map(params![token], row_to_session)?;
        let Some(session) = rows.next().transpose()? else {
            return Ok(None);
        };
        drop(rows);
        drop(stmt);

        if session.expires_at <= Utc::now() {
            conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Delete a session (sign-out)
    pub async fn revoke(&self, token: &str) -> AuthResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }

    /// Sweep all expired sessions, returning how many were removed
    pub async fn purge_expired(&self) -> AuthResult<usize> {
        let conn = self.conn.lock().await;
        let removed = conn.execute(
            "DELETE FROM sessions WHERE expires_at <= ?1",
            params![Utc::now().to_rfc3339()],
        )?;
        Ok(removed)
    }
}

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<Session> {
    let created_at: String = row.get(2)?;
    let expires_at: String = row.get(3)?;

    Ok(Session {
        token: row.get(0)?,
        user_id: row.get(1)?,
        created_at: parse_timestamp(2, &created_at)?,
        expires_at: parse_timestamp(3, &expires_at)?,
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = SessionStore::open_in_memory().unwrap();

        let session = store.create("alice", Duration::hours(24)).await.unwrap();
        let found = store.lookup(&session.token).await.unwrap().unwrap();
        assert_eq!(found, session);
        assert_eq!(found.user_id, "alice");
    }

    #[tokio::test]
    async fn test_unknown_token_is_absent() {
        let store = SessionStore::open_in_memory().unwrap();
        assert_eq!(store.lookup("no-such-token").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_session_is_absent_and_deleted() {
        let store = SessionStore::open_in_memory().unwrap();

        let session = store.create("alice", Duration::seconds(-1)).await.unwrap();
        assert_eq!(store.lookup(&session.token).await.unwrap(), None);

        // Deleted on sight, so a later purge finds nothing
        assert_eq!(store.purge_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_revoke_ends_the_session() {
        let store = SessionStore::open_in_memory().unwrap();

        let session = store.create("alice", Duration::hours(24)).await.unwrap();
        store.revoke(&session.token).await.unwrap();
        assert_eq!(store.lookup(&session.token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_purge_expired_only_removes_expired() {
        let store = SessionStore::open_in_memory().unwrap();

        store.create("alice", Duration::seconds(-1)).await.unwrap();
        store.create("alice", Duration::seconds(-5)).await.unwrap();
        let live = store.create("bob", Duration::hours(1)).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 2);
        assert!(store.lookup(&live.token).await.unwrap().is_some());
    }
}
