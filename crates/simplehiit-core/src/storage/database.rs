//! SQLite-based storage for users and completed sessions.
//!
//! Provides persistent storage for:
//! - Users and whether they take part in the next session
//! - Session records and the users who did them

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::presenter::SessionRepository;
use crate::session::{SessionRecord, User};

const DB_FILE: &str = "simplehiit.db";

/// SQLite database for users and session history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/simplehiit/simplehiit.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_in(&data_dir()?)
    }

    /// Open `simplehiit.db` inside `dir`.
    pub fn open_in(dir: &Path) -> Result<Self> {
        let path = dir.join(DB_FILE);
        let conn = Connection::open(&path).map_err(|source| DatabaseError::OpenFailed {
            path: path.clone(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self { conn };
        db.migrate()
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id       INTEGER PRIMARY KEY AUTOINCREMENT,
                name     TEXT NOT NULL,
                selected INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp_ms INTEGER NOT NULL,
                duration_ms  INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS session_users (
                session_id INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
                user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                PRIMARY KEY (session_id, user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_timestamp ON sessions(timestamp_ms);
            CREATE INDEX IF NOT EXISTS idx_session_users_user ON session_users(user_id);",
        )?;
        Ok(())
    }

    // ── Users ──

    /// Add a user, selected by default.
    pub fn insert_user(&self, name: &str) -> Result<User> {
        self.conn.execute(
            "INSERT INTO users (name, selected) VALUES (?1, 1)",
            params![name],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            selected: true,
        })
    }

    pub fn user(&self, id: i64) -> Result<User> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, selected FROM users WHERE id = ?1",
                params![id],
                row_to_user,
            )
            .optional()?;
        user.ok_or_else(|| DatabaseError::NotFound { table: "users", id }.into())
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.query_users("SELECT id, name, selected FROM users ORDER BY id")
    }

    pub fn selected_users(&self) -> Result<Vec<User>> {
        self.query_users("SELECT id, name, selected FROM users WHERE selected = 1 ORDER BY id")
    }

    fn query_users(&self, sql: &str) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// # Errors
    /// Returns [`DatabaseError::NotFound`] for an unknown id.
    pub fn set_user_selected(&self, id: i64, selected: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE users SET selected = ?1 WHERE id = ?2",
            params![selected, id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { table: "users", id }.into());
        }
        Ok(())
    }

    /// Remove a user. Their links to past sessions go with them; the
    /// session rows stay.
    pub fn delete_user(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { table: "users", id }.into());
        }
        Ok(())
    }

    // ── Sessions ──

    /// Store a session record and link it to its users.
    ///
    /// # Errors
    /// Fails without writing anything if a user id is unknown.
    pub fn insert_session(&self, record: &SessionRecord) -> Result<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO sessions (timestamp_ms, duration_ms) VALUES (?1, ?2)",
            params![record.timestamp_ms, record.duration_ms],
        )?;
        let session_id = tx.last_insert_rowid();
        for user_id in &record.users_ids {
            tx.execute(
                "INSERT OR IGNORE INTO session_users (session_id, user_id) VALUES (?1, ?2)",
                params![session_id, user_id],
            )?;
        }
        tx.commit()?;
        tracing::debug!(session_id, users = record.users_ids.len(), "session recorded");
        Ok(session_id)
    }

    /// Every session record, oldest first.
    pub fn sessions(&self) -> Result<Vec<SessionRecord>> {
        self.query_sessions(
            "SELECT id, timestamp_ms, duration_ms FROM sessions ORDER BY timestamp_ms, id",
            None,
        )
    }

    /// Sessions `user_id` took part in, oldest first.
    pub fn sessions_for_user(&self, user_id: i64) -> Result<Vec<SessionRecord>> {
        self.query_sessions(
            "SELECT s.id, s.timestamp_ms, s.duration_ms
             FROM sessions s
             JOIN session_users su ON su.session_id = s.id
             WHERE su.user_id = ?1
             ORDER BY s.timestamp_ms, s.id",
            Some(user_id),
        )
    }

    fn query_sessions(&self, sql: &str, user_id: Option<i64>) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<SessionRecord> {
            Ok(SessionRecord {
                id: Some(row.get(0)?),
                timestamp_ms: row.get(1)?,
                duration_ms: row.get(2)?,
                users_ids: Vec::new(),
            })
        };
        let mut records = match user_id {
            Some(id) => stmt.query_map(params![id], map_row)?.collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
        };

        let links = self.session_user_links()?;
        for record in &mut records {
            if let Some(ids) = record.id.and_then(|id| links.get(&id)) {
                record.users_ids = ids.clone();
            }
        }
        Ok(records)
    }

    fn session_user_links(&self) -> Result<HashMap<i64, Vec<i64>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT session_id, user_id FROM session_users ORDER BY session_id, user_id")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

        let mut links: HashMap<i64, Vec<i64>> = HashMap::new();
        for row in rows {
            let (session_id, user_id) = row?;
            links.entry(session_id).or_default().push(user_id);
        }
        Ok(links)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        selected: row.get(2)?,
    })
}

impl SessionRepository for Database {
    fn insert_session(&self, record: &SessionRecord) -> Result<i64> {
        Database::insert_session(self, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp_ms: i64, duration_ms: u64, users_ids: Vec<i64>) -> SessionRecord {
        SessionRecord {
            id: None,
            timestamp_ms,
            duration_ms,
            users_ids,
        }
    }

    #[test]
    fn users_are_selected_on_insert() {
        let db = Database::open_memory().unwrap();
        let ann = db.insert_user("Ann").unwrap();
        let bob = db.insert_user("Bob").unwrap();
        assert!(ann.id < bob.id);
        assert_eq!(db.users().unwrap().len(), 2);
        assert_eq!(db.selected_users().unwrap().len(), 2);
    }

    #[test]
    fn unselected_users_are_filtered() {
        let db = Database::open_memory().unwrap();
        let ann = db.insert_user("Ann").unwrap();
        let bob = db.insert_user("Bob").unwrap();
        db.set_user_selected(ann.id, false).unwrap();

        let selected = db.selected_users().unwrap();
        assert_eq!(selected, vec![bob]);
        assert!(!db.user(ann.id).unwrap().selected);
    }

    #[test]
    fn unknown_user_id_is_not_found() {
        let db = Database::open_memory().unwrap();
        assert!(db.set_user_selected(42, true).is_err());
        assert!(db.delete_user(42).is_err());
        let err = db.user(42).unwrap_err();
        assert_eq!(err.code(), "DATABASE_ERROR");
    }

    #[test]
    fn session_records_keep_their_users() {
        let db = Database::open_memory().unwrap();
        let ann = db.insert_user("Ann").unwrap();
        let bob = db.insert_user("Bob").unwrap();

        let id = db.insert_session(&record(2_000, 240_000, vec![bob.id, ann.id])).unwrap();
        db.insert_session(&record(1_000, 60_000, vec![ann.id])).unwrap();

        let all = db.sessions().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].timestamp_ms, 1_000);
        assert_eq!(all[1].id, Some(id));
        assert_eq!(all[1].users_ids, vec![ann.id, bob.id]);

        assert_eq!(db.sessions_for_user(ann.id).unwrap().len(), 2);
        let bobs = db.sessions_for_user(bob.id).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].duration_ms, 240_000);
    }

    #[test]
    fn unknown_user_in_record_writes_nothing() {
        let db = Database::open_memory().unwrap();
        let ann = db.insert_user("Ann").unwrap();
        assert!(db.insert_session(&record(1_000, 60_000, vec![ann.id, 99])).is_err());
        assert!(db.sessions().unwrap().is_empty());
    }

    #[test]
    fn deleting_a_user_drops_only_their_links() {
        let db = Database::open_memory().unwrap();
        let ann = db.insert_user("Ann").unwrap();
        let bob = db.insert_user("Bob").unwrap();
        db.insert_session(&record(1_000, 60_000, vec![ann.id, bob.id])).unwrap();

        db.delete_user(bob.id).unwrap();
        let all = db.sessions().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].users_ids, vec![ann.id]);
    }

    #[test]
    fn data_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = Database::open_in(dir.path()).unwrap();
            let ann = db.insert_user("Ann").unwrap();
            db.insert_session(&record(1_000, 60_000, vec![ann.id])).unwrap();
        }
        let db = Database::open_in(dir.path()).unwrap();
        assert_eq!(db.users().unwrap().len(), 1);
        assert_eq!(db.sessions().unwrap().len(), 1);
    }
}
