//! SQLite Conversation and Training Storage
//!
//! Information Hiding:
//! - Single-file database created on first open, schema applied idempotently
//! - Blocking rusqlite calls moved off the async runtime
//! - Row mapping and timestamp encoding hidden from callers

use super::{ConversationLog, FaqStore, TrainingPair};
use crate::error::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS conversation_logs (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        question    TEXT NOT NULL,
        answer      TEXT NOT NULL,
        timestamp   TEXT NOT NULL,
        session_id  TEXT DEFAULT NULL
    );
    CREATE TABLE IF NOT EXISTS training_data (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        question    TEXT NOT NULL,
        answer      TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );";

/// SQLite-backed store. Cloning shares the same connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        tracing::debug!("[SqliteStore] Opened database at {:?}", path.as_ref());
        Self::init(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&conn).map_err(StoreError::from)
        })
        .await?
    }
}

fn row_to_log(row: &Row<'_>) -> rusqlite::Result<ConversationLog> {
    Ok(ConversationLog {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        timestamp: row.get(3)?,
        session_id: row.get(4)?,
    })
}

fn row_to_training(row: &Row<'_>) -> rusqlite::Result<TrainingPair> {
    Ok(TrainingPair {
        id: row.get(0)?,
        question: row.get(1)?,
        answer: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn count(conn: &Connection, table: &str) -> rusqlite::Result<u64> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(n as u64)
}

#[async_trait]
impl FaqStore for SqliteStore {
    async fn log_conversation(
        &self,
        question: &str,
        answer: &str,
        session_id: Option<&str>,
    ) -> StoreResult<ConversationLog> {
        let question = question.to_string();
        let answer = answer.to_string();
        let session_id = session_id.map(str::to_string);

        let log = self
            .with_conn(move |conn| {
                let timestamp = Utc::now();
                conn.execute(
                    "INSERT INTO conversation_logs (question, answer, timestamp, session_id)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![question, answer, timestamp, session_id],
                )?;
                Ok(ConversationLog {
                    id: conn.last_insert_rowid(),
                    question,
                    answer,
                    timestamp,
                    session_id,
                })
            })
            .await?;

        tracing::debug!("[SqliteStore] Logged conversation {}", log.id);
        Ok(log)
    }

    async fn list_logs(&self) -> StoreResult<Vec<ConversationLog>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question, answer, timestamp, session_id
                 FROM conversation_logs
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], row_to_log)?;
            rows.collect()
        })
        .await
    }

    async fn add_training(&self, question: &str, answer: &str) -> StoreResult<TrainingPair> {
        let question = question.to_string();
        let answer = answer.to_string();

        let pair = self
            .with_conn(move |conn| {
                let created_at = Utc::now();
                conn.execute(
                    "INSERT INTO training_data (question, answer, created_at)
                     VALUES (?1, ?2, ?3)",
                    params![question, answer, created_at],
                )?;
                Ok(TrainingPair {
                    id: conn.last_insert_rowid(),
                    question,
                    answer,
                    created_at,
                })
            })
            .await?;

        tracing::debug!("[SqliteStore] Added training pair {}", pair.id);
        Ok(pair)
    }

    async fn list_training(&self) -> StoreResult<Vec<TrainingPair>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question, answer, created_at
                 FROM training_data
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map([], row_to_training)?;
            rows.collect()
        })
        .await
    }

    async fn recent_training(&self, limit: usize) -> StoreResult<Vec<TrainingPair>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, question, answer, created_at
                 FROM training_data
                 ORDER BY id DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], row_to_training)?;
            rows.collect()
        })
        .await
    }

    async fn count_logs(&self) -> StoreResult<u64> {
        self.with_conn(|conn| count(conn, "conversation_logs")).await
    }

    async fn count_training(&self) -> StoreResult<u64> {
        self.with_conn(|conn| count(conn, "training_data")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_training_ids_strictly_increase() {
        let store = SqliteStore::open_in_memory().unwrap();

        let first = store.add_training("q1", "a1").await.unwrap();
        let second = store.add_training("q2", "a2").await.unwrap();
        let third = store.add_training("q3", "a3").await.unwrap();

        assert_eq!(first.id, 1);
        assert!(second.id > first.id);
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn test_logs_listed_in_insert_order() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.log_conversation("first", "1", None).await.unwrap();
        store
            .log_conversation("second", "2", Some("s-1"))
            .await
            .unwrap();
        store.log_conversation("third", "3", None).await.unwrap();

        let logs = store.list_logs().await.unwrap();
        let questions: Vec<_> = logs.iter().map(|l| l.question.as_str()).collect();
        assert_eq!(questions, vec!["first", "second", "third"]);
        assert_eq!(logs[1].session_id.as_deref(), Some("s-1"));
        assert!(logs[0].session_id.is_none());
        assert!(logs.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[tokio::test]
    async fn test_recent_training_is_newest_first_and_limited() {
        let store = SqliteStore::open_in_memory().unwrap();
        for i in 1..=5 {
            store
                .add_training(&format!("q{i}"), &format!("a{i}"))
                .await
                .unwrap();
        }

        let recent = store.recent_training(3).await.unwrap();
        let questions: Vec<_> = recent.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, vec!["q5", "q4", "q3"]);

        let all = store.list_training().await.unwrap();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].question, "q1");
    }

    #[tokio::test]
    async fn test_counts_are_independent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_training("q", "a").await.unwrap();
        store.log_conversation("q", "a", None).await.unwrap();
        store.log_conversation("q", "a", None).await.unwrap();

        assert_eq!(store.count_training().await.unwrap(), 1);
        assert_eq!(store.count_logs().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_file_database_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("logs.db");

        {
            let store = SqliteStore::open(&db_path).unwrap();
            store
                .add_training("What are your business hours?", "9 to 6")
                .await
                .unwrap();
            store.log_conversation("hi", "hello", None).await.unwrap();
        }

        let reopened = SqliteStore::open(&db_path).unwrap();
        let training = reopened.list_training().await.unwrap();
        assert_eq!(training.len(), 1);
        assert_eq!(training[0].answer, "9 to 6");
        assert_eq!(reopened.count_logs().await.unwrap(), 1);

        let next = reopened.add_training("q", "a").await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_timestamps_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let written = store.log_conversation("q", "a", None).await.unwrap();

        let read = store.list_logs().await.unwrap();
        let delta = (read[0].timestamp - written.timestamp).num_milliseconds().abs();
        assert!(delta < 1000);
    }
}
