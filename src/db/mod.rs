use crate::error::VoteError;
use crate::models::Comment;
use crate::voting::{VoteLedger, VoteSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use sqlx::{migrate::MigrateDatabase, sqlite::{SqlitePool, SqlitePoolOptions}, Row, Sqlite, SqliteConnection};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(db_url: &str, max_connections: u32) -> Result<Self, VoteError> {
        let in_memory = db_url.contains(":memory:");

        // Create database if it doesn't exist
        if !in_memory && !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            info!("Creating database at {}", db_url);
            Sqlite::create_database(db_url).await?;
        }

        // An in-memory database lives and dies with its connection, so keep one forever
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };
        let pool = options.connect(db_url).await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), VoteError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS votes (
                candidate_name TEXT PRIMARY KEY,
                vote_count INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                candidate_name TEXT NOT NULL,
                comment TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // Comments may only reference seeded candidates
    async fn candidate_exists(conn: &mut SqliteConnection, candidate_name: &str) -> Result<bool, VoteError> {
        let exists = sqlx::query("SELECT 1 FROM votes WHERE candidate_name = ?")
            .bind(candidate_name)
            .fetch_optional(&mut *conn)
            .await?
            .is_some();
        Ok(exists)
    }

    async fn increment_on(conn: &mut SqliteConnection, candidate_name: &str) -> Result<i64, VoteError> {
        // Single statement, so concurrent callers never lose an update
        let row = sqlx::query(
            r#"
            UPDATE votes
            SET vote_count = vote_count + 1
            WHERE candidate_name = ?
            RETURNING vote_count
            "#,
        )
        .bind(candidate_name)
        .fetch_optional(&mut *conn)
        .await?;

        match row {
            Some(row) => Ok(row.get::<i64, _>("vote_count")),
            None => Err(VoteError::UnknownCandidate(candidate_name.to_string())),
        }
    }

    async fn insert_comment(conn: &mut SqliteConnection, candidate_name: &str, text: &str) -> Result<i64, VoteError> {
        let result = sqlx::query(
            r#"
            INSERT INTO comments (candidate_name, comment, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(candidate_name)
        .bind(text)
        .bind(Utc::now().to_rfc3339())
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[async_trait]
impl VoteLedger for Database {
    async fn seed(&self, candidate_names: &[String]) -> Result<(), VoteError> {
        let mut tx = self.pool.begin().await?;
        for name in candidate_names {
            sqlx::query(
                r#"
                INSERT INTO votes (candidate_name, vote_count)
                VALUES (?, 0)
                ON CONFLICT(candidate_name) DO NOTHING
                "#,
            )
            .bind(name)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        info!("Seeded vote records for {} candidates", candidate_names.len());
        Ok(())
    }

    async fn increment(&self, candidate_name: &str) -> Result<i64, VoteError> {
        let mut conn = self.pool.acquire().await?;
        Self::increment_on(&mut conn, candidate_name).await
    }

    async fn snapshot(&self) -> Result<VoteSnapshot, VoteError> {
        let snapshot = sqlx::query("SELECT candidate_name, vote_count FROM votes")
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|row| {
                (
                    row.get::<String, _>("candidate_name"),
                    row.get::<i64, _>("vote_count"),
                )
            })
            .collect();
        Ok(snapshot)
    }

    async fn append_comment(&self, candidate_name: &str, text: &str) -> Result<Option<i64>, VoteError> {
        let mut conn = self.pool.acquire().await?;
        if !Self::candidate_exists(&mut conn, candidate_name).await? {
            return Err(VoteError::UnknownCandidate(candidate_name.to_string()));
        }

        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring blank comment for {}", candidate_name);
            return Ok(None);
        }
        let id = Self::insert_comment(&mut conn, candidate_name, text).await?;
        Ok(Some(id))
    }

    async fn comments_for(&self, candidate_name: &str) -> Result<Vec<Comment>, VoteError> {
        let rows = sqlx::query(
            r#"
            SELECT id, candidate_name, comment, created_at
            FROM comments
            WHERE candidate_name = ?
            ORDER BY id
            "#,
        )
        .bind(candidate_name)
        .fetch_all(&self.pool)
        .await?;

        let comments = rows
            .into_iter()
            .map(|row| {
                let created_at_str = row.get::<String, _>("created_at");
                let created_at = DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|e| {
                        warn!("Bad created_at {:?} on comment: {}", created_at_str, e);
                        DateTime::<Utc>::default()
                    });
                Comment {
                    id: row.get::<i64, _>("id"),
                    candidate_name: row.get::<String, _>("candidate_name"),
                    text: row.get::<String, _>("comment"),
                    created_at,
                }
            })
            .collect();

        Ok(comments)
    }

    // Increment and comment commit together or not at all
    async fn record_vote(&self, candidate_name: &str, comment: Option<&str>) -> Result<i64, VoteError> {
        let mut tx = self.pool.begin().await?;

        let new_count = Self::increment_on(&mut tx, candidate_name).await?;
        if let Some(text) = comment.map(str::trim).filter(|t| !t.is_empty()) {
            Self::insert_comment(&mut tx, candidate_name, text).await?;
        }

        tx.commit().await?;
        Ok(new_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn seeded_db(names: &[&str]) -> Database {
        let db = Database::connect("sqlite::memory:", 1).await.unwrap();
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        db.seed(&names).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = seeded_db(&["Kduss", "SGunner"]).await;
        db.increment("Kduss").await.unwrap();

        db.seed(&["Kduss".to_string(), "GG7991".to_string()]).await.unwrap();

        let snapshot = db.snapshot().await.unwrap();
        assert_eq!(snapshot.count("Kduss"), 1);
        assert_eq!(snapshot.count("GG7991"), 0);
        assert_eq!(snapshot.counts().len(), 3);
    }

    #[tokio::test]
    async fn test_increment_returns_new_count() {
        let db = seeded_db(&["Kduss"]).await;
        assert_eq!(db.increment("Kduss").await.unwrap(), 1);
        assert_eq!(db.increment("Kduss").await.unwrap(), 2);
        assert_eq!(db.snapshot().await.unwrap().count("Kduss"), 2);
    }

    #[tokio::test]
    async fn test_increment_unknown_candidate() {
        let db = seeded_db(&["Kduss"]).await;
        let result = db.increment("Nobody").await;
        assert!(matches!(result, Err(VoteError::UnknownCandidate(name)) if name == "Nobody"));
        assert!(!db.snapshot().await.unwrap().counts().contains_key("Nobody"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_not_lost() {
        // A file database so the pool really hands out several connections
        let path = std::env::temp_dir().join(format!("r4_vote_{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite://{}", path.display());
        let db = Database::connect(&url, 4).await.unwrap();
        db.seed(&["Kduss".to_string()]).await.unwrap();
        let db = Arc::new(db);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    db.increment("Kduss").await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(db.snapshot().await.unwrap().count("Kduss"), 200);

        db.pool.close().await;
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_blank_comments_not_stored() {
        let db = seeded_db(&["Kduss"]).await;
        assert_eq!(db.append_comment("Kduss", "").await.unwrap(), None);
        assert_eq!(db.append_comment("Kduss", "   ").await.unwrap(), None);
        assert!(db.comments_for("Kduss").await.unwrap().is_empty());

        let id = db.append_comment("Kduss", "Great work").await.unwrap();
        assert!(id.is_some());
        let comments = db.comments_for("Kduss").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Great work");
        assert_eq!(comments[0].candidate_name, "Kduss");
    }

    #[tokio::test]
    async fn test_comments_in_insertion_order() {
        let db = seeded_db(&["Kduss", "SGunner"]).await;
        for text in ["first", "second", "third"] {
            db.append_comment("Kduss", text).await.unwrap();
        }
        db.append_comment("SGunner", "elsewhere").await.unwrap();

        let texts: Vec<String> = db
            .comments_for("Kduss")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(db.comments_for("GG7991").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_for_unknown_candidate() {
        let db = seeded_db(&["Kduss"]).await;
        let result = db.append_comment("Nobody", "hello").await;
        assert!(matches!(result, Err(VoteError::UnknownCandidate(_))));

        // The name is checked before blank text is ignored
        let blank = db.append_comment("Nobody", "   ").await;
        assert!(matches!(blank, Err(VoteError::UnknownCandidate(name)) if name == "Nobody"));
    }

    #[tokio::test]
    async fn test_record_vote_is_all_or_nothing() {
        let db = seeded_db(&["Kduss"]).await;

        assert_eq!(db.record_vote("Kduss", Some("  Great work ")).await.unwrap(), 1);
        let comments = db.comments_for("Kduss").await.unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "Great work");

        // Unknown candidate: nothing is written, not even the comment
        let result = db.record_vote("Nobody", Some("hello")).await;
        assert!(matches!(result, Err(VoteError::UnknownCandidate(_))));
        assert!(db.comments_for("Nobody").await.unwrap().is_empty());
        assert_eq!(db.snapshot().await.unwrap().count("Kduss"), 1);
    }

    #[tokio::test]
    async fn test_record_vote_rolls_back_when_comment_insert_fails() {
        let db = seeded_db(&["Kduss"]).await;
        sqlx::query("DROP TABLE comments").execute(&db.pool).await.unwrap();

        // The increment succeeds inside the transaction, then the insert fails
        let result = db.record_vote("Kduss", Some("x")).await;
        assert!(matches!(result, Err(VoteError::Store(_))));
        assert_eq!(db.snapshot().await.unwrap().count("Kduss"), 0);

        // A vote without a comment never touches the missing table
        assert_eq!(db.record_vote("Kduss", None).await.unwrap(), 1);
    }
}
