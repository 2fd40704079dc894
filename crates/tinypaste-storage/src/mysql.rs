use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use tinypaste_core::repository::Result;
use tinypaste_core::{PasteRecord, ReadRepository, Repository, SecretToken, StorageError};
use tracing::debug;

const SCHEMA: [&str; 2] = [
    include_str!("../ddl/mysql/pastes.sql"),
    include_str!("../ddl/mysql/secret_pastes.sql"),
];

/// MySQL implementation of the repository contract.
///
/// Public pastes live in `pastes` and take their key from the
/// `AUTO_INCREMENT` column. Secret pastes live in `secret_pastes`, keyed by
/// token with a binary collation so tokens compare case-sensitively.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the paste tables if they do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(map_sqlx_error)?;
        }
        debug!("paste schema is in place");
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

fn row_to_record(row: &MySqlRow) -> Result<PasteRecord> {
    let text: String = row.try_get("text").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(PasteRecord {
        text,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get_public(&self, key: u64) -> Result<Option<PasteRecord>> {
        let row = sqlx::query(
            r#"
            SELECT text, created_at
            FROM pastes
            WHERE id = ?
            LIMIT 1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn get_secret(&self, token: &SecretToken) -> Result<Option<PasteRecord>> {
        let row = sqlx::query(
            r#"
            SELECT text, created_at
            FROM secret_pastes
            WHERE token = ?
            LIMIT 1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, token: &SecretToken) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM secret_pastes
            WHERE token = ?
            LIMIT 1
            "#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn list_public(&self, offset: u64, limit: u64) -> Result<Vec<u64>> {
        let rows = sqlx::query(
            r#"
            SELECT id
            FROM pastes
            ORDER BY id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(|row| row.try_get::<u64, _>("id").map_err(map_sqlx_error))
            .collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert_public(&self, record: PasteRecord) -> Result<u64> {
        let result = sqlx::query(
            r#"
            INSERT INTO pastes (text, created_at)
            VALUES (?, ?)
            "#,
        )
        .bind(record.text)
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_id())
    }

    async fn insert_secret(&self, token: &SecretToken, record: PasteRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO secret_pastes (token, text, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(token.as_str())
        .bind(record.text)
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(token.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
