use crate::domain::error::DomainError;
use crate::domain::follow::Follow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Returns false when the edge already existed. A duplicate insert losing
    /// the check-then-insert race lands on the primary key and is reported
    /// the same way, not as an error.
    async fn insert(&self, follow: Follow) -> Result<bool, DomainError>;
    /// Returns false when there was nothing to delete.
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn insert(&self, follow: Follow) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO follows (user_id, author_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(follow.user_id)
        .bind(follow.author_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                info!(user_id = %follow.user_id, author_id = %follow.author_id, "follow created");
                Ok(true)
            }
            Err(e)
                if e.as_database_error()
                    .and_then(|db| db.constraint())
                    .map(|c| c.contains("follows_pkey"))
                    == Some(true) =>
            {
                Ok(false)
            }
            Err(e) => {
                error!("failed to create follow: {}", e);
                Err(DomainError::Internal(format!("database error: {}", e)))
            }
        }
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM follows
            WHERE user_id = $1 AND author_id = $2
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to delete follow: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        if deleted.rows_affected() > 0 {
            info!(user_id = %user_id, author_id = %author_id, "follow removed");
        }
        Ok(deleted.rows_affected() > 0)
    }

    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("db error checking follow: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
