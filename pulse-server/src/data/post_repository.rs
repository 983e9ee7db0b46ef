use crate::domain::error::DomainError;
use crate::domain::post::Post;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

/// Which slice of the post table a listing is drawn from. Every listing
/// shares the same ordering: `pub_date` descending.
#[derive(Debug, Clone, Copy)]
pub enum PostFilter {
    All,
    Group(Uuid),
    Author(Uuid),
    /// Posts whose author is followed by the given user.
    FeedOf(Uuid),
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    /// Updates text and group in place; id, author and pub_date are preserved.
    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
    ) -> Result<Option<Post>, DomainError>;
    /// Out-of-band removal (administrative); comments cascade in the schema.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError>;
    async fn page(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, group_id, text, image, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.group_id)
        .bind(&post.text)
        .bind(&post.image)
        .bind(post.pub_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, author_id, group_id, text, image, pub_date
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: Uuid,
        text: String,
        group_id: Option<Uuid>,
    ) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET text = $1, group_id = $2
            WHERE id = $3
            RETURNING id, author_id, group_id, text, image, pub_date
            "#,
        )
        .bind(&text)
        .bind(group_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        info!(post_id = %id, "post deleted");
        Ok(())
    }

    async fn count(&self, filter: PostFilter) -> Result<usize, DomainError> {
        let result: Result<i64, sqlx::Error> = match filter {
            PostFilter::All => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts")
                    .fetch_one(&self.pool)
                    .await
            }
            PostFilter::Group(group_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = $1")
                    .bind(group_id)
                    .fetch_one(&self.pool)
                    .await
            }
            PostFilter::Author(author_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
                    .bind(author_id)
                    .fetch_one(&self.pool)
                    .await
            }
            PostFilter::FeedOf(user_id) => {
                sqlx::query_scalar(
                    r#"
                    SELECT COUNT(*)
                    FROM posts p
                    JOIN follows f ON f.author_id = p.author_id
                    WHERE f.user_id = $1
                    "#,
                )
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
            }
        };

        result.map(|n| n as usize).map_err(|e| {
            error!("db error counting posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn page(
        &self,
        filter: PostFilter,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Post>, DomainError> {
        let limit = limit as i64;
        let offset = offset as i64;

        let result = match filter {
            PostFilter::All => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, author_id, group_id, text, image, pub_date
                    FROM posts
                    ORDER BY pub_date DESC
                    LIMIT $1 OFFSET $2
                    "#,
                )
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            PostFilter::Group(group_id) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, author_id, group_id, text, image, pub_date
                    FROM posts
                    WHERE group_id = $1
                    ORDER BY pub_date DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(group_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            PostFilter::Author(author_id) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT id, author_id, group_id, text, image, pub_date
                    FROM posts
                    WHERE author_id = $1
                    ORDER BY pub_date DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(author_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            PostFilter::FeedOf(user_id) => {
                sqlx::query_as::<_, Post>(
                    r#"
                    SELECT p.id, p.author_id, p.group_id, p.text, p.image, p.pub_date
                    FROM posts p
                    JOIN follows f ON f.author_id = p.author_id
                    WHERE f.user_id = $1
                    ORDER BY p.pub_date DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(user_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        };

        result.map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }
}
