//! # Postgres post repository
//!
//! Maps the `posts` table to `domains::Post`. Queries are built at runtime,
//! so no database is needed at compile time.

use async_trait::async_trait;
use domains::{DomainError, Post, PostRepository, Result};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

const COLUMNS: &str =
    "id, collection_id, collection_name, created, updated, title, body, slug, user_id, files";

pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Connects and applies pending migrations.
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("postgres post repository ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_post(row: &PgRow) -> std::result::Result<Post, sqlx::Error> {
    Ok(Post {
        id: row.try_get("id")?,
        collection_id: row.try_get("collection_id")?,
        collection_name: row.try_get("collection_name")?,
        created: row.try_get("created")?,
        updated: row.try_get("updated")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        slug: row.try_get("slug")?,
        user: row.try_get("user_id")?,
        files: row.try_get("files")?,
    })
}

#[async_trait]
impl PostRepository for PgPostRepository {
    async fn create(&self, post: Post) -> Result<Post> {
        let sql = format!(
            "INSERT INTO posts ({COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&post.id)
            .bind(&post.collection_id)
            .bind(&post.collection_name)
            .bind(post.created)
            .bind(post.updated)
            .bind(&post.title)
            .bind(&post.body)
            .bind(&post.slug)
            .bind(&post.user)
            .bind(&post.files)
            .fetch_one(&self.pool)
            .await
            .map_err(DomainError::persistence)?;
        row_to_post(&row).map_err(DomainError::persistence)
    }

    async fn update(&self, post: Post) -> Result<Post> {
        let sql = format!(
            "UPDATE posts SET updated = $2, title = $3, body = $4, slug = $5, files = $6 \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&post.id)
            .bind(post.updated)
            .bind(&post.title)
            .bind(&post.body)
            .bind(&post.slug)
            .bind(&post.files)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::persistence)?;
        match row {
            Some(row) => row_to_post(&row).map_err(DomainError::persistence),
            None => Err(DomainError::not_found("post", &post.id)),
        }
    }

    async fn delete(&self, id: &str) -> Result<Option<Post>> {
        let sql = format!("DELETE FROM posts WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::persistence)?;
        row.as_ref()
            .map(row_to_post)
            .transpose()
            .map_err(DomainError::persistence)
    }

    async fn get(&self, id: &str) -> Result<Option<Post>> {
        let sql = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DomainError::persistence)?;
        row.as_ref()
            .map(row_to_post)
            .transpose()
            .map_err(DomainError::persistence)
    }

    async fn list(&self) -> Result<Vec<Post>> {
        let sql = format!("SELECT {COLUMNS} FROM posts ORDER BY created DESC, id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::persistence)?;
        rows.iter()
            .map(row_to_post)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(DomainError::persistence)
    }
}
