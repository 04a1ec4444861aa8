//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email address (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, display_name, created_at, updated_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Upsert a user row from verified JWT claims.
    ///
    /// The identity provider owns user accounts; this keeps the local mirror
    /// current on every authenticated request that needs it.
    pub async fn upsert_from_claims(
        &self,
        id: Uuid,
        email: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_user_from_claims");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (id, email)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET email = EXCLUDED.email, updated_at = NOW()
            RETURNING id, email, display_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a user's display name.
    pub async fn update_display_name(
        &self,
        id: Uuid,
        display_name: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET display_name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, email, display_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(display_name)
        .fetch_optional(&self.pool)
        .await
    }
}
