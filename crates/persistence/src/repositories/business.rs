//! Business repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BusinessEntity, BusinessWithRoleEntity};
use crate::metrics::QueryTimer;

/// Repository for business database operations.
#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    /// Creates a new business repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a business owned by `owner_user_id`.
    pub async fn create(
        &self,
        owner_user_id: Uuid,
        name: &str,
        slug: &str,
        industry: Option<&str>,
        description: Option<&str>,
    ) -> Result<BusinessEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_business");
        let result = sqlx::query_as::<_, BusinessEntity>(
            r#"
            INSERT INTO businesses (owner_user_id, name, slug, industry, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_user_id, name, slug, industry, description,
                      created_at, updated_at
            "#,
        )
        .bind(owner_user_id)
        .bind(name)
        .bind(slug)
        .bind(industry)
        .bind(description)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a business by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BusinessEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_business_by_id");
        let result = sqlx::query_as::<_, BusinessEntity>(
            r#"
            SELECT id, owner_user_id, name, slug, industry, description,
                   created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists businesses the user owns or is a member of, newest first.
    ///
    /// The `role` column carries "owner" for owned rows and the member role
    /// name otherwise.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BusinessWithRoleEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_businesses_for_user");
        let result = sqlx::query_as::<_, BusinessWithRoleEntity>(
            r#"
            SELECT b.id, b.owner_user_id, b.name, b.slug, b.industry, b.description,
                   b.created_at, b.updated_at, 'owner' AS role
            FROM businesses b
            WHERE b.owner_user_id = $1
            UNION ALL
            SELECT b.id, b.owner_user_id, b.name, b.slug, b.industry, b.description,
                   b.created_at, b.updated_at, m.role::text AS role
            FROM businesses b
            JOIN business_members m ON m.business_id = b.id
            WHERE m.user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Counts businesses the user owns or is a member of.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM (
                SELECT id FROM businesses WHERE owner_user_id = $1
                UNION ALL
                SELECT b.id FROM businesses b
                JOIN business_members m ON m.business_id = b.id
                WHERE m.user_id = $1
            ) AS member_of
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Updates business details. Unchanged fields are passed through as-is
    /// by the caller; slug and owner are immutable.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        industry: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<BusinessEntity>, sqlx::Error> {
        sqlx::query_as::<_, BusinessEntity>(
            r#"
            UPDATE businesses
            SET name = $2, industry = $3, description = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, owner_user_id, name, slug, industry, description,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(industry)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
    }

    /// Deletes a business. Members, invitations, access requests and the
    /// brand kit go with it via FK cascade rules.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_business");
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
