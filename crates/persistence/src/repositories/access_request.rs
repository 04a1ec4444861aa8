//! Business access-request repository for database operations.

use domain::models::BusinessRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    BusinessAccessRequestEntity, BusinessAccessRequestWithUserEntity, BusinessRoleDb,
};
use crate::metrics::QueryTimer;

/// Repository for business access-request database operations.
#[derive(Clone)]
pub struct AccessRequestRepository {
    pool: PgPool,
}

impl AccessRequestRepository {
    /// Creates a new access-request repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending access request.
    ///
    /// A 23505 from here means a pending request already exists for this
    /// (business, user) pair.
    pub async fn create(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        requested_role: BusinessRole,
        message: Option<&str>,
    ) -> Result<BusinessAccessRequestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_access_request");
        let result = sqlx::query_as::<_, BusinessAccessRequestEntity>(
            r#"
            INSERT INTO business_access_requests (business_id, user_id, requested_role, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, business_id, user_id, requested_role, message, status,
                      reviewed_by, reviewed_at, created_at
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(BusinessRoleDb::from(requested_role))
        .bind(message)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an access request by ID.
    pub async fn find_by_id(
        &self,
        request_id: Uuid,
    ) -> Result<Option<BusinessAccessRequestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_access_request");
        let result = sqlx::query_as::<_, BusinessAccessRequestEntity>(
            r#"
            SELECT id, business_id, user_id, requested_role, message, status,
                   reviewed_by, reviewed_at, created_at
            FROM business_access_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Checks whether a pending request exists for this (business, user).
    pub async fn has_pending(&self, business_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM business_access_requests
            WHERE business_id = $1 AND user_id = $2 AND status = 'pending'
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0 > 0)
    }

    /// Lists pending requests for a business with requester identity,
    /// newest first.
    pub async fn list_pending_with_users(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<BusinessAccessRequestWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_access_requests");
        let result = sqlx::query_as::<_, BusinessAccessRequestWithUserEntity>(
            r#"
            SELECT r.id, r.business_id, r.user_id, r.requested_role, r.message,
                   r.status, r.created_at,
                   u.email, u.display_name
            FROM business_access_requests r
            JOIN users u ON u.id = r.user_id
            WHERE r.business_id = $1 AND r.status = 'pending'
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Approves a request: materializes the membership at the requested role
    /// and flips the status, in one transaction.
    ///
    /// Membership insert is idempotent (`ON CONFLICT DO NOTHING`) so a retry
    /// after a historical partial failure converges. Returns true if the
    /// status flip happened; false means the row was no longer pending.
    pub async fn approve_with_membership(
        &self,
        request_id: Uuid,
        business_id: Uuid,
        user_id: Uuid,
        requested_role: BusinessRole,
        reviewed_by: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("approve_access_request");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO business_members (business_id, user_id, role, invited_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (business_id, user_id) DO NOTHING
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(BusinessRoleDb::from(requested_role))
        .bind(reviewed_by)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE business_access_requests
            SET status = 'approved', reviewed_by = $2, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(reviewed_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(updated.rows_affected() > 0)
    }

    /// Rejects a pending request with reviewer metadata.
    ///
    /// Returns true if the status flip happened; false means the row was no
    /// longer pending.
    pub async fn reject(&self, request_id: Uuid, reviewed_by: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE business_access_requests
            SET status = 'rejected', reviewed_by = $2, reviewed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .bind(reviewed_by)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Withdraws a request: hard delete.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(&self, request_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM business_access_requests
            WHERE id = $1
            "#,
        )
        .bind(request_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
