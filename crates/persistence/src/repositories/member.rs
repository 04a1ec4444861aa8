//! Business member repository for database operations.

use domain::models::BusinessRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BusinessMemberEntity, BusinessMemberWithUserEntity, BusinessRoleDb};
use crate::metrics::QueryTimer;

/// Repository for business membership database operations.
#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    /// Creates a new member repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Adds a user to a business.
    ///
    /// The pre-check callers perform is advisory; the unique index on
    /// (business_id, user_id) is the real guard. A 23505 from here must be
    /// treated as "already a member".
    pub async fn create(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        role: BusinessRole,
        invited_by: Option<Uuid>,
    ) -> Result<BusinessMemberEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_member");
        let result = sqlx::query_as::<_, BusinessMemberEntity>(
            r#"
            INSERT INTO business_members (business_id, user_id, role, invited_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, business_id, user_id, role, invited_by, joined_at
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(BusinessRoleDb::from(role))
        .bind(invited_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds a membership row for (business, user).
    pub async fn find_by_business_and_user(
        &self,
        business_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<BusinessMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_member");
        let result = sqlx::query_as::<_, BusinessMemberEntity>(
            r#"
            SELECT id, business_id, user_id, role, invited_by, joined_at
            FROM business_members
            WHERE business_id = $1 AND user_id = $2
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists members of a business with user identity, most recent first.
    pub async fn list_with_users(
        &self,
        business_id: Uuid,
    ) -> Result<Vec<BusinessMemberWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_members_with_users");
        let result = sqlx::query_as::<_, BusinessMemberWithUserEntity>(
            r#"
            SELECT m.id, m.business_id, m.user_id, m.role, m.invited_by, m.joined_at,
                   u.email, u.display_name
            FROM business_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.business_id = $1
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Overwrites a member's role unconditionally. No history is kept.
    ///
    /// Returns the updated row, or None when no membership exists.
    pub async fn update_role(
        &self,
        business_id: Uuid,
        user_id: Uuid,
        role: BusinessRole,
    ) -> Result<Option<BusinessMemberEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_member_role");
        let result = sqlx::query_as::<_, BusinessMemberEntity>(
            r#"
            UPDATE business_members
            SET role = $3
            WHERE business_id = $1 AND user_id = $2
            RETURNING id, business_id, user_id, role, invited_by, joined_at
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .bind(BusinessRoleDb::from(role))
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Removes a membership row.
    ///
    /// Returns true if a row was deleted. The owner guard lives in the
    /// service layer; the owner never has a row here to begin with.
    pub async fn delete(&self, business_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_member");
        let result = sqlx::query(
            r#"
            DELETE FROM business_members
            WHERE business_id = $1 AND user_id = $2
            "#,
        )
        .bind(business_id)
        .bind(user_id)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }
}
