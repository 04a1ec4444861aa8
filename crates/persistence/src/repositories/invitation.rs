//! Business invitation repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::BusinessRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    BusinessInvitationEntity, BusinessInvitationWithDetailsEntity, BusinessRoleDb,
    InvitationStatusDb,
};
use crate::metrics::QueryTimer;

/// Repository for business invitation database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new invitation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a pending invitation.
    ///
    /// The partial unique index on (business_id, lower(email)) WHERE
    /// status = 'pending' backs the advisory duplicate pre-check; a 23505
    /// from here means a pending invitation already exists.
    pub async fn create(
        &self,
        business_id: Uuid,
        email: &str,
        role: BusinessRole,
        invited_by: Option<Uuid>,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<BusinessInvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, BusinessInvitationEntity>(
            r#"
            INSERT INTO business_invitations (business_id, email, role, invited_by, token, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, business_id, email, role, invited_by, token, status,
                      expires_at, created_at
            "#,
        )
        .bind(business_id)
        .bind(email)
        .bind(BusinessRoleDb::from(role))
        .bind(invited_by)
        .bind(token)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an invitation by its token.
    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<BusinessInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_token");
        let result = sqlx::query_as::<_, BusinessInvitationEntity>(
            r#"
            SELECT id, business_id, email, role, invited_by, token, status,
                   expires_at, created_at
            FROM business_invitations
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Finds an invitation by token, joined with inviter identity and a
    /// business summary for the public acceptance page.
    pub async fn find_with_details(
        &self,
        token: &str,
    ) -> Result<Option<BusinessInvitationWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_with_details");
        let result = sqlx::query_as::<_, BusinessInvitationWithDetailsEntity>(
            r#"
            SELECT i.id, i.business_id, i.email, i.role, i.invited_by, i.status,
                   i.expires_at, i.created_at,
                   b.name AS business_name, b.slug AS business_slug,
                   u.email AS inviter_email, u.display_name AS inviter_display_name
            FROM business_invitations i
            JOIN businesses b ON b.id = i.business_id
            LEFT JOIN users u ON u.id = i.invited_by
            WHERE i.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Lists invitations for a business, optionally filtered by status,
    /// newest first.
    pub async fn list_by_business(
        &self,
        business_id: Uuid,
        status: Option<InvitationStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BusinessInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_invitations");
        let result = match status {
            Some(status) => {
                sqlx::query_as::<_, BusinessInvitationEntity>(
                    r#"
                    SELECT id, business_id, email, role, invited_by, token, status,
                           expires_at, created_at
                    FROM business_invitations
                    WHERE business_id = $1 AND status = $2
                    ORDER BY created_at DESC
                    LIMIT $3 OFFSET $4
                    "#,
                )
                .bind(business_id)
                .bind(status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, BusinessInvitationEntity>(
                    r#"
                    SELECT id, business_id, email, role, invited_by, token, status,
                           expires_at, created_at
                    FROM business_invitations
                    WHERE business_id = $1
                    ORDER BY created_at DESC
                    LIMIT $2 OFFSET $3
                    "#,
                )
                .bind(business_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Counts invitations for a business, optionally filtered by status.
    pub async fn count_by_business(
        &self,
        business_id: Uuid,
        status: Option<InvitationStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = match status {
            Some(status) => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM business_invitations
                    WHERE business_id = $1 AND status = $2
                    "#,
                )
                .bind(business_id)
                .bind(status)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT COUNT(*) FROM business_invitations
                    WHERE business_id = $1
                    "#,
                )
                .bind(business_id)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(result.0)
    }

    /// Checks whether a pending invitation exists for this email.
    pub async fn has_pending(&self, business_id: Uuid, email: &str) -> Result<bool, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM business_invitations
            WHERE business_id = $1 AND LOWER(email) = LOWER($2) AND status = 'pending'
            "#,
        )
        .bind(business_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0 > 0)
    }

    /// Marks a pending invitation as expired.
    ///
    /// The expiry transition is permanent; it only fires while the row still
    /// reads pending, so a concurrent accept cannot be undone.
    pub async fn mark_expired(&self, invitation_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE business_invitations
            SET status = 'expired'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invitation_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Accepts an invitation: inserts the membership and flips the status in
    /// one transaction.
    ///
    /// The membership insert treats an existing identical row as already
    /// applied (`ON CONFLICT DO NOTHING`), so a retry after a historical
    /// partial failure converges instead of erroring. Returns true if the
    /// status flip happened; false means the row was no longer pending.
    pub async fn accept_with_membership(
        &self,
        invitation_id: Uuid,
        business_id: Uuid,
        user_id: Uuid,
        role: BusinessRole,
        invited_by: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("accept_invitation");
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
        .bind(BusinessRoleDb::from(role))
        .bind(invited_by)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE business_invitations
            SET status = 'accepted'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invitation_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(updated.rows_affected() > 0)
    }

    /// Declines a pending invitation.
    ///
    /// Returns true if the status flip happened; false means the row was no
    /// longer pending.
    pub async fn decline(&self, invitation_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE business_invitations
            SET status = 'declined'
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(invitation_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revokes an invitation: hard delete, any status.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(
        &self,
        invitation_id: Uuid,
        business_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM business_invitations
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(invitation_id)
        .bind(business_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
