//! Brand kit repository for database operations.

use serde_json::Value as JsonValue;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{BrandKitEntity, SharedBrandKitEntity};
use crate::metrics::QueryTimer;

/// Repository for brand kit database operations.
#[derive(Clone)]
pub struct BrandKitRepository {
    pool: PgPool,
}

impl BrandKitRepository {
    /// Creates a new brand kit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds the brand kit for a business, if one exists.
    pub async fn find_by_business(
        &self,
        business_id: Uuid,
    ) -> Result<Option<BrandKitEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_brand_kit");
        let result = sqlx::query_as::<_, BrandKitEntity>(
            r#"
            SELECT id, business_id, logo_url, colors, typography, tagline,
                   is_shared, share_token, created_at, updated_at
            FROM brand_kits
            WHERE business_id = $1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Creates or replaces the brand kit for a business.
    ///
    /// Sharing state (is_shared, share_token) is preserved across upserts.
    pub async fn upsert(
        &self,
        business_id: Uuid,
        logo_url: Option<&str>,
        colors: JsonValue,
        typography: Option<JsonValue>,
        tagline: Option<&str>,
    ) -> Result<BrandKitEntity, sqlx::Error> {
        let timer = QueryTimer::new("upsert_brand_kit");
        let result = sqlx::query_as::<_, BrandKitEntity>(
            r#"
            INSERT INTO brand_kits (business_id, logo_url, colors, typography, tagline)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (business_id) DO UPDATE
            SET logo_url = EXCLUDED.logo_url,
                colors = EXCLUDED.colors,
                typography = EXCLUDED.typography,
                tagline = EXCLUDED.tagline,
                updated_at = NOW()
            RETURNING id, business_id, logo_url, colors, typography, tagline,
                      is_shared, share_token, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(logo_url)
        .bind(colors)
        .bind(typography)
        .bind(tagline)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Enables sharing with a fresh token.
    ///
    /// Returns the updated row, or None if the business has no brand kit.
    pub async fn set_share_token(
        &self,
        business_id: Uuid,
        token: &str,
    ) -> Result<Option<BrandKitEntity>, sqlx::Error> {
        let result = sqlx::query_as::<_, BrandKitEntity>(
            r#"
            UPDATE brand_kits
            SET is_shared = TRUE, share_token = $2, updated_at = NOW()
            WHERE business_id = $1
            RETURNING id, business_id, logo_url, colors, typography, tagline,
                      is_shared, share_token, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    /// Disables sharing and invalidates the token.
    ///
    /// Returns true if a row was updated.
    pub async fn clear_share_token(&self, business_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE brand_kits
            SET is_shared = FALSE, share_token = NULL, updated_at = NOW()
            WHERE business_id = $1
            "#,
        )
        .bind(business_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Resolves a share token to the public brand kit view.
    ///
    /// Revoked tokens do not match even if the row still carries them.
    pub async fn find_shared_by_token(
        &self,
        token: &str,
    ) -> Result<Option<SharedBrandKitEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_shared_brand_kit");
        let result = sqlx::query_as::<_, SharedBrandKitEntity>(
            r#"
            SELECT b.name AS business_name, k.logo_url, k.colors, k.typography, k.tagline
            FROM brand_kits k
            JOIN businesses b ON b.id = k.business_id
            WHERE k.share_token = $1 AND k.is_shared = TRUE
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
