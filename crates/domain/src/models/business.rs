//! Business domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::MAX_NAME_LENGTH;

/// A tenant business. The owner is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Business {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact business identity embedded in invitation lookups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessSummary {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<&Business> for BusinessSummary {
    fn from(business: &Business) -> Self {
        Self {
            id: business.id,
            name: business.name.clone(),
            slug: business.slug.clone(),
        }
    }
}

/// Request to create a business. The caller becomes the owner.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateBusinessRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub slug: String,

    #[validate(length(max = 80, message = "Industry must be at most 80 characters"))]
    pub industry: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request to update business details. Slug and owner are immutable.
///
/// Partial update: fields omitted from the request keep their current
/// values. There is no way to clear industry or description through
/// this endpoint; send a replacement value instead.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 80, message = "Industry must be at most 80 characters"))]
    pub industry: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// A business together with the caller's relationship to it, for listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BusinessWithRole {
    #[serde(flatten)]
    pub business: Business,
    /// "owner" or the caller's membership role.
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn valid_request() -> CreateBusinessRequest {
        CreateBusinessRequest {
            name: "Acme Design Co".to_string(),
            slug: "acme-design-co".to_string(),
            industry: Some("design".to_string()),
            description: None,
        }
    }

    #[test]
    fn test_create_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_slug() {
        let mut request = valid_request();
        request.slug = "Not A Slug".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_long_name() {
        let mut request = valid_request();
        request.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_business_summary_from_business() {
        let business = Business {
            id: Uuid::new_v4(),
            owner_user_id: Uuid::new_v4(),
            name: "Acme".to_string(),
            slug: "acme".to_string(),
            industry: None,
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let summary = BusinessSummary::from(&business);
        assert_eq!(summary.id, business.id);
        assert_eq!(summary.slug, "acme");
    }
}
