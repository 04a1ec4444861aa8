//! Brand kit entity (database row mapping).

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the brand_kits table.
#[derive(Debug, Clone, FromRow)]
pub struct BrandKitEntity {
    pub id: Uuid,
    pub business_id: Uuid,
    pub logo_url: Option<String>,
    pub colors: JsonValue,
    pub typography: Option<JsonValue>,
    pub tagline: Option<String>,
    pub is_shared: bool,
    pub share_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BrandKitEntity> for domain::models::BrandKit {
    fn from(entity: BrandKitEntity) -> Self {
        let colors: Vec<String> = serde_json::from_value(entity.colors).unwrap_or_default();
        let typography = entity
            .typography
            .and_then(|v| serde_json::from_value(v).ok());
        Self {
            id: entity.id,
            business_id: entity.business_id,
            logo_url: entity.logo_url,
            colors,
            typography,
            tagline: entity.tagline,
            is_shared: entity.is_shared,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Shared brand kit joined with its business name, for the public view.
#[derive(Debug, Clone, FromRow)]
pub struct SharedBrandKitEntity {
    pub business_name: String,
    pub logo_url: Option<String>,
    pub colors: JsonValue,
    pub typography: Option<JsonValue>,
    pub tagline: Option<String>,
}

impl From<SharedBrandKitEntity> for domain::models::brand_kit::SharedBrandKit {
    fn from(entity: SharedBrandKitEntity) -> Self {
        let colors: Vec<String> = serde_json::from_value(entity.colors).unwrap_or_default();
        let typography = entity
            .typography
            .and_then(|v| serde_json::from_value(v).ok());
        Self {
            business_name: entity.business_name,
            logo_url: entity.logo_url,
            colors,
            typography,
            tagline: entity.tagline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_into_domain_parses_json_fields() {
        let entity = BrandKitEntity {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            logo_url: None,
            colors: json!(["#1a2b3c", "#fff"]),
            typography: Some(json!({"heading_font": "Inter", "body_font": "Lora"})),
            tagline: Some("Bold brands".to_string()),
            is_shared: false,
            share_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let kit: domain::models::BrandKit = entity.into();
        assert_eq!(kit.colors, vec!["#1a2b3c", "#fff"]);
        assert_eq!(kit.typography.unwrap().heading_font, "Inter");
    }

    #[test]
    fn test_malformed_json_degrades_to_defaults() {
        let entity = BrandKitEntity {
            id: Uuid::new_v4(),
            business_id: Uuid::new_v4(),
            logo_url: None,
            colors: json!("not-an-array"),
            typography: Some(json!(42)),
            tagline: None,
            is_shared: false,
            share_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let kit: domain::models::BrandKit = entity.into();
        assert!(kit.colors.is_empty());
        assert!(kit.typography.is_none());
    }
}
