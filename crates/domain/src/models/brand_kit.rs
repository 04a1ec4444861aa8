//! Brand kit domain models.
//!
//! A brand kit holds the generated identity assets for a business: logo,
//! color palette, typography and tagline. At most one kit exists per
//! business; generation itself happens outside this service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Typography choices for a brand kit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Typography {
    pub heading_font: String,
    pub body_font: String,
}

/// Brand kit domain model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrandKit {
    pub id: Uuid,
    pub business_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Palette as hex color strings, primary first.
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace the kit for a business.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpsertBrandKitRequest {
    #[validate(url(message = "Logo must be a valid URL"))]
    pub logo_url: Option<String>,

    #[validate(custom(function = "validate_palette"))]
    pub colors: Vec<String>,

    pub typography: Option<Typography>,

    #[validate(length(max = 200, message = "Tagline must be at most 200 characters"))]
    pub tagline: Option<String>,
}

/// Public view of a shared brand kit. Internal identifiers are omitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SharedBrandKit {
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Response after enabling sharing: the public link token, shown here only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ShareBrandKitResponse {
    pub share_token: String,
    pub is_shared: bool,
}

/// Palette must hold 1 to 12 hex colors.
fn validate_palette(colors: &[String]) -> Result<(), ValidationError> {
    if colors.is_empty() || colors.len() > 12 {
        let mut err = ValidationError::new("palette_size");
        err.message = Some("Palette must contain between 1 and 12 colors".into());
        return Err(err);
    }
    for color in colors {
        shared::validation::validate_hex_color(color)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UpsertBrandKitRequest {
        UpsertBrandKitRequest {
            logo_url: Some("https://cdn.example.com/logo.png".to_string()),
            colors: vec!["#1a2b3c".to_string(), "#fff".to_string()],
            typography: Some(Typography {
                heading_font: "Inter".to_string(),
                body_font: "Source Serif".to_string(),
            }),
            tagline: Some("Bold brands in minutes".to_string()),
        }
    }

    #[test]
    fn test_upsert_request_valid() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_palette() {
        let mut request = valid_request();
        request.colors.clear();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rejects_non_hex_colors() {
        let mut request = valid_request();
        request.colors.push("tomato".to_string());
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_palette() {
        let mut request = valid_request();
        request.colors = vec!["#ffffff".to_string(); 13];
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rejects_invalid_logo_url() {
        let mut request = valid_request();
        request.logo_url = Some("not a url".to_string());
        assert!(request.validate().is_err());
    }
}
