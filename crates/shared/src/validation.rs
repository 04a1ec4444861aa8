//! Common validation utilities.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of a business name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a business slug.
pub const MAX_SLUG_LENGTH: usize = 64;

/// Maximum length of an access-request message.
pub const MAX_MESSAGE_LENGTH: usize = 500;

lazy_static! {
    static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    static ref HEX_COLOR_RE: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
}

/// Validates a URL-safe business slug (lowercase alphanumerics and hyphens).
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        let mut err = ValidationError::new("slug_length");
        err.message = Some("Slug must be between 1 and 64 characters".into());
        return Err(err);
    }
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message = Some("Slug must contain only lowercase letters, digits and hyphens".into());
        Err(err)
    }
}

/// Validates a member role string (`admin`, `editor` or `viewer`).
///
/// `owner` is deliberately rejected: ownership is implicit and never
/// assignable through membership.
pub fn validate_member_role(role: &str) -> Result<(), ValidationError> {
    match role {
        "admin" | "editor" | "viewer" => Ok(()),
        _ => {
            let mut err = ValidationError::new("role_invalid");
            err.message = Some("Role must be one of: admin, editor, viewer".into());
            Err(err)
        }
    }
}

/// Validates a CSS hex color (`#rgb` or `#rrggbb`).
pub fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    if HEX_COLOR_RE.is_match(color) {
        Ok(())
    } else {
        let mut err = ValidationError::new("hex_color");
        err.message = Some("Color must be a hex value like #1a2b3c".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Slug tests
    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("acme").is_ok());
        assert!(validate_slug("acme-design-co").is_ok());
        assert!(validate_slug("studio99").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug("acme_design").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("acme-").is_err());
    }

    #[test]
    fn test_validate_slug_length() {
        let max = "a".repeat(MAX_SLUG_LENGTH);
        assert!(validate_slug(&max).is_ok());
        let too_long = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(validate_slug(&too_long).is_err());
    }

    #[test]
    fn test_validate_slug_error_message() {
        let err = validate_slug("Not A Slug").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Slug must contain only lowercase letters, digits and hyphens"
        );
    }

    // Role tests
    #[test]
    fn test_validate_member_role() {
        assert!(validate_member_role("admin").is_ok());
        assert!(validate_member_role("editor").is_ok());
        assert!(validate_member_role("viewer").is_ok());
        assert!(validate_member_role("superuser").is_err());
        assert!(validate_member_role("").is_err());
    }

    #[test]
    fn test_validate_member_role_rejects_owner() {
        // Ownership is implicit, never a membership role
        assert!(validate_member_role("owner").is_err());
    }

    #[test]
    fn test_validate_member_role_case_sensitive() {
        assert!(validate_member_role("Admin").is_err());
        assert!(validate_member_role("EDITOR").is_err());
    }

    // Hex color tests
    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("#fff").is_ok());
        assert!(validate_hex_color("#FF5733").is_ok());
        assert!(validate_hex_color("#1a2b3c").is_ok());
        assert!(validate_hex_color("fff").is_err());
        assert!(validate_hex_color("#ff573").is_err());
        assert!(validate_hex_color("#gggggg").is_err());
        assert!(validate_hex_color("").is_err());
    }

    #[test]
    fn test_validate_hex_color_error_message() {
        let err = validate_hex_color("blue").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Color must be a hex value like #1a2b3c"
        );
    }
}
