//! Configuration for the bio editor and the site backend
//!
//! Both structs deserialize from plain JS objects (camelCase keys, every
//! field optional). The backend can also be configured from environment
//! variables when it runs inside a serverless function.

use serde::{Deserialize, Serialize};
use std::env;

use crate::text::DEFAULT_MAX_LENGTH;

/// Appearance and limits of the bio editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BioConfig {
    pub max_length: usize,
    /// CSS font family, combined with `font_size_px` into the canvas font
    pub font_family: String,
    pub font_size_px: f32,
    pub line_height: f32,
    pub padding: f32,
    pub text_color: String,
    pub background_color: String,
    pub link_background: String,
    pub link_text_color: String,
    pub email_background: String,
    pub email_text_color: String,
    pub caret_color: String,
    pub undo_limit: usize,
}

impl BioConfig {
    /// CSS font shorthand for the canvas context
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size_px, self.font_family)
    }
}

impl Default for BioConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            font_family: "Inter, system-ui, sans-serif".to_string(),
            font_size_px: 14.0,
            line_height: 20.0,
            padding: 12.0,
            text_color: "#111827".to_string(),
            background_color: "#ffffff".to_string(),
            link_background: "rgba(59, 130, 246, 0.15)".to_string(),
            link_text_color: "#1d4ed8".to_string(),
            email_background: "rgba(16, 185, 129, 0.15)".to_string(),
            email_text_color: "#047857".to_string(),
            caret_color: "#111827".to_string(),
            undo_limit: 100,
        }
    }
}

/// Backend settings for the waitlist and support routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    /// Recipient of support notifications
    pub admin_email: String,
    /// Sender address for all outgoing mail
    pub from_address: String,
    pub site_name: String,
    pub waitlist_collection: String,
    pub support_collection: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@example.com".to_string(),
            from_address: "hello@example.com".to_string(),
            site_name: "Our community".to_string(),
            waitlist_collection: "waitlist".to_string(),
            support_collection: "support_requests".to_string(),
        }
    }
}

impl SiteConfig {
    /// Read `ADMIN_EMAIL`, `MAIL_FROM` and `SITE_NAME`, keeping defaults for blanks
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            admin_email: env_string_opt("ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            from_address: env_string_opt("MAIL_FROM").unwrap_or(defaults.from_address),
            site_name: env_string_opt("SITE_NAME").unwrap_or(defaults.site_name),
            ..defaults
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_config_partial_json_keeps_defaults() {
        let config: BioConfig = serde_json::from_str(r#"{ "maxLength": 160, "fontSizePx": 16 }"#).unwrap();
        assert_eq!(config.max_length, 160);
        assert_eq!(config.font_size_px, 16.0);
        assert_eq!(config.line_height, 20.0);
        assert_eq!(config.font(), "16px Inter, system-ui, sans-serif");
    }

    #[test]
    fn test_default_max_length() {
        assert_eq!(BioConfig::default().max_length, 500);
    }

    #[test]
    fn test_site_config_partial_json() {
        let config: SiteConfig = serde_json::from_str(r#"{ "adminEmail": "ops@site.io" }"#).unwrap();
        assert_eq!(config.admin_email, "ops@site.io");
        assert_eq!(config.waitlist_collection, "waitlist");
    }

    #[test]
    fn test_env_string_opt_ignores_blank() {
        // Unset keys and whitespace-only values both fall back
        assert_eq!(env_string_opt("SITE_CORE_TEST_UNSET_KEY"), None);
    }
}
