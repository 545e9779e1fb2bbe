//! Configuration module for Bistro Core.
//!
//! Loads configuration from YAML files and environment variables.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Authentication configuration: signing key, token lifetime, and the
/// bootstrap admin seeded into an empty store.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_jwt_issuer")]
    pub jwt_issuer: String,
    /// Token validity duration in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    #[serde(default = "default_bootstrap_username")]
    pub bootstrap_username: String,
    #[serde(default = "default_bootstrap_password")]
    pub bootstrap_password: String,
    #[serde(default = "default_bootstrap_email")]
    pub bootstrap_email: Option<String>,
}

/// Image upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded menu item images are stored.
    #[serde(default = "default_upload_dir")]
    pub dir: String,
}

fn default_jwt_secret() -> String {
    // Dev-only fallback; override via BISTRO__AUTH__JWT_SECRET in production.
    "change-me-in-production".to_string()
}

fn default_jwt_issuer() -> String {
    "bistro-core".to_string()
}

fn default_token_ttl_minutes() -> i64 {
    30
}

fn default_bootstrap_username() -> String {
    "admin".to_string()
}

fn default_bootstrap_password() -> String {
    "admin123".to_string()
}

fn default_bootstrap_email() -> Option<String> {
    Some("admin@example.com".to_string())
}

fn default_upload_dir() -> String {
    "items".to_string()
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (BISTRO_*)
    /// 2. config/local.yaml (if exists)
    /// 3. config/default.yaml
    pub fn load() -> Result<Self, ConfigError> {
        let config = ConfigLoader::builder()
            // Start with default config
            .add_source(File::with_name("config/default").required(false))
            // Layer on local overrides
            .add_source(File::with_name("config/local").required(false))
            // Layer on environment variables with BISTRO_ prefix
            .add_source(
                Environment::with_prefix("BISTRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_issuer: default_jwt_issuer(),
            token_ttl_minutes: default_token_ttl_minutes(),
            bootstrap_username: default_bootstrap_username(),
            bootstrap_password: default_bootstrap_password(),
            bootstrap_email: default_bootstrap_email(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_auth_config() {
        let config = AuthConfig::default();
        assert_eq!(config.jwt_issuer, "bistro-core");
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.bootstrap_username, "admin");
        assert_eq!(config.bootstrap_password, "admin123");
    }

    #[test]
    fn test_default_upload_config() {
        let config = UploadConfig::default();
        assert_eq!(config.dir, "items");
    }
}
