//! Configuration Module
//!
//! Centralized configuration management for the catalog service: server,
//! database, authentication, email, and avatar storage settings, all read
//! from environment variables with sensible defaults.

use thiserror::Error;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as boolean with default
    pub fn get_bool(key: &str, default: bool) -> bool {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u32 with default
    pub fn get_u32(key: &str, default: u32) -> u32 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as u64 with default
    pub fn get_u64(key: &str, default: u64) -> u64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as usize with default
    pub fn get_usize(key: &str, default: usize) -> usize {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Check if environment variable is set
    pub fn is_set(key: &str) -> bool {
        env::var(key).is_ok()
    }
}

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration combining all service configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Email configuration (absent when SMTP is not configured)
    pub email: Option<EmailConfig>,

    /// Avatar storage configuration
    pub storage: StorageConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_hours: i64,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_email: String,
    pub from_name: String,
    pub template_dir: String,
    /// Base URL the password-reset link points at
    pub app_base_url: String,
}

/// Avatar storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory avatar files are written to
    pub avatar_dir: String,

    /// URL prefix the avatar directory is served under
    pub public_base_url: String,

    /// Maximum accepted avatar size in bytes
    pub max_avatar_bytes: usize,
}

impl AppConfig {
    /// Load the full application configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVariable("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVariable("JWT_SECRET"))?;

        let email = if env::is_set("SMTP_USERNAME") {
            Some(EmailConfig {
                smtp_host: env::get_string("SMTP_HOST", "localhost"),
                smtp_port: env::get_u16("SMTP_PORT", 587),
                smtp_username: env::get_string("SMTP_USERNAME", ""),
                smtp_password: env::get_string("SMTP_PASSWORD", ""),
                from_email: env::get_string("FROM_EMAIL", "no-reply@localhost"),
                from_name: env::get_string("FROM_NAME", "Catalog Service"),
                template_dir: env::get_string("EMAIL_TEMPLATE_DIR", "templates"),
                app_base_url: env::get_string("APP_BASE_URL", "http://localhost:3000"),
            })
        } else {
            None
        };

        Ok(Self {
            server: ServerConfig {
                host: env::get_string("SERVER_HOST", "0.0.0.0"),
                port: env::get_u16("SERVER_PORT", 3000),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: env::get_u32("DB_MAX_CONNECTIONS", 20),
                min_connections: env::get_u32("DB_MIN_CONNECTIONS", 1),
                connect_timeout_seconds: env::get_u64("DB_CONNECT_TIMEOUT", 30),
                idle_timeout_seconds: env::get_u64("DB_IDLE_TIMEOUT", 600),
                max_lifetime_seconds: env::get_u64("DB_MAX_LIFETIME", 3600),
            },
            jwt: JwtConfig {
                secret: jwt_secret,
                access_token_expires_hours: env::get_i64("JWT_EXPIRES_HOURS", 24),
            },
            email,
            storage: StorageConfig {
                avatar_dir: env::get_string("AVATAR_DIR", "uploads/avatars"),
                public_base_url: env::get_string("AVATAR_BASE_URL", "/avatars"),
                max_avatar_bytes: env::get_usize("MAX_AVATAR_BYTES", 5 * 1024 * 1024),
            },
        })
    }

    /// Validate cross-field constraints after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("SERVER_PORT must not be 0".into()));
        }
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be at least 32 characters".into(),
            ));
        }
        if self.jwt.access_token_expires_hours <= 0 {
            return Err(ConfigError::Invalid(
                "JWT_EXPIRES_HOURS must be positive".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "DB_MAX_CONNECTIONS must be positive".into(),
            ));
        }
        if self.storage.max_avatar_bytes == 0 {
            return Err(ConfigError::Invalid(
                "MAX_AVATAR_BYTES must be positive".into(),
            ));
        }
        Ok(())
    }
}
