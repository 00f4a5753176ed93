use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

/// Secret used when `JWT_SECRET` is not set. Production refuses to start with it.
pub const DEV_JWT_SECRET: &str = "studio-dev-secret-change-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub listing: ListingConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built admin UI. A built-in shell is served when missing.
    pub admin_ui_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    pub public_page_size: i64,
    pub admin_page_size: i64,
    pub recents_size: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadBackend {
    Local,
    Remote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub backend: UploadBackend,
    pub local_dir: String,
    /// URL prefix under which locally stored files are served.
    pub public_base_url: String,
    pub remote_endpoint: Option<String>,
    #[serde(skip_serializing)]
    pub remote_token: Option<String>,
    pub thumbnail_max_bytes: usize,
    pub content_max_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Refuse configurations that would be unsafe to serve.
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production()
            && (self.security.jwt_secret.is_empty() || self.security.jwt_secret == DEV_JWT_SECRET)
        {
            return Err("JWT_SECRET must be set to a unique value in production".to_string());
        }
        if self.upload.backend == UploadBackend::Remote && self.upload.remote_endpoint.is_none() {
            return Err("UPLOAD_REMOTE_ENDPOINT is required when UPLOAD_BACKEND=remote".to_string());
        }
        if self.listing.max_limit < 1 {
            return Err("LISTING_MAX_LIMIT must be positive".to_string());
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("STUDIO_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("ADMIN_UI_DIR") {
            self.server.admin_ui_dir = v;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // Listing overrides
        if let Ok(v) = env::var("LISTING_PUBLIC_PAGE_SIZE") {
            self.listing.public_page_size = v.parse().unwrap_or(self.listing.public_page_size);
        }
        if let Ok(v) = env::var("LISTING_ADMIN_PAGE_SIZE") {
            self.listing.admin_page_size = v.parse().unwrap_or(self.listing.admin_page_size);
        }
        if let Ok(v) = env::var("LISTING_RECENTS_SIZE") {
            self.listing.recents_size = v.parse().unwrap_or(self.listing.recents_size);
        }
        if let Ok(v) = env::var("LISTING_MAX_LIMIT") {
            self.listing.max_limit = v.parse().unwrap_or(self.listing.max_limit);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Upload overrides
        match env::var("UPLOAD_BACKEND").as_deref() {
            Ok("remote") => self.upload.backend = UploadBackend::Remote,
            Ok("local") => self.upload.backend = UploadBackend::Local,
            _ => {}
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.upload.local_dir = v;
        }
        if let Ok(v) = env::var("UPLOAD_PUBLIC_BASE_URL") {
            self.upload.public_base_url = v;
        }
        if let Ok(v) = env::var("UPLOAD_REMOTE_ENDPOINT") {
            self.upload.remote_endpoint = Some(v);
        }
        if let Ok(v) = env::var("UPLOAD_REMOTE_TOKEN") {
            self.upload.remote_token = Some(v);
        }
        if let Ok(v) = env::var("UPLOAD_THUMBNAIL_MAX_BYTES") {
            self.upload.thumbnail_max_bytes = v.parse().unwrap_or(self.upload.thumbnail_max_bytes);
        }
        if let Ok(v) = env::var("UPLOAD_CONTENT_MAX_BYTES") {
            self.upload.content_max_bytes = v.parse().unwrap_or(self.upload.content_max_bytes);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                admin_ui_dir: "public/admin".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/studio".to_string(),
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            listing: ListingConfig {
                public_page_size: 21,
                admin_page_size: 20,
                recents_size: 6,
                max_limit: 100,
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cookie_secure: false,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            upload: UploadConfig {
                backend: UploadBackend::Local,
                local_dir: "uploads".to_string(),
                public_base_url: "/uploads".to_string(),
                remote_endpoint: None,
                remote_token: None,
                thumbnail_max_bytes: 10 * 1024 * 1024, // 10MB
                content_max_bytes: 50 * 1024 * 1024,   // 50MB
            },
        }
    }

    pub fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.server.host = "0.0.0.0".to_string();
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.security.cookie_secure = true;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.server.host = "0.0.0.0".to_string();
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.api.enable_request_logging = false;
        config.security.jwt_secret = String::new();
        config.security.cookie_secure = true;
        config.security.cors_origins = vec!["https://www.example.com".to_string()];
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Production
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.listing.public_page_size, 21);
        assert_eq!(config.listing.admin_page_size, 20);
        assert_eq!(config.security.jwt_expiry_hours, 168);
        assert!(!config.security.cookie_secure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.cookie_secure);
        assert!(!config.api.enable_request_logging);
        assert_eq!(config.upload.thumbnail_max_bytes, 10 * 1024 * 1024);
        assert_eq!(config.upload.content_max_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn production_rejects_missing_or_default_secret() {
        let mut config = AppConfig::production();
        assert!(config.validate().is_err());

        config.security.jwt_secret = DEV_JWT_SECRET.to_string();
        assert!(config.validate().is_err());

        config.security.jwt_secret = "a-real-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn remote_backend_requires_endpoint() {
        let mut config = AppConfig::development();
        config.upload.backend = UploadBackend::Remote;
        assert!(config.validate().is_err());

        config.upload.remote_endpoint = Some("https://uploads.example.com/api".to_string());
        assert!(config.validate().is_ok());
    }
}
