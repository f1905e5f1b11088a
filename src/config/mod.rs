use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Hard cap on document upload size in bytes.
    pub max_file_bytes: u64,
    /// Accepted document mimetypes.
    pub allowed_mimetypes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment-shaped defaults first, specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout_secs =
                v.parse().unwrap_or(self.database.connection_timeout_secs);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_FILE_BYTES") {
            self.uploads.max_file_bytes = v.parse().unwrap_or(self.uploads.max_file_bytes);
        }
        self
    }

    fn base_uploads() -> UploadConfig {
        UploadConfig {
            max_file_bytes: 5 * 1024 * 1024, // 5MB
            allowed_mimetypes: vec![
                "application/pdf".to_string(),
                "image/jpeg".to_string(),
                "image/png".to_string(),
            ],
        }
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig { max_connections: 10, connection_timeout_secs: 30 },
            security: SecurityConfig {
                // Dev-only fallback; production requires JWT_SECRET
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7,
            },
            uploads: Self::base_uploads(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig { max_connections: 20, connection_timeout_secs: 10 },
            security: SecurityConfig { jwt_secret: String::new(), jwt_expiry_hours: 24 },
            uploads: Self::base_uploads(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig { max_connections: 50, connection_timeout_secs: 5 },
            security: SecurityConfig { jwt_secret: String::new(), jwt_expiry_hours: 4 },
            uploads: Self::base_uploads(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.uploads.max_file_bytes, 5 * 1024 * 1024);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_requires_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }
}
