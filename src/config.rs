/// Configuration management for Argus ID
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub token: TokenConfig,
    pub storage: StorageConfig,
    pub email: Option<EmailConfig>,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
    /// Externally reachable base URL, used in password-reset links
    pub public_url: String,
}

/// Signed-token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub security_key: String,
    pub issuer: String,
    pub audience: String,
    pub expiration_minutes: i64,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_directory: PathBuf,
    pub user_db: PathBuf,
}

/// Email configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_url: String,
    pub from_address: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("ARGUS_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("ARGUS_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;

        let public_url = env::var("ARGUS_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://{}:{}", hostname, port));

        let security_key = env::var("ARGUS_TOKEN_SECURITY_KEY")
            .map_err(|_| ApiError::Validation("Token security key required".to_string()))?;
        let issuer = env::var("ARGUS_TOKEN_ISSUER")
            .unwrap_or_else(|_| format!("https://{}", hostname));
        let audience = env::var("ARGUS_TOKEN_AUDIENCE")
            .unwrap_or_else(|_| format!("https://{}", hostname));
        let expiration_minutes = env::var("ARGUS_TOKEN_EXPIRATION_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid token expiration".to_string()))?;

        let data_directory: PathBuf = env::var("ARGUS_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let user_db = env::var("ARGUS_USER_DB_LOCATION")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("users.sqlite"));

        let email = if let Ok(smtp_url) = env::var("ARGUS_EMAIL_SMTP_URL") {
            Some(EmailConfig {
                smtp_url,
                from_address: env::var("ARGUS_EMAIL_FROM_ADDRESS")
                    .unwrap_or_else(|_| format!("noreply@{}", hostname)),
            })
        } else {
            None
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig {
                hostname,
                port,
                public_url,
            },
            token: TokenConfig {
                security_key,
                issuer,
                audience,
                expiration_minutes,
            },
            storage: StorageConfig {
                data_directory,
                user_db,
            },
            email,
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.token.security_key.len() < 32 {
            return Err(ApiError::Validation(
                "Token security key must be at least 32 characters".to_string(),
            ));
        }

        if self.token.expiration_minutes < 1 {
            return Err(ApiError::Validation(
                "Token expiration must be at least one minute".to_string(),
            ));
        }

        Ok(())
    }
}
