//! Configuration management for the forum service.
//!
//! Everything is read from environment variables with development defaults;
//! values that must not be defaulted in production fail loading instead.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Remote document-store configuration
    pub store: StoreConfig,
    /// Identity-provider configuration
    pub identity: IdentityConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Remote document-store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database root URL
    pub url: String,
    /// Optional access token forwarded with every request
    pub auth_token: Option<String>,
}

/// Identity-provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Provider base URL
    pub url: String,
    /// Project API key
    pub api_key: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("FORUM_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("FORUM_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if app_env.eq_ignore_ascii_case("production") => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if app_env.eq_ignore_ascii_case("production") && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            store: StoreConfig {
                url: std::env::var("STORE_URL")
                    .unwrap_or_else(|_| "http://localhost:9000".to_string()),
                auth_token: std::env::var("STORE_AUTH_TOKEN").ok().filter(|t| !t.is_empty()),
            },
            identity: {
                let api_key = std::env::var("IDENTITY_API_KEY").unwrap_or_else(|_| "".to_string());
                if app_env.eq_ignore_ascii_case("production") && api_key.trim().is_empty() {
                    return Err("IDENTITY_API_KEY must be set in production".to_string());
                }

                IdentityConfig {
                    url: std::env::var("IDENTITY_URL")
                        .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
                    api_key,
                }
            },
        })
    }
}
