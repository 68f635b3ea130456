/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct. Every variable has a default, so the
/// server starts with an empty environment.
///
/// # Environment Variables
///
/// - `HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 3000)
/// - `APP_ENV`: `development` or `production` (default: development)
/// - `DATA_DIR`: Directory holding the JSON record files (default: data)
/// - `JWT_SECRET`: Bearer token signing secret (insecure fallback if unset)
/// - `SESSION_SECRET`: Session cookie signing secret (insecure fallback if unset)
/// - `RATE_LIMIT_PER_MINUTE`: Requests per client IP per minute (default: 100)
/// - `CORS_ORIGINS`: Comma-separated production origins
/// - `SIMULATE_LATENCY`: Whether tool simulators sleep (default: true)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use toolbox_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

/// Used when `JWT_SECRET` is unset. Anyone can forge tokens with it.
pub const FALLBACK_JWT_SECRET: &str = "ai-tools-jwt-secret";

/// Used when `SESSION_SECRET` is unset
pub const FALLBACK_SESSION_SECRET: &str = "ai-tools-secret-key";

const DEV_CORS_ORIGINS: &[&str] = &["http://localhost:3000", "http://127.0.0.1:3000"];
const PROD_CORS_ORIGINS: &[&str] = &["https://your-domain.com"];

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Record store configuration
    pub store: StoreConfig,

    /// Secrets for tokens and sessions
    pub auth: AuthConfig,

    /// Tool simulator configuration
    pub tools: ToolsConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Production mode: HSTS, secure cookies, configured CORS origins
    pub production: bool,

    /// Allowed CORS origins
    pub cors_origins: Vec<String>,

    /// Requests per client IP per minute
    pub rate_limit_per_minute: u32,
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the JSON files
    pub data_dir: PathBuf,
}

/// Signing secrets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing
    pub jwt_secret: String,

    /// Secret key for session cookie signatures
    pub session_secret: String,
}

/// Tool simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Whether simulators wait out their artificial latency
    pub simulate_latency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                production: false,
                cors_origins: DEV_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
                rate_limit_per_minute: 100,
            },
            store: StoreConfig {
                data_dir: PathBuf::from("data"),
            },
            auth: AuthConfig {
                jwt_secret: FALLBACK_JWT_SECRET.to_string(),
                session_secret: FALLBACK_SESSION_SECRET.to_string(),
            },
            tools: ToolsConfig {
                simulate_latency: true,
            },
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// Missing secrets fall back to hardcoded values with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable does not parse
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let host = env::var("HOST").unwrap_or(defaults.api.host);
        let port = match env::var("PORT") {
            Ok(port) => port.parse::<u16>()?,
            Err(_) => defaults.api.port,
        };

        let production = env::var("APP_ENV")
            .map(|v| v.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let cors_origins = if production {
            match env::var("CORS_ORIGINS") {
                Ok(origins) => parse_origins(&origins),
                Err(_) => PROD_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            }
        } else {
            defaults.api.cors_origins
        };

        let rate_limit_per_minute = match env::var("RATE_LIMIT_PER_MINUTE") {
            Ok(limit) => limit.parse::<u32>()?,
            Err(_) => defaults.api.rate_limit_per_minute,
        };
        if rate_limit_per_minute == 0 {
            anyhow::bail!("RATE_LIMIT_PER_MINUTE must be greater than zero");
        }

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.store.data_dir);

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure fallback secret");
            defaults.auth.jwt_secret
        });
        let session_secret = env::var("SESSION_SECRET").unwrap_or_else(|_| {
            tracing::warn!("SESSION_SECRET not set; using insecure fallback secret");
            defaults.auth.session_secret
        });

        let simulate_latency = match env::var("SIMULATE_LATENCY") {
            Ok(value) => value.parse::<bool>()?,
            Err(_) => defaults.tools.simulate_latency,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                production,
                cors_origins,
                rate_limit_per_minute,
            },
            store: StoreConfig { data_dir },
            auth: AuthConfig {
                jwt_secret,
                session_secret,
            },
            tools: ToolsConfig { simulate_latency },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Name of the environment, as reported by `/api/status`
    pub fn environment(&self) -> &'static str {
        if self.api.production {
            "production"
        } else {
            "development"
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
