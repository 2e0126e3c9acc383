use crate::auth::jwt::{JwtConfig, DEFAULT_JWT_SECRET};

/// `APP_ENV` value that turns on production checks.
pub const ENV_PRODUCTION: &str = "production";

/// Errors raised while reading configuration from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("JWT_SECRET must be set to a non-default value when APP_ENV=production")]
    InsecureJwtSecret,
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Deployment environment (default: `development`).
    pub app_env: String,
    /// Public URL of the web frontend. Used as the CORS origin and as the
    /// base of links sent by email.
    pub frontend_url: String,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT session token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                            |
    /// |------------------------|------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                          |
    /// | `PORT`                 | `8080`                             |
    /// | `APP_ENV`              | `development`                      |
    /// | `FRONTEND_URL`         | `http://localhost:3000`            |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                               |
    /// | `JWT_SECRET`           | `dev-secret-change-in-production`  |
    /// | `JWT_EXPIRY_DAYS`      | `7`                                |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let host = get("HOST", "0.0.0.0");
        let port = parse_var("PORT", get("PORT", "8080"))?;
        let app_env = get("APP_ENV", "development");
        let frontend_url = get("FRONTEND_URL", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string();
        if frontend_url.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::Invalid {
                var: "FRONTEND_URL",
                value: frontend_url,
            });
        }
        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", get("REQUEST_TIMEOUT_SECS", "30"))?;

        let jwt = JwtConfig {
            secret: get("JWT_SECRET", DEFAULT_JWT_SECRET),
            expiry_days: parse_var("JWT_EXPIRY_DAYS", get("JWT_EXPIRY_DAYS", "7"))?,
        };

        if app_env == ENV_PRODUCTION && jwt.secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::InsecureJwtSecret);
        }

        Ok(Self {
            host,
            port,
            app_env,
            frontend_url,
            request_timeout_secs,
            jwt,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == ENV_PRODUCTION
    }

    /// Public address of a profile page.
    pub fn profile_url(&self, slug: &str) -> String {
        format!("{}/p/{slug}", self.frontend_url)
    }

    /// Link embedded in password reset emails.
    pub fn reset_password_url(&self, token: &str) -> String {
        format!("{}/reset-password?token={token}", self.frontend_url)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { var, value })
}
