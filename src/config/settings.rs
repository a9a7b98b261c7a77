//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MAX_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH,
};
use crate::errors::{AppError, AppResult};

/// Development-only signing secret, used when `JWT_SECRET` is unset in debug builds.
const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Application configuration.
///
/// Built once at startup and handed to the components that need it; nothing
/// reads the process environment after this point.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    /// Returns an internal error if the JWT secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH` or the expiration is outside
    /// `1..=MAX_JWT_EXPIRATION_HOURS`.
    pub fn new(
        database_url: impl Into<String>,
        jwt_secret: impl Into<String>,
        jwt_expiration_hours: i64,
    ) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();

        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::internal(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        if jwt_expiration_hours <= 0 {
            return Err(AppError::internal("JWT_EXPIRATION_HOURS must be positive"));
        }

        if jwt_expiration_hours > MAX_JWT_EXPIRATION_HOURS {
            return Err(AppError::internal(format!(
                "JWT_EXPIRATION_HOURS must be at most {}",
                MAX_JWT_EXPIRATION_HOURS
            )));
        }

        Ok(Self {
            database_url: database_url.into(),
            jwt_secret,
            jwt_expiration_hours,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    /// Fails if `JWT_SECRET` is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS);

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let mut config = Self::new(database_url, jwt_secret, jwt_expiration_hours)?;
        config.server_host =
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string());
        config.server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_secret() {
        let result = Config::new("postgres://localhost/test", "too-short", 24);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_non_positive_expiration() {
        let result = Config::new("postgres://localhost/test", DEV_JWT_SECRET, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_expiration_upper_bound() {
        let url = "postgres://localhost/test";
        assert!(Config::new(url, DEV_JWT_SECRET, MAX_JWT_EXPIRATION_HOURS).is_ok());

        let err = Config::new(url, DEV_JWT_SECRET, i64::MAX).unwrap_err();
        assert!(err.detail().contains("JWT_EXPIRATION_HOURS"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::new("postgres://user:pw@localhost/test", DEV_JWT_SECRET, 24).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(!rendered.contains("user:pw"));
        assert_eq!(config.server_addr(), "0.0.0.0:5000");
    }
}
