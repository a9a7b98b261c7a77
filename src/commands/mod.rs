//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod migrate;
pub mod serve;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Open the database, optionally applying pending migrations.
pub(crate) async fn open_database(config: &Config, migrate: bool) -> AppResult<Database> {
    let db = if migrate {
        Database::connect(config).await
    } else {
        Database::connect_without_migrations(config).await
    };

    db.map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connection_failure_keeps_cause() {
        let config = Config::new(
            "not a database url",
            "test-secret-that-is-at-least-32-characters",
            24,
        )
        .unwrap();

        let err = open_database(&config, false).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err.detail().starts_with("Database connection failed: "));
        assert!(err.detail().contains("cannot be parsed"));
    }
}
