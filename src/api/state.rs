//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AuthService, DashboardService, EventService, RegistrationService, ServiceContainer, Services,
    UserService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub event_service: Arc<dyn EventService>,
    pub registration_service: Arc<dyn RegistrationService>,
    pub dashboard_service: Arc<dyn DashboardService>,
    /// Database handle for health checks; absent when services are faked
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Create application state backed by the database.
    pub fn from_config(database: Arc<Database>, config: &Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config);
        Self::from_services(&container, Some(database))
    }

    /// Create application state from any service container.
    pub fn from_services(
        services: &dyn ServiceContainer,
        database: Option<Arc<Database>>,
    ) -> Self {
        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            event_service: services.events(),
            registration_service: services.registrations(),
            dashboard_service: services.dashboard(),
            database,
        }
    }
}
