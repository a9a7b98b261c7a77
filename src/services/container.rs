//! Service Container - Centralized service access.
//!
//! Depends on service traits, not implementations, so the HTTP layer can be
//! driven by fakes in tests.

use std::sync::Arc;

use super::{
    AuthService, Authenticator, DashboardManager, DashboardService, EventManager, EventService,
    RegistrationManager, RegistrationService, UserManager, UserService,
};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn events(&self) -> Arc<dyn EventService>;

    fn registrations(&self) -> Arc<dyn RegistrationService>;

    fn dashboard(&self) -> Arc<dyn DashboardService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    event_service: Arc<dyn EventService>,
    registration_service: Arc<dyn RegistrationService>,
    dashboard_service: Arc<dyn DashboardService>,
}

impl Services {
    /// Assemble a container from already-built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        event_service: Arc<dyn EventService>,
        registration_service: Arc<dyn RegistrationService>,
        dashboard_service: Arc<dyn DashboardService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            event_service,
            registration_service,
            dashboard_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: &Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            event_service: Arc::new(EventManager::new(uow.clone())),
            registration_service: Arc::new(RegistrationManager::new(uow.clone())),
            dashboard_service: Arc::new(DashboardManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn events(&self) -> Arc<dyn EventService> {
        self.event_service.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationService> {
        self.registration_service.clone()
    }

    fn dashboard(&self) -> Arc<dyn DashboardService> {
        self.dashboard_service.clone()
    }
}
