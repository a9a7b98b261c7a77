//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services use Unit of Work pattern for centralized repository
//! access and transaction management.

mod auth_service;
pub mod container;
mod dashboard_service;
mod event_service;
mod registration_service;
mod token;
mod user_service;

#[cfg(test)]
mod test_support;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthResponse, AuthService, Authenticator, NewAccount};
pub use dashboard_service::{DashboardManager, DashboardService};
pub use event_service::{EventListResponse, EventManager, EventService};
pub use registration_service::{RegistrationManager, RegistrationService};
pub use token::{Claims, TokenIssuer};
pub use user_service::{ProfileUpdate, UserManager, UserService};
