//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

pub(crate) mod entities;
mod event_repository;
mod registration_repository;
mod user_repository;

pub use event_repository::{EventRepository, EventStore};
pub use registration_repository::{RegistrationRepository, RegistrationStore};
pub use user_repository::{UserRepository, UserStore};

pub(crate) use event_repository::find_event;
pub(crate) use registration_repository::{count_for_event, find_registration, insert_registration};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use event_repository::MockEventRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use registration_repository::MockRegistrationRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
