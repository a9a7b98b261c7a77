//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure rules of the event platform:
//! who may do what, when a registration is admitted, how the dashboard
//! aggregates. No database or HTTP types in here.

pub mod access;
pub mod dashboard;
pub mod event;
pub mod event_query;
pub mod password;
pub mod registration;
pub mod user;

pub use access::{ensure_can_manage, ensure_role, Caller};
pub use dashboard::{DashboardStats, PopularEvent};
pub use event::{
    parse_event_date, Event, EventChanges, EventDetails, EventStatus, NewEvent,
    RegistrationStatus,
};
pub use event_query::{EventQuery, EventSortField, SortOrder};
pub use password::Password;
pub use registration::{Attendee, Registration, RegistrationWithEvent};
pub use user::{NewUser, OrganizerSummary, ProfileChanges, User, UserProfile, UserRole};
