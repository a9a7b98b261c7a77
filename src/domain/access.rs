//! Capability checks.
//!
//! Roles grant capabilities; event ownership is checked per operation by
//! comparing the event's organizer with the caller.

use uuid::Uuid;

use super::event::Event;
use super::user::UserRole;
use crate::errors::{AppError, AppResult};

/// Identity of the authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: UserRole,
}

impl Caller {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    /// Organizer of `event`, or an admin.
    pub fn can_manage(&self, event: &Event) -> bool {
        self.role.is_admin() || event.organizer_id == self.id
    }
}

/// Fail with `Forbidden` unless the caller's role grants `required`.
pub fn ensure_role(caller: &Caller, required: UserRole) -> AppResult<()> {
    if caller.role.can_access(&required) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Access denied: {} role required",
            required
        )))
    }
}

/// Fail with `Forbidden` unless the caller may manage `event`.
/// `action` completes the message, e.g. "update this event".
pub fn ensure_can_manage(caller: &Caller, event: &Event, action: &str) -> AppResult<()> {
    if caller.can_manage(event) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!("Not authorized to {}", action)))
    }
}
