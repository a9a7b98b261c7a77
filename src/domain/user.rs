//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{ROLE_ADMIN, ROLE_ORGANIZER, ROLE_STUDENT};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Organizer,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Check if this role grants what `required` asks for.
    /// Admins are granted every role.
    pub fn can_access(&self, required: &UserRole) -> bool {
        self.is_admin() || self == required
    }

    /// Parse a role from its wire/database form.
    pub fn parse(s: &str) -> AppResult<Self> {
        match s {
            ROLE_STUDENT => Ok(UserRole::Student),
            ROLE_ORGANIZER => Ok(UserRole::Organizer),
            ROLE_ADMIN => Ok(UserRole::Admin),
            other => Err(AppError::validation(format!("Unknown role '{}'", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => ROLE_STUDENT,
            UserRole::Organizer => ROLE_ORGANIZER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }
}

/// Lenient conversion used when reading rows back from the database.
/// Unknown values fall back to the least privileged role.
impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data needed to persist a new account. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
}

/// Profile fields a user may change on their own account.
///
/// `password_hash` is filled in by the service after hashing; the plain
/// password never reaches the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.phone.is_none()
            && self.college.is_none()
            && self.department.is_none()
            && self.password_hash.is_none()
    }
}

/// User profile (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@college.edu")]
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            college: user.college,
            department: user.department,
            created_at: user.created_at,
        }
    }
}

/// Public view of an event's organizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrganizerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<&User> for OrganizerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_wire_form() {
        for role in [UserRole::Student, UserRole::Organizer, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()).unwrap(), role);
        }
        assert!(UserRole::parse("superuser").is_err());
        assert_eq!(UserRole::from("superuser"), UserRole::Student);
    }

    #[test]
    fn test_admin_can_access_every_role() {
        assert!(UserRole::Admin.can_access(&UserRole::Organizer));
        assert!(UserRole::Organizer.can_access(&UserRole::Organizer));
        assert!(!UserRole::Student.can_access(&UserRole::Organizer));
        assert!(!UserRole::Organizer.can_access(&UserRole::Admin));
    }

    #[test]
    fn test_profile_changes_is_empty() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            college: Some("IIT".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
