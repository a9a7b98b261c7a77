//! Event aggregate: lifecycle enums, the event entity and its admission rules.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::user::OrganizerSummary;
use crate::config::{
    EVENT_STATUS_CANCELLED, EVENT_STATUS_COMPLETED, EVENT_STATUS_ONGOING, EVENT_STATUS_UPCOMING,
    REGISTRATION_STATUS_CLOSED, REGISTRATION_STATUS_OPEN,
};
use crate::errors::{AppError, AppResult};

/// Where an event is in its lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => EVENT_STATUS_UPCOMING,
            EventStatus::Ongoing => EVENT_STATUS_ONGOING,
            EventStatus::Completed => EVENT_STATUS_COMPLETED,
            EventStatus::Cancelled => EVENT_STATUS_CANCELLED,
        }
    }
}

impl From<&str> for EventStatus {
    fn from(s: &str) -> Self {
        match s {
            EVENT_STATUS_ONGOING => EventStatus::Ongoing,
            EVENT_STATUS_COMPLETED => EventStatus::Completed,
            EVENT_STATUS_CANCELLED => EventStatus::Cancelled,
            _ => EventStatus::Upcoming,
        }
    }
}

/// Whether an event currently accepts sign-ups, independent of [`EventStatus`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Open,
    Closed,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Open => REGISTRATION_STATUS_OPEN,
            RegistrationStatus::Closed => REGISTRATION_STATUS_CLOSED,
        }
    }
}

impl From<&str> for RegistrationStatus {
    fn from(s: &str) -> Self {
        match s {
            REGISTRATION_STATUS_CLOSED => RegistrationStatus::Closed,
            _ => RegistrationStatus::Open,
        }
    }
}

/// Event domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    #[schema(example = "Intro to Rust Workshop")]
    pub title: String,
    pub description: String,
    #[schema(example = "workshop")]
    pub category: String,
    #[schema(example = "Main Auditorium")]
    pub venue: String,
    pub date: DateTime<Utc>,
    #[schema(example = "10:00 AM")]
    pub time: String,
    pub registration_deadline: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub status: EventStatus,
    pub registration_status: RegistrationStatus,
    pub organizer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Whether sign-ups are accepted at `now`: the flag must be open and the
    /// deadline not yet passed.
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        self.registration_status == RegistrationStatus::Open && now <= self.registration_deadline
    }

    /// Whether `registrations` existing sign-ups leave no room for another.
    pub fn is_full(&self, registrations: u64) -> bool {
        match self.max_attendees {
            Some(max) => registrations >= u64::try_from(max).unwrap_or(0),
            None => false,
        }
    }

    /// Decide whether one more registration may be admitted.
    ///
    /// Checks run in a fixed order so the reported error is deterministic:
    /// open → capacity → duplicate.
    pub fn check_admission(
        &self,
        registrations: u64,
        already_registered: bool,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if !self.is_registration_open(now) {
            return Err(AppError::RegistrationClosed);
        }
        if self.is_full(registrations) {
            return Err(AppError::EventFull);
        }
        if already_registered {
            return Err(AppError::AlreadyRegistered);
        }
        Ok(())
    }
}

/// Validated input for creating an event
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: String,
    pub venue: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub registration_deadline: DateTime<Utc>,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
}

/// Partial update of an event. `None` leaves the field unchanged.
///
/// The organizer reference cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub venue: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub registration_deadline: Option<DateTime<Utc>>,
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub status: Option<EventStatus>,
    pub registration_status: Option<RegistrationStatus>,
}

/// Event as returned by read endpoints: the entity plus its organizer and
/// current registration count.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub organizer: Option<OrganizerSummary>,
    pub registration_count: u64,
}

/// Parse a client-supplied event date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC) and
/// bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_event_date(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AppError::validation(format!(
        "{} must be a date (YYYY-MM-DD) or an RFC 3339 timestamp",
        field
    )))
}
