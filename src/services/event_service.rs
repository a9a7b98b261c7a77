//! Event service - listing, lookup and organizer-only mutations.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    ensure_can_manage, ensure_role, Caller, Event, EventChanges, EventDetails, EventQuery,
    NewEvent, OrganizerSummary, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::PaginationMeta;

/// One page of the event listing
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventListResponse {
    pub events: Vec<EventDetails>,
    pub pagination: PaginationMeta,
}

/// Event service trait for dependency injection.
#[async_trait]
pub trait EventService: Send + Sync {
    /// Filtered, sorted, paginated listing
    async fn list(&self, query: EventQuery) -> AppResult<EventListResponse>;

    /// Keyword search over title, description and venue
    async fn search(&self, keyword: String) -> AppResult<Vec<EventDetails>>;

    /// Get one event
    async fn get(&self, id: Uuid) -> AppResult<EventDetails>;

    /// Create an event owned by the caller (organizer or admin)
    async fn create(&self, caller: Caller, event: NewEvent) -> AppResult<EventDetails>;

    /// Update an event (owner or admin)
    async fn update(&self, caller: Caller, id: Uuid, changes: EventChanges)
        -> AppResult<EventDetails>;

    /// Delete an event and its registrations (owner or admin)
    async fn delete(&self, caller: Caller, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of EventService using Unit of Work.
pub struct EventManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EventManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn find(&self, id: Uuid) -> AppResult<Event> {
        self.uow
            .events()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Event")
    }

    async fn details(&self, event: Event) -> AppResult<EventDetails> {
        with_details(self.uow.as_ref(), vec![event])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("event details lost"))
    }
}

#[async_trait]
impl<U: UnitOfWork> EventService for EventManager<U> {
    async fn list(&self, query: EventQuery) -> AppResult<EventListResponse> {
        let params = query.pagination;
        let page = self.uow.events().list(query).await?;

        Ok(EventListResponse {
            pagination: PaginationMeta::new(&params, page.total),
            events: with_details(self.uow.as_ref(), page.items).await?,
        })
    }

    async fn search(&self, keyword: String) -> AppResult<Vec<EventDetails>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::validation("Search keyword is required"));
        }

        let events = self.uow.events().search(keyword.to_string()).await?;
        with_details(self.uow.as_ref(), events).await
    }

    async fn get(&self, id: Uuid) -> AppResult<EventDetails> {
        let event = self.find(id).await?;
        self.details(event).await
    }

    async fn create(&self, caller: Caller, event: NewEvent) -> AppResult<EventDetails> {
        ensure_role(&caller, UserRole::Organizer)?;
        validate_capacity(event.max_attendees)?;

        let event = self.uow.events().create(caller.id, event).await?;
        tracing::info!(event_id = %event.id, organizer_id = %caller.id, "Event created");

        self.details(event).await
    }

    async fn update(
        &self,
        caller: Caller,
        id: Uuid,
        changes: EventChanges,
    ) -> AppResult<EventDetails> {
        let event = self.find(id).await?;
        ensure_can_manage(&caller, &event, "update this event")?;
        validate_capacity(changes.max_attendees)?;

        let event = self.uow.events().update(id, changes).await?;
        tracing::info!(event_id = %id, user_id = %caller.id, "Event updated");

        self.details(event).await
    }

    async fn delete(&self, caller: Caller, id: Uuid) -> AppResult<()> {
        let event = self.find(id).await?;
        ensure_can_manage(&caller, &event, "delete this event")?;

        if !self.uow.events().delete(id).await? {
            return Err(AppError::NotFound("Event"));
        }
        tracing::info!(event_id = %id, user_id = %caller.id, "Event deleted");

        Ok(())
    }
}

fn validate_capacity(max_attendees: Option<i32>) -> AppResult<()> {
    match max_attendees {
        Some(max) if max < 1 => Err(AppError::validation("maxAttendees must be at least 1")),
        _ => Ok(()),
    }
}

/// Attach organizer summaries and registration counts, preserving order.
pub(crate) async fn with_details<U: UnitOfWork>(
    uow: &U,
    events: Vec<Event>,
) -> AppResult<Vec<EventDetails>> {
    if events.is_empty() {
        return Ok(Vec::new());
    }

    let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
    let organizer_ids: Vec<Uuid> = events
        .iter()
        .map(|e| e.organizer_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let registrations = uow.registrations();
    let users = uow.users();
    let (counts, organizers) = tokio::try_join!(
        registrations.counts_for_events(event_ids),
        users.find_many(organizer_ids),
    )?;

    let organizers: HashMap<Uuid, OrganizerSummary> = organizers
        .iter()
        .map(|user| (user.id, OrganizerSummary::from(user)))
        .collect();

    Ok(events
        .into_iter()
        .map(|event| EventDetails {
            organizer: organizers.get(&event.organizer_id).cloned(),
            registration_count: counts.get(&event.id).copied().unwrap_or(0),
            event,
        })
        .collect())
}
