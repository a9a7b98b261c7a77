//! Event and registration handlers.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{ValidatedJson, ValidatedPath, ValidatedQuery};
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::{
    parse_event_date, Attendee, EventChanges, EventDetails, EventQuery, EventSortField,
    EventStatus, NewEvent, Registration, RegistrationStatus, SortOrder,
};
use crate::errors::AppResult;
use crate::services::EventListResponse;
use crate::types::{Created, MessageResponse, PaginationParams};

/// Event listing query parameters
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    pub category: Option<String>,
    pub status: Option<EventStatus>,
    pub registration_status: Option<RegistrationStatus>,
    /// Case-insensitive match on title, description or venue
    pub search: Option<String>,
    /// Defaults to `date`
    pub sort_by: Option<EventSortField>,
    /// Defaults to `asc`
    pub sort_order: Option<SortOrder>,
    /// 1-indexed, defaults to 1
    pub page: Option<u64>,
    /// Defaults to 10, capped at 100
    pub limit: Option<u64>,
}

impl From<ListEventsQuery> for EventQuery {
    fn from(params: ListEventsQuery) -> Self {
        let defaults = PaginationParams::default();
        let mut query = EventQuery::new()
            .sort(
                params.sort_by.unwrap_or_default(),
                params.sort_order.unwrap_or_default(),
            )
            .paginate(PaginationParams::new(
                params.page.unwrap_or(defaults.page()),
                params.limit.unwrap_or(defaults.limit()),
            ));

        if let Some(category) = params.category {
            query = query.category(category);
        }
        if let Some(status) = params.status {
            query = query.status(status);
        }
        if let Some(registration_status) = params.registration_status {
            query = query.registration_status(registration_status);
        }
        if let Some(search) = params.search {
            query = query.search(search);
        }
        query
    }
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub keyword: Option<String>,
}

/// Event creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Intro to Rust Workshop")]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    #[schema(example = "workshop")]
    pub category: String,
    #[validate(length(min = 1, message = "Venue is required"))]
    #[schema(example = "Main Auditorium")]
    pub venue: String,
    /// RFC 3339 timestamp or YYYY-MM-DD
    #[schema(example = "2025-03-14T10:00:00Z")]
    pub date: String,
    #[validate(length(min = 1, message = "Time is required"))]
    #[schema(example = "10:00 AM")]
    pub time: String,
    #[schema(example = "2025-03-10")]
    pub registration_deadline: String,
    #[validate(range(min = 1, message = "maxAttendees must be at least 1"))]
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
}

impl CreateEventRequest {
    fn into_new_event(self) -> AppResult<NewEvent> {
        Ok(NewEvent {
            date: parse_event_date("date", &self.date)?,
            registration_deadline: parse_event_date(
                "registrationDeadline",
                &self.registration_deadline,
            )?,
            title: self.title,
            description: self.description,
            category: self.category,
            venue: self.venue,
            time: self.time,
            max_attendees: self.max_attendees,
            image_url: self.image_url,
        })
    }
}

/// Partial event update; omitted fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Category cannot be empty"))]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "Venue cannot be empty"))]
    pub venue: Option<String>,
    pub date: Option<String>,
    #[validate(length(min = 1, message = "Time cannot be empty"))]
    pub time: Option<String>,
    pub registration_deadline: Option<String>,
    #[validate(range(min = 1, message = "maxAttendees must be at least 1"))]
    pub max_attendees: Option<i32>,
    pub image_url: Option<String>,
    pub status: Option<EventStatus>,
    pub registration_status: Option<RegistrationStatus>,
}

impl UpdateEventRequest {
    fn into_changes(self) -> AppResult<EventChanges> {
        Ok(EventChanges {
            date: self
                .date
                .map(|d| parse_event_date("date", &d))
                .transpose()?,
            registration_deadline: self
                .registration_deadline
                .map(|d| parse_event_date("registrationDeadline", &d))
                .transpose()?,
            title: self.title,
            description: self.description,
            category: self.category,
            venue: self.venue,
            time: self.time,
            max_attendees: self.max_attendees,
            image_url: self.image_url,
            status: self.status,
            registration_status: self.registration_status,
        })
    }
}

/// Body of a successful sign-up
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub registration: Registration,
}

/// Create event routes. Reads are public; everything else requires a token.
pub fn event_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .route(
            "/",
            get(list_events).merge(post(create_event).route_layer(auth.clone())),
        )
        .route("/search", get(search_events))
        .route(
            "/:id",
            get(get_event).merge(
                axum::routing::put(update_event)
                    .delete(delete_event)
                    .route_layer(auth.clone()),
            ),
        )
        .route(
            "/:id/register",
            post(register_for_event).route_layer(auth.clone()),
        )
        .route(
            "/:id/unregister",
            post(unregister_from_event).route_layer(auth.clone()),
        )
        .route("/:id/attendees", get(list_attendees).route_layer(auth))
}

/// List events with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "One page of events", body = EventListResponse),
        (status = 400, description = "Invalid query parameter")
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListEventsQuery>,
) -> AppResult<Json<EventListResponse>> {
    let response = state.event_service.list(params.into()).await?;
    Ok(Json(response))
}

/// Keyword search across title, description and venue
#[utoipa::path(
    get,
    path = "/api/events/search",
    tag = "Events",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching events", body = [EventDetails]),
        (status = 400, description = "Missing keyword")
    )
)]
pub async fn search_events(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<SearchQuery>,
) -> AppResult<Json<Vec<EventDetails>>> {
    let events = state
        .event_service
        .search(params.keyword.unwrap_or_default())
        .await?;
    Ok(Json(events))
}

/// Get a single event
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventDetails),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<EventDetails>> {
    Ok(Json(state.event_service.get(id).await?))
}

/// Create an event (organizer or admin)
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventDetails),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizer role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateEventRequest>,
) -> AppResult<Created<EventDetails>> {
    let event = state
        .event_service
        .create(current_user.caller(), payload.into_new_event()?)
        .await?;
    Ok(Created(event))
}

/// Update an event (owner or admin)
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventDetails),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_event(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<EventDetails>> {
    let event = state
        .event_service
        .update(current_user.caller(), id, payload.into_changes()?)
        .await?;
    Ok(Json(event))
}

/// Delete an event and its registrations (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Events",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.event_service.delete(current_user.caller(), id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

/// Register the caller for an event
#[utoipa::path(
    post,
    path = "/api/events/{id}/register",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 201, description = "Registered", body = RegisterResponse),
        (status = 400, description = "Closed, full or already registered"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn register_for_event(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Created<RegisterResponse>> {
    let registration = state
        .registration_service
        .register(current_user.id, id)
        .await?;

    Ok(Created(RegisterResponse {
        message: "Successfully registered for event".to_string(),
        registration,
    }))
}

/// Cancel the caller's registration
#[utoipa::path(
    post,
    path = "/api/events/{id}/unregister",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Unregistered", body = MessageResponse),
        (status = 404, description = "Not registered for this event")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unregister_from_event(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .registration_service
        .unregister(current_user.id, id)
        .await?;
    Ok(Json(MessageResponse::new("Successfully unregistered from event")))
}

/// Attendee list (owner or admin)
#[utoipa::path(
    get,
    path = "/api/events/{id}/attendees",
    tag = "Registrations",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Attendees, newest first", body = [Attendee]),
        (status = 403, description = "Not the event's organizer"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_attendees(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedPath(id): ValidatedPath<Uuid>,
) -> AppResult<Json<Vec<Attendee>>> {
    let attendees = state
        .registration_service
        .attendees(current_user.caller(), id)
        .await?;
    Ok(Json(attendees))
}
