//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, dashboard_handler, event_handler, user_handler};
use crate::domain::{
    Attendee, DashboardStats, Event, EventDetails, EventSortField, EventStatus,
    OrganizerSummary, PopularEvent, Registration, RegistrationStatus, RegistrationWithEvent,
    SortOrder, UserProfile, UserRole,
};
use crate::services::{AuthResponse, EventListResponse};
use crate::types::{MessageResponse, PaginationMeta};

/// OpenAPI documentation for the EventHub API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EventHub API",
        version = "0.1.0",
        description = "Campus event management: events, registrations and organizer dashboards",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        event_handler::list_events,
        event_handler::search_events,
        event_handler::get_event,
        event_handler::create_event,
        event_handler::update_event,
        event_handler::delete_event,
        event_handler::register_for_event,
        event_handler::unregister_from_event,
        event_handler::list_attendees,
        user_handler::get_profile,
        user_handler::update_profile,
        user_handler::my_events,
        user_handler::my_registrations,
        dashboard_handler::stats,
    ),
    components(
        schemas(
            UserRole,
            UserProfile,
            OrganizerSummary,
            Event,
            EventDetails,
            EventStatus,
            RegistrationStatus,
            EventSortField,
            SortOrder,
            Registration,
            Attendee,
            RegistrationWithEvent,
            DashboardStats,
            PopularEvent,
            PaginationMeta,
            MessageResponse,
            AuthResponse,
            EventListResponse,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            event_handler::CreateEventRequest,
            event_handler::UpdateEventRequest,
            event_handler::RegisterResponse,
            user_handler::UpdateProfileRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Sign-up, login and logout"),
        (name = "Events", description = "Event listing and management"),
        (name = "Registrations", description = "Event sign-ups and attendee lists"),
        (name = "Users", description = "The caller's own account"),
        (name = "Dashboard", description = "Organizer statistics")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
