//! Handlers for the caller's own account.

use axum::{extract::State, response::Json, routing::get, Extension, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{EventDetails, RegistrationWithEvent, UserProfile};
use crate::errors::AppResult;
use crate::services::ProfileUpdate;

/// Profile update request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

/// Create user routes. The caller must apply the auth middleware.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/my-events", get(my_events))
        .route("/my-registrations", get(my_registrations))
}

/// Get the caller's profile
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserProfile>> {
    let user = state.user_service.get_user(current_user.id).await?;
    Ok(Json(UserProfile::from(user)))
}

/// Update the caller's profile
#[utoipa::path(
    put,
    path = "/api/users/profile",
    tag = "Users",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserProfile),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .user_service
        .update_profile(
            current_user.id,
            ProfileUpdate {
                name: payload.name,
                phone: payload.phone,
                college: payload.college,
                department: payload.department,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(UserProfile::from(user)))
}

/// Events the caller organizes
#[utoipa::path(
    get,
    path = "/api/users/my-events",
    tag = "Users",
    responses((status = 200, description = "Organized events, newest first", body = [EventDetails])),
    security(("bearer_auth" = []))
)]
pub async fn my_events(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<EventDetails>>> {
    Ok(Json(state.user_service.my_events(current_user.id).await?))
}

/// Events the caller is registered for
#[utoipa::path(
    get,
    path = "/api/users/my-registrations",
    tag = "Users",
    responses((status = 200, description = "Registrations, most recent first", body = [RegistrationWithEvent])),
    security(("bearer_auth" = []))
)]
pub async fn my_registrations(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<RegistrationWithEvent>>> {
    Ok(Json(
        state.user_service.my_registrations(current_user.id).await?,
    ))
}
