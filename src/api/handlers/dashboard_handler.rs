//! Organizer dashboard handler.

use axum::{extract::State, response::Json, routing::get, Extension, Router};

use crate::api::middleware::{require_role, CurrentUser};
use crate::api::AppState;
use crate::domain::{DashboardStats, UserRole};
use crate::errors::AppResult;

/// Create dashboard routes. The caller must apply the auth middleware.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

/// Statistics over the caller's events
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Organizer role required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn stats(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<DashboardStats>> {
    require_role(&current_user, UserRole::Organizer)?;

    let stats = state.dashboard_service.stats(current_user.caller()).await?;
    Ok(Json(stats))
}
