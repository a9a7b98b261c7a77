//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{ensure_role, Caller, User, UserRole};
use crate::errors::{AppError, AppResult};

/// Authenticated user, loaded from the database for every request
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

impl CurrentUser {
    /// Identity handed to services for capability checks
    pub fn caller(&self) -> Caller {
        Caller::new(self.id, self.role)
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// JWT authentication middleware.
///
/// Verifies the bearer token, loads the user it names and injects a
/// [`CurrentUser`] into the request extensions. A token for a user that no
/// longer exists is treated like a missing token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let user_id = state.auth_service.verify_token(token)?;

    let user = match state.user_service.get_user(user_id).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => return Err(AppError::Unauthorized),
        Err(e) => return Err(e),
    };

    request.extensions_mut().insert(CurrentUser::from(user));

    Ok(next.run(request).await)
}

/// Require a role; admin satisfies every requirement.
pub fn require_role(user: &CurrentUser, required: UserRole) -> AppResult<()> {
    ensure_role(&user.caller(), required)
}
