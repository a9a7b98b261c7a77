//! Authentication service - sign-up, login and token verification.
//!
//! Password hashing lives in the domain `Password` value object; token
//! handling in [`TokenIssuer`].

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use super::token::TokenIssuer;
use crate::config::Config;
use crate::domain::{NewUser, Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Sign-up input, already shape-validated by the HTTP layer.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
}

/// Returned by register and login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: Uuid,
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[schema(example = "asha@college.edu")]
    pub email: String,
    pub role: UserRole,
    /// JWT bearer token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, account: NewAccount) -> AppResult<AuthResponse>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Verify a bearer token and return the user id it carries
    fn verify_token(&self, token: &str) -> AppResult<Uuid>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenIssuer,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            tokens: TokenIssuer::new(config),
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, account: NewAccount) -> AppResult<AuthResponse> {
        let role = account.role.unwrap_or_default();
        if role.is_admin() {
            return Err(AppError::validation("Cannot self-register as admin"));
        }

        let email = normalize_email(&account.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&account.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                name: account.name.trim().to_string(),
                email,
                password_hash,
                role,
                phone: account.phone,
                college: account.college,
                department: account.department,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse::new(user, token))
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let user = self
            .uow
            .users()
            .find_by_email(&normalize_email(&email))
            .await?;

        // Unknown emails still pay for one hash verification.
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.as_str()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let token = self.tokens.issue(user.id)?;
        Ok(AuthResponse::new(user, token))
    }

    fn verify_token(&self, token: &str) -> AppResult<Uuid> {
        self.tokens.verify(token)
    }
}
