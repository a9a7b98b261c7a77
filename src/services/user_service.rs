//! User service - profile management and the caller's own events/registrations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::event_service::with_details;
use crate::domain::{EventDetails, Password, ProfileChanges, RegistrationWithEvent, User};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Profile fields a user may submit; the password arrives in plain text.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub college: Option<String>,
    pub department: Option<String>,
    pub password: Option<String>,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update the user's own profile, re-hashing a new password
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Events organized by the user, newest first
    async fn my_events(&self, id: Uuid) -> AppResult<Vec<EventDetails>>;

    /// The user's registrations with their events, most recent first
    async fn my_registrations(&self, id: Uuid) -> AppResult<Vec<RegistrationWithEvent>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let password_hash = match update.password.as_deref() {
            Some(plain) => Some(Password::new(plain)?.into_string()),
            None => None,
        };

        let changes = ProfileChanges {
            name: update.name.map(|n| n.trim().to_string()),
            phone: update.phone,
            college: update.college,
            department: update.department,
            password_hash,
        };

        if changes.is_empty() {
            return self.get_user(id).await;
        }

        let user = self.uow.users().update_profile(id, changes).await?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(user)
    }

    async fn my_events(&self, id: Uuid) -> AppResult<Vec<EventDetails>> {
        let mut events = self.uow.events().list_by_organizer(id).await?;
        events.reverse();

        with_details(self.uow.as_ref(), events).await
    }

    async fn my_registrations(&self, id: Uuid) -> AppResult<Vec<RegistrationWithEvent>> {
        let registrations = self.uow.registrations().list_for_user(id).await?;

        let event_ids = registrations.iter().map(|r| r.event_id).collect();
        let events = self.uow.events().find_many(event_ids).await?;

        let mut details: HashMap<Uuid, EventDetails> = with_details(self.uow.as_ref(), events)
            .await?
            .into_iter()
            .map(|d| (d.event.id, d))
            .collect();

        Ok(registrations
            .into_iter()
            .filter_map(|registration| {
                details
                    .remove(&registration.event_id)
                    .map(|event| RegistrationWithEvent {
                        registration,
                        event,
                    })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Registration, UserRole};
    use crate::errors::AppError;
    use crate::infra::{MockEventRepository, MockRegistrationRepository, MockUserRepository};
    use crate::services::test_support::{sample_event, sample_user, TestUnitOfWork};
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(users)));
        let err = service.get_user(Uuid::new_v4()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound("User")));
    }

    #[tokio::test]
    async fn test_update_profile_hashes_new_password() {
        let user_id = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_update_profile()
            .withf(move |id, changes| {
                *id == user_id
                    && changes.name.as_deref() == Some("New Name")
                    && changes
                        .password_hash
                        .as_deref()
                        .is_some_and(|h| h.starts_with("$argon2id$"))
            })
            .returning(|id, _| Ok(sample_user(id, UserRole::Student)));

        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(users)));
        let update = ProfileUpdate {
            name: Some(" New Name ".to_string()),
            password: Some("brand-new-password".to_string()),
            ..Default::default()
        };

        assert_eq!(service.update_profile(user_id, update).await.unwrap().id, user_id);
    }

    #[tokio::test]
    async fn test_update_profile_rejects_short_password() {
        let service = UserManager::new(Arc::new(TestUnitOfWork::with_users(
            MockUserRepository::new(),
        )));
        let update = ProfileUpdate {
            password: Some("short".to_string()),
            ..Default::default()
        };

        assert!(matches!(
            service.update_profile(Uuid::new_v4(), update).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_my_registrations_pairs_each_registration_with_its_event() {
        let user_id = Uuid::new_v4();
        let organizer = sample_user(Uuid::new_v4(), UserRole::Organizer);
        let older = sample_event(organizer.id, Some(10));
        let newer = sample_event(organizer.id, None);
        let now = Utc::now();

        let regs = vec![
            Registration {
                user_id,
                event_id: newer.id,
                registered_at: now,
            },
            Registration {
                user_id,
                event_id: older.id,
                registered_at: now - Duration::days(1),
            },
        ];

        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_list_for_user()
            .with(eq(user_id))
            .returning(move |_| Ok(regs.clone()));
        let (older_id, newer_id) = (older.id, newer.id);
        registrations
            .expect_counts_for_events()
            .returning(move |_| Ok(HashMap::from([(older_id, 3), (newer_id, 1)])));

        let mut events = MockEventRepository::new();
        let catalog = vec![older.clone(), newer.clone()];
        events.expect_find_by_id().never();
        events
            .expect_find_many()
            .withf(move |ids| ids == &vec![newer_id, older_id])
            .times(1)
            .returning(move |_| Ok(catalog.clone()));

        let mut users = MockUserRepository::new();
        let org = organizer.clone();
        users
            .expect_find_many()
            .returning(move |_| Ok(vec![org.clone()]));

        let uow = TestUnitOfWork::new(users, events, registrations);
        let result = UserManager::new(Arc::new(uow))
            .my_registrations(user_id)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].event.event.id, newer_id);
        assert_eq!(result[0].event.registration_count, 1);
        assert_eq!(result[1].event.event.id, older_id);
        assert_eq!(result[1].event.registration_count, 3);
        assert_eq!(
            result[1].event.organizer.as_ref().map(|o| o.id),
            Some(organizer.id)
        );
    }
}
