//! Registration service - sign-up ledger with capacity and deadline rules.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ensure_can_manage, Attendee, Caller, Registration, UserProfile};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

/// Registration service trait for dependency injection.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Register `user_id` for `event_id`
    async fn register(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Registration>;

    /// Remove the user's registration for the event
    async fn unregister(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()>;

    /// Attendees of an event, newest registration first (owner or admin)
    async fn attendees(&self, caller: Caller, event_id: Uuid) -> AppResult<Vec<Attendee>>;

    /// Number of registrations for an event
    async fn count_for(&self, event_id: Uuid) -> AppResult<u64>;
}

/// Concrete implementation of RegistrationService using Unit of Work.
pub struct RegistrationManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RegistrationManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RegistrationService for RegistrationManager<U> {
    async fn register(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Registration> {
        // The event row stays locked until commit, so the count read below
        // cannot be invalidated by a concurrent sign-up for the same event.
        let registration = with_transaction!(self.uow, |ctx| {
            let event = ctx
                .events()
                .find_for_update(event_id)
                .await?
                .ok_or_not_found("Event")?;

            let registrations = ctx.registrations();
            let count = registrations.count_for_event(event_id).await?;
            let already_registered = registrations.exists(user_id, event_id).await?;
            event.check_admission(count, already_registered, Utc::now())?;

            let registration = registrations.create(user_id, event_id).await?;
            Ok(registration)
        })?;

        tracing::info!(%event_id, %user_id, "Registered for event");
        Ok(registration)
    }

    async fn unregister(&self, user_id: Uuid, event_id: Uuid) -> AppResult<()> {
        if !self.uow.registrations().delete(user_id, event_id).await? {
            return Err(AppError::NotFound("Registration"));
        }

        tracing::info!(%event_id, %user_id, "Unregistered from event");
        Ok(())
    }

    async fn attendees(&self, caller: Caller, event_id: Uuid) -> AppResult<Vec<Attendee>> {
        let event = self
            .uow
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or_not_found("Event")?;
        ensure_can_manage(&caller, &event, "view attendees")?;

        let registrations = self.uow.registrations().list_for_event(event_id).await?;
        let user_ids = registrations.iter().map(|r| r.user_id).collect();
        let mut users: HashMap<Uuid, UserProfile> = self
            .uow
            .users()
            .find_many(user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, UserProfile::from(user)))
            .collect();

        Ok(registrations
            .into_iter()
            .filter_map(|registration| {
                users
                    .remove(&registration.user_id)
                    .map(|user| Attendee { registration, user })
            })
            .collect())
    }

    async fn count_for(&self, event_id: Uuid) -> AppResult<u64> {
        self.uow.registrations().count_for_event(event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockEventRepository, MockRegistrationRepository, MockUserRepository};
    use crate::services::test_support::{sample_event, sample_user, TestUnitOfWork};
    use chrono::Duration;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_unregister_without_registration_is_not_found() {
        let mut registrations = MockRegistrationRepository::new();
        registrations.expect_delete().returning(|_, _| Ok(false));

        let uow = TestUnitOfWork::new(
            MockUserRepository::new(),
            MockEventRepository::new(),
            registrations,
        );
        let err = RegistrationManager::new(Arc::new(uow))
            .unregister(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound("Registration")));
    }

    #[tokio::test]
    async fn test_unregister_deletes_exact_pair() {
        let (user_id, event_id) = (Uuid::new_v4(), Uuid::new_v4());
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_delete()
            .with(eq(user_id), eq(event_id))
            .times(1)
            .returning(|_, _| Ok(true));

        let uow = TestUnitOfWork::new(
            MockUserRepository::new(),
            MockEventRepository::new(),
            registrations,
        );

        assert!(RegistrationManager::new(Arc::new(uow))
            .unregister(user_id, event_id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_attendees_forbidden_for_non_owner() {
        let event = sample_event(Uuid::new_v4(), None);
        let event_id = event.id;
        let mut events = MockEventRepository::new();
        events
            .expect_find_by_id()
            .returning(move |_| Ok(Some(event.clone())));
        let mut registrations = MockRegistrationRepository::new();
        registrations.expect_list_for_event().never();

        let uow = TestUnitOfWork::new(MockUserRepository::new(), events, registrations);
        let student = Caller::new(Uuid::new_v4(), UserRole::Student);

        assert!(matches!(
            RegistrationManager::new(Arc::new(uow))
                .attendees(student, event_id)
                .await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_attendees_keep_registration_order() {
        let organizer = Caller::new(Uuid::new_v4(), UserRole::Organizer);
        let event = sample_event(organizer.id, None);
        let event_id = event.id;
        let first = sample_user(Uuid::new_v4(), UserRole::Student);
        let second = sample_user(Uuid::new_v4(), UserRole::Student);
        let now = Utc::now();

        let mut events = MockEventRepository::new();
        events
            .expect_find_by_id()
            .returning(move |_| Ok(Some(event.clone())));

        let regs = vec![
            Registration {
                user_id: second.id,
                event_id,
                registered_at: now,
            },
            Registration {
                user_id: first.id,
                event_id,
                registered_at: now - Duration::hours(1),
            },
        ];
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_list_for_event()
            .with(eq(event_id))
            .returning(move |_| Ok(regs.clone()));

        let people = vec![first.clone(), second.clone()];
        let mut users = MockUserRepository::new();
        users
            .expect_find_many()
            .returning(move |_| Ok(people.clone()));

        let uow = TestUnitOfWork::new(users, events, registrations);
        let attendees = RegistrationManager::new(Arc::new(uow))
            .attendees(organizer, event_id)
            .await
            .unwrap();

        let ids: Vec<Uuid> = attendees.iter().map(|a| a.user.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    /// `register` end to end through `Persistence` over a mock connection.
    mod transactional {
        use super::*;
        use crate::infra::repositories::entities::{event, registration};
        use crate::infra::Persistence;
        use sea_orm::{
            DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr, Value,
        };
        use std::collections::BTreeMap;

        fn event_row(max_attendees: Option<i32>, registration_status: &str) -> event::Model {
            let now = Utc::now();
            event::Model {
                id: Uuid::new_v4(),
                title: "Robotics Workshop".to_string(),
                description: "Build a line follower".to_string(),
                category: "workshop".to_string(),
                venue: "Lab 2".to_string(),
                date: now + Duration::days(10),
                time: "02:00 PM".to_string(),
                registration_deadline: now + Duration::days(5),
                max_attendees,
                image_url: None,
                status: "upcoming".to_string(),
                registration_status: registration_status.to_string(),
                organizer_id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
            }
        }

        fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
            BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
        }

        fn registration_row(user_id: Uuid, event_id: Uuid) -> registration::Model {
            registration::Model {
                user_id,
                event_id,
                registered_at: Utc::now(),
            }
        }

        /// Connection answering, in order: the locked event read, the count
        /// and the duplicate lookup.
        fn mock_db(
            event: Option<event::Model>,
            count: i64,
            existing: Option<registration::Model>,
        ) -> MockDatabase {
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([event.into_iter().collect::<Vec<_>>()])
                .append_query_results([[count_row(count)]])
                .append_query_results([existing.into_iter().collect::<Vec<_>>()])
        }

        fn manager(db: &DatabaseConnection) -> RegistrationManager<Persistence> {
            RegistrationManager::new(Arc::new(Persistence::new(db.clone())))
        }

        fn executed_sql(db: DatabaseConnection) -> Vec<String> {
            db.into_transaction_log()
                .iter()
                .flat_map(|txn| txn.statements().iter().map(|stmt| stmt.sql.clone()))
                .collect()
        }

        fn inserts(sql: &[String]) -> usize {
            sql.iter().filter(|s| s.starts_with("INSERT")).count()
        }

        #[tokio::test]
        async fn test_missing_event_is_not_found_before_other_checks() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<event::Model>::new()])
                .into_connection();

            let err = manager(&db)
                .register(Uuid::new_v4(), Uuid::new_v4())
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound("Event")));

            let sql = executed_sql(db);
            assert!(sql.iter().all(|s| !s.contains("COUNT")));
            assert_eq!(inserts(&sql), 0);
            assert_eq!(sql.last().map(String::as_str), Some("ROLLBACK"));
        }

        #[tokio::test]
        async fn test_closed_event_is_rejected() {
            let event = event_row(None, "closed");
            let event_id = event.id;
            let db = mock_db(Some(event), 0, None).into_connection();

            let err = manager(&db)
                .register(Uuid::new_v4(), event_id)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::RegistrationClosed));
            assert_eq!(inserts(&executed_sql(db)), 0);
        }

        #[tokio::test]
        async fn test_full_event_is_rejected() {
            let event = event_row(Some(2), "open");
            let event_id = event.id;
            let db = mock_db(Some(event), 2, None).into_connection();

            let err = manager(&db)
                .register(Uuid::new_v4(), event_id)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::EventFull));
            assert_eq!(inserts(&executed_sql(db)), 0);
        }

        #[tokio::test]
        async fn test_existing_registration_is_rejected() {
            let user_id = Uuid::new_v4();
            let event = event_row(Some(10), "open");
            let event_id = event.id;
            let existing = registration_row(user_id, event_id);
            let db = mock_db(Some(event), 1, Some(existing)).into_connection();

            let err = manager(&db).register(user_id, event_id).await.unwrap_err();
            assert!(matches!(err, AppError::AlreadyRegistered));
            assert_eq!(inserts(&executed_sql(db)), 0);
        }

        #[tokio::test]
        async fn test_successful_registration_inserts_one_row_and_commits() {
            let user_id = Uuid::new_v4();
            let event = event_row(Some(3), "open");
            let event_id = event.id;
            let db = mock_db(Some(event), 2, None)
                .append_query_results([[registration_row(user_id, event_id)]])
                .into_connection();

            let registration = manager(&db).register(user_id, event_id).await.unwrap();
            assert_eq!(registration.user_id, user_id);
            assert_eq!(registration.event_id, event_id);

            let sql = executed_sql(db);
            assert_eq!(sql.first().map(String::as_str), Some("BEGIN"));
            assert!(sql[1].contains("FOR UPDATE"));
            assert_eq!(inserts(&sql), 1);
            assert_eq!(sql.last().map(String::as_str), Some("COMMIT"));
        }

        #[tokio::test]
        async fn test_failed_insert_rolls_back() {
            let user_id = Uuid::new_v4();
            let event = event_row(None, "open");
            let event_id = event.id;
            let db = mock_db(Some(event), 0, None)
                .append_query_errors([DbErr::Query(RuntimeErr::Internal(
                    "connection reset".to_string(),
                ))])
                .into_connection();

            let err = manager(&db).register(user_id, event_id).await.unwrap_err();
            assert!(matches!(err, AppError::Database(_)));
            assert_eq!(
                executed_sql(db).last().map(String::as_str),
                Some("ROLLBACK")
            );
        }
    }
}
