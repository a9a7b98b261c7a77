//! Fixtures shared by the service unit tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Event, EventStatus, RegistrationStatus, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{
    EventRepository, MockEventRepository, MockRegistrationRepository, MockUserRepository,
    RegistrationRepository, TransactionContext, UnitOfWork, UserRepository,
};

/// Unit of Work over mocked repositories. Transactions need a real database
/// and are rejected here.
pub(crate) struct TestUnitOfWork {
    users: Arc<MockUserRepository>,
    events: Arc<MockEventRepository>,
    registrations: Arc<MockRegistrationRepository>,
}

impl TestUnitOfWork {
    pub(crate) fn new(
        users: MockUserRepository,
        events: MockEventRepository,
        registrations: MockRegistrationRepository,
    ) -> Self {
        Self {
            users: Arc::new(users),
            events: Arc::new(events),
            registrations: Arc::new(registrations),
        }
    }

    pub(crate) fn with_users(users: MockUserRepository) -> Self {
        Self::new(
            users,
            MockEventRepository::new(),
            MockRegistrationRepository::new(),
        )
    }
}

#[async_trait]
impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn events(&self) -> Arc<dyn EventRepository> {
        self.events.clone()
    }

    fn registrations(&self) -> Arc<dyn RegistrationRepository> {
        self.registrations.clone()
    }

    async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        Err(AppError::internal("Transactions not supported in test mock"))
    }
}

pub(crate) fn sample_user(id: Uuid, role: UserRole) -> User {
    let now = Utc::now();
    User {
        id,
        name: "Test User".to_string(),
        email: format!("{}@college.edu", id.simple()),
        password_hash: "hashed".to_string(),
        role,
        phone: None,
        college: None,
        department: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn sample_event(organizer_id: Uuid, max_attendees: Option<i32>) -> Event {
    let now = Utc::now();
    Event {
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
        status: EventStatus::Upcoming,
        registration_status: RegistrationStatus::Open,
        organizer_id,
        created_at: now,
        updated_at: now,
    }
}
