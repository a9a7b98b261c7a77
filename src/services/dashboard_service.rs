//! Dashboard service - aggregate statistics over an organizer's events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::POPULAR_EVENTS_LIMIT;
use crate::domain::{ensure_role, Caller, DashboardStats, UserRole};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Statistics for the events the caller organizes
    async fn stats(&self, caller: Caller) -> AppResult<DashboardStats>;
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn stats(&self, caller: Caller) -> AppResult<DashboardStats> {
        ensure_role(&caller, UserRole::Organizer)?;

        let events = self.uow.events().list_by_organizer(caller.id).await?;
        let event_ids = events.iter().map(|e| e.id).collect();
        let counts = self
            .uow
            .registrations()
            .counts_for_events(event_ids)
            .await?;

        Ok(DashboardStats::aggregate(
            &events,
            &counts,
            POPULAR_EVENTS_LIMIT,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventStatus;
    use crate::errors::AppError;
    use crate::infra::{MockEventRepository, MockRegistrationRepository, MockUserRepository};
    use crate::services::test_support::{sample_event, TestUnitOfWork};
    use std::collections::HashMap;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_student_is_forbidden() {
        let mut events = MockEventRepository::new();
        events.expect_list_by_organizer().never();
        let uow = TestUnitOfWork::new(
            MockUserRepository::new(),
            events,
            MockRegistrationRepository::new(),
        );

        let student = Caller::new(Uuid::new_v4(), UserRole::Student);
        assert!(matches!(
            DashboardManager::new(Arc::new(uow)).stats(student).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_for_owned_events() {
        let organizer = Caller::new(Uuid::new_v4(), UserRole::Organizer);
        let upcoming = sample_event(organizer.id, None);
        let mut completed = sample_event(organizer.id, None);
        completed.status = EventStatus::Completed;
        let (upcoming_id, completed_id) = (upcoming.id, completed.id);

        let mut events = MockEventRepository::new();
        events
            .expect_list_by_organizer()
            .returning(move |_| Ok(vec![upcoming.clone(), completed.clone()]));
        let mut registrations = MockRegistrationRepository::new();
        registrations
            .expect_counts_for_events()
            .returning(move |_| Ok(HashMap::from([(completed_id, 7), (upcoming_id, 2)])));

        let uow = TestUnitOfWork::new(MockUserRepository::new(), events, registrations);
        let stats = DashboardManager::new(Arc::new(uow))
            .stats(organizer)
            .await
            .unwrap();

        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.total_registrations, 9);
        assert_eq!(stats.upcoming_events, 1);
        assert_eq!(stats.completed_events, 1);
        assert_eq!(stats.popular_events[0].id, completed_id);
    }
}
