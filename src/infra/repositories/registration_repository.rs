//! Registration repository.
//!
//! The free functions take any [`ConnectionTrait`] so the same queries run
//! on the pool and inside the registration transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::registration::{self, ActiveModel, Entity as RegistrationEntity};
use crate::domain::Registration;
use crate::errors::{is_unique_violation, AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Registration repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Insert a registration; an existing pair is `AlreadyRegistered`
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Registration>;

    /// Remove a registration. Returns false if there was none.
    async fn delete(&self, user_id: Uuid, event_id: Uuid) -> AppResult<bool>;

    /// Number of registrations for one event
    async fn count_for_event(&self, event_id: Uuid) -> AppResult<u64>;

    /// Registration counts keyed by event id. Events without registrations are absent.
    async fn counts_for_events(&self, event_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>>;

    /// Registrations for an event, newest first
    async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<Registration>>;

    /// Registrations made by a user, newest first
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Registration>>;
}

/// SeaORM-backed registration repository
pub struct RegistrationStore {
    db: DatabaseConnection,
}

impl RegistrationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RegistrationRepository for RegistrationStore {
    async fn create(&self, user_id: Uuid, event_id: Uuid) -> AppResult<Registration> {
        insert_registration(&self.db, user_id, event_id).await
    }

    async fn delete(&self, user_id: Uuid, event_id: Uuid) -> AppResult<bool> {
        let result = RegistrationEntity::delete_by_id((user_id, event_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn count_for_event(&self, event_id: Uuid) -> AppResult<u64> {
        count_for_event(&self.db, event_id).await
    }

    async fn counts_for_events(&self, event_ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, u64>> {
        if event_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = RegistrationEntity::find()
            .select_only()
            .column(registration::Column::EventId)
            .column_as(registration::Column::UserId.count(), "registrations")
            .filter(registration::Column::EventId.is_in(event_ids))
            .group_by(registration::Column::EventId)
            .into_model::<EventCount>()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.event_id, u64::try_from(row.registrations).unwrap_or(0)))
            .collect())
    }

    async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<Registration>> {
        let models = RegistrationEntity::find()
            .filter(registration::Column::EventId.eq(event_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Registration::from).collect())
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Registration>> {
        let models = RegistrationEntity::find()
            .filter(registration::Column::UserId.eq(user_id))
            .order_by_desc(registration::Column::RegisteredAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Registration::from).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct EventCount {
    event_id: Uuid,
    registrations: i64,
}

pub(crate) async fn find_registration<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    event_id: Uuid,
) -> AppResult<Option<Registration>> {
    let result = RegistrationEntity::find_by_id((user_id, event_id))
        .one(db)
        .await?;

    Ok(result.map(Registration::from))
}

pub(crate) async fn count_for_event<C: ConnectionTrait>(db: &C, event_id: Uuid) -> AppResult<u64> {
    let count = RegistrationEntity::find()
        .filter(registration::Column::EventId.eq(event_id))
        .count(db)
        .await?;

    Ok(count)
}

pub(crate) async fn insert_registration<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    event_id: Uuid,
) -> AppResult<Registration> {
    let active_model = ActiveModel {
        user_id: Set(user_id),
        event_id: Set(event_id),
        registered_at: Set(Utc::now()),
    };

    // The composite primary key settles races between concurrent sign-ups.
    let model = active_model.insert(db).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::AlreadyRegistered
        } else {
            AppError::from(e)
        }
    })?;

    Ok(Registration::from(model))
}
