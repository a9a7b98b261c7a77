//! Event repository: persistence plus the filtered/sorted/paginated listing.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use uuid::Uuid;

use super::entities::event::{self, ActiveModel, Entity as EventEntity};
use crate::domain::event_query::like_pattern;
use crate::domain::{
    Event, EventChanges, EventQuery, EventSortField, EventStatus, NewEvent, RegistrationStatus,
    SortOrder,
};
use crate::errors::{AppResult, OptionExt};
use crate::types::Page;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Event repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Find event by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// Find several events in one query; unknown ids are skipped
    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Event>>;

    /// One page of events matching `query`, plus the total match count
    async fn list(&self, query: EventQuery) -> AppResult<Page<Event>>;

    /// Unpaginated case-insensitive keyword search over title, description and venue
    async fn search(&self, keyword: String) -> AppResult<Vec<Event>>;

    /// Events organized by a user, oldest first
    async fn list_by_organizer(&self, organizer_id: Uuid) -> AppResult<Vec<Event>>;

    /// Persist a new event owned by `organizer_id`
    async fn create(&self, organizer_id: Uuid, event: NewEvent) -> AppResult<Event>;

    /// Apply a partial update
    async fn update(&self, id: Uuid, changes: EventChanges) -> AppResult<Event>;

    /// Delete an event (registrations cascade). Returns false if it did not exist.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed event repository
pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EventRepository for EventStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>> {
        find_event(&self.db, id, false).await
    }

    async fn find_many(&self, ids: Vec<Uuid>) -> AppResult<Vec<Event>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = EventEntity::find()
            .filter(event::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Event::from).collect())
    }

    async fn list(&self, query: EventQuery) -> AppResult<Page<Event>> {
        let params = query.pagination;
        let paginator = filtered(&query)
            .order_by(sort_column(query.sort_by), sort_order(query.sort_order))
            .order_by_asc(event::Column::Id)
            .paginate(&self.db, params.limit());

        let (total, models) =
            tokio::try_join!(paginator.num_items(), paginator.fetch_page(params.page() - 1))?;

        Ok(Page::new(models.into_iter().map(Event::from).collect(), total))
    }

    async fn search(&self, keyword: String) -> AppResult<Vec<Event>> {
        let models = EventEntity::find()
            .filter(keyword_condition(&like_pattern(&keyword)))
            .order_by_asc(event::Column::Date)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Event::from).collect())
    }

    async fn list_by_organizer(&self, organizer_id: Uuid) -> AppResult<Vec<Event>> {
        let models = EventEntity::find()
            .filter(event::Column::OrganizerId.eq(organizer_id))
            .order_by_asc(event::Column::CreatedAt)
            .order_by_asc(event::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Event::from).collect())
    }

    async fn create(&self, organizer_id: Uuid, new_event: NewEvent) -> AppResult<Event> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(new_event.title),
            description: Set(new_event.description),
            category: Set(new_event.category),
            venue: Set(new_event.venue),
            date: Set(new_event.date),
            time: Set(new_event.time),
            registration_deadline: Set(new_event.registration_deadline),
            max_attendees: Set(new_event.max_attendees),
            image_url: Set(new_event.image_url),
            status: Set(EventStatus::default().as_str().to_string()),
            registration_status: Set(RegistrationStatus::default().as_str().to_string()),
            organizer_id: Set(organizer_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(Event::from(model))
    }

    async fn update(&self, id: Uuid, changes: EventChanges) -> AppResult<Event> {
        let model = EventEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Event")?;

        let mut active: ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(category) = changes.category {
            active.category = Set(category);
        }
        if let Some(venue) = changes.venue {
            active.venue = Set(venue);
        }
        if let Some(date) = changes.date {
            active.date = Set(date);
        }
        if let Some(time) = changes.time {
            active.time = Set(time);
        }
        if let Some(deadline) = changes.registration_deadline {
            active.registration_deadline = Set(deadline);
        }
        if let Some(max_attendees) = changes.max_attendees {
            active.max_attendees = Set(Some(max_attendees));
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(registration_status) = changes.registration_status {
            active.registration_status = Set(registration_status.as_str().to_string());
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Event::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = EventEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

/// Load an event on any connection or transaction. With `for_update` the
/// row is locked until the surrounding transaction ends.
pub(crate) async fn find_event<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    for_update: bool,
) -> AppResult<Option<Event>> {
    let mut select = EventEntity::find_by_id(id);
    if for_update {
        select = select.lock_exclusive();
    }

    Ok(select.one(db).await?.map(Event::from))
}

/// `SELECT` with the query's filters applied, unordered.
fn filtered(query: &EventQuery) -> Select<EventEntity> {
    let mut condition = Condition::all();

    if let Some(category) = &query.category {
        condition = condition.add(event::Column::Category.eq(category.as_str()));
    }
    if let Some(status) = query.status {
        condition = condition.add(event::Column::Status.eq(status.as_str()));
    }
    if let Some(registration_status) = query.registration_status {
        condition =
            condition.add(event::Column::RegistrationStatus.eq(registration_status.as_str()));
    }
    if let Some(pattern) = query.search_pattern() {
        condition = condition.add(keyword_condition(&pattern));
    }

    EventEntity::find().filter(condition)
}

/// `lower(col) LIKE pattern` for any of title, description, venue.
fn keyword_condition(pattern: &str) -> Condition {
    [
        event::Column::Title,
        event::Column::Description,
        event::Column::Venue,
    ]
    .into_iter()
    .fold(Condition::any(), |condition, column| {
        condition.add(Expr::expr(Func::lower(Expr::col(column))).like(pattern))
    })
}

fn sort_column(field: EventSortField) -> event::Column {
    match field {
        EventSortField::Date => event::Column::Date,
        EventSortField::CreatedAt => event::Column::CreatedAt,
        EventSortField::Title => event::Column::Title,
        EventSortField::Category => event::Column::Category,
        EventSortField::Venue => event::Column::Venue,
        EventSortField::RegistrationDeadline => event::Column::RegistrationDeadline,
    }
}

fn sort_order(order: SortOrder) -> Order {
    match order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &EventQuery) -> String {
        filtered(query).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_no_filters_has_no_where_clause() {
        assert!(!sql(&EventQuery::new()).contains("WHERE"));
    }

    #[test]
    fn test_equality_filters_are_anded() {
        let query = EventQuery::new()
            .category("sports")
            .status(EventStatus::Completed)
            .registration_status(RegistrationStatus::Closed);
        let sql = sql(&query);

        assert!(sql.contains(r#""category" = 'sports'"#));
        assert!(sql.contains(r#""status" = 'completed'"#));
        assert!(sql.contains(r#""registration_status" = 'closed'"#));
        assert_eq!(sql.matches(" AND ").count(), 2);
    }

    #[test]
    fn test_search_is_ored_across_columns() {
        let sql = sql(&EventQuery::new().category("tech").search("Rust"));

        assert!(sql.contains(r#"LOWER("title") LIKE '%rust%'"#));
        assert!(sql.contains(r#"LOWER("description") LIKE '%rust%'"#));
        assert!(sql.contains(r#"LOWER("venue") LIKE '%rust%'"#));
        assert_eq!(sql.matches(" OR ").count(), 2);
    }

    #[test]
    fn test_sort_mapping() {
        assert_eq!(
            sort_column(EventSortField::RegistrationDeadline),
            event::Column::RegistrationDeadline
        );
        assert_eq!(sort_order(SortOrder::Desc), Order::Desc);
    }
}
