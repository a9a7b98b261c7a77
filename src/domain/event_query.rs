//! Typed filter/sort/paginate description of an event listing.
//!
//! Built by the HTTP layer, translated to SQL by the event repository.

use serde::Deserialize;
use utoipa::ToSchema;

use super::event::{EventStatus, RegistrationStatus};
use crate::types::PaginationParams;

/// Columns an event listing may be ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum EventSortField {
    #[default]
    Date,
    CreatedAt,
    Title,
    Category,
    Venue,
    RegistrationDeadline,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Event listing query.
///
/// Equality filters are ANDed together; the search term matches
/// case-insensitively against title, description OR venue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub category: Option<String>,
    pub status: Option<EventStatus>,
    pub registration_status: Option<RegistrationStatus>,
    pub search: Option<String>,
    pub sort_by: EventSortField,
    pub sort_order: SortOrder,
    pub pagination: PaginationParams,
}

/// Blank strings count as "no filter".
fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category);
        self
    }

    pub fn status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn registration_status(mut self, status: RegistrationStatus) -> Self {
        self.registration_status = Some(status);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = non_blank(term);
        self
    }

    pub fn sort(mut self, field: EventSortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    pub fn paginate(mut self, pagination: PaginationParams) -> Self {
        self.pagination = pagination;
        self
    }

    /// `%term%` pattern for a case-insensitive LIKE, lowercased, with LIKE
    /// wildcards in the term escaped.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(like_pattern)
    }
}

/// Lowercased `%...%` LIKE pattern with `\`, `%` and `_` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sort_is_date_ascending() {
        let query = EventQuery::new();
        assert_eq!(query.sort_by, EventSortField::Date);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(query.pagination.offset(), 0);
    }

    #[test]
    fn test_builder_drops_blank_filters() {
        let query = EventQuery::new().category("  ").search("");
        assert!(query.category.is_none());
        assert!(query.search.is_none());
        assert!(query.search_pattern().is_none());
    }

    #[test]
    fn test_builder_sets_every_filter() {
        let query = EventQuery::new()
            .category("cultural")
            .status(EventStatus::Upcoming)
            .registration_status(RegistrationStatus::Open)
            .search(" Dance ")
            .sort(EventSortField::CreatedAt, SortOrder::Desc)
            .paginate(PaginationParams::new(2, 5));

        assert_eq!(query.category.as_deref(), Some("cultural"));
        assert_eq!(query.status, Some(EventStatus::Upcoming));
        assert_eq!(query.registration_status, Some(RegistrationStatus::Open));
        assert_eq!(query.search_pattern().as_deref(), Some("%dance%"));
        assert_eq!(query.pagination.offset(), 5);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_sort_field_wire_names() {
        let field: EventSortField = serde_json::from_str("\"registrationDeadline\"").unwrap();
        assert_eq!(field, EventSortField::RegistrationDeadline);
        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Desc);
    }
}
