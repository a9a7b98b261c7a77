//! Organizer dashboard statistics.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::event::{Event, EventStatus};

/// Entry in the dashboard's popularity ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PopularEvent {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub registrations: u64,
}

/// Aggregate counts over the events one organizer owns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_events: u64,
    pub total_registrations: u64,
    pub upcoming_events: u64,
    pub completed_events: u64,
    pub popular_events: Vec<PopularEvent>,
}

impl DashboardStats {
    /// Aggregate `events` (in creation order) with their registration counts.
    ///
    /// Events missing from `counts` have no registrations. The ranking keeps
    /// the top `limit` events by count; the sort is stable, so ties keep
    /// creation order.
    pub fn aggregate(events: &[Event], counts: &HashMap<Uuid, u64>, limit: usize) -> Self {
        let count_of = |event: &Event| counts.get(&event.id).copied().unwrap_or(0);

        let mut ranked: Vec<&Event> = events.iter().collect();
        ranked.sort_by(|a, b| count_of(b).cmp(&count_of(a)));

        Self {
            total_events: events.len() as u64,
            total_registrations: events.iter().map(count_of).sum(),
            upcoming_events: count_status(events, EventStatus::Upcoming),
            completed_events: count_status(events, EventStatus::Completed),
            popular_events: ranked
                .into_iter()
                .take(limit)
                .map(|event| PopularEvent {
                    id: event.id,
                    title: event.title.clone(),
                    category: event.category.clone(),
                    registrations: count_of(event),
                })
                .collect(),
        }
    }
}

fn count_status(events: &[Event], status: EventStatus) -> u64 {
    events.iter().filter(|e| e.status == status).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RegistrationStatus;
    use chrono::{Duration, Utc};

    fn event(title: &str, status: EventStatus) -> Event {
        let now = Utc::now();
        Event {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: "technical".to_string(),
            venue: "Hall A".to_string(),
            date: now + Duration::days(3),
            time: "11:00 AM".to_string(),
            registration_deadline: now + Duration::days(2),
            max_attendees: None,
            image_url: None,
            status,
            registration_status: RegistrationStatus::Open,
            organizer_id: Uuid::nil(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::aggregate(&[], &HashMap::new(), 5);
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn test_totals_and_status_counts() {
        let events = vec![
            event("a", EventStatus::Upcoming),
            event("b", EventStatus::Completed),
            event("c", EventStatus::Upcoming),
            event("d", EventStatus::Cancelled),
        ];
        let counts = HashMap::from([(events[0].id, 4), (events[1].id, 6)]);

        let stats = DashboardStats::aggregate(&events, &counts, 5);

        assert_eq!(stats.total_events, 4);
        assert_eq!(stats.total_registrations, 10);
        assert_eq!(stats.upcoming_events, 2);
        assert_eq!(stats.completed_events, 1);
    }

    #[test]
    fn test_ranking_is_descending_and_stable() {
        let events: Vec<Event> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(|t| event(t, EventStatus::Upcoming))
            .collect();
        let counts = HashMap::from([
            (events[0].id, 1),
            (events[1].id, 3),
            (events[2].id, 3),
            (events[4].id, 7),
        ]);

        let stats = DashboardStats::aggregate(&events, &counts, 5);
        let titles: Vec<&str> = stats.popular_events.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["e", "b", "c", "a", "d"]);
        assert_eq!(stats.popular_events[0].registrations, 7);
        assert_eq!(stats.popular_events[4].registrations, 0);
    }
}
