//! Event domain shapes: the stored record, the creation input, partial
//! changes and list filters.

use crate::utils::time::serialize_iso;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,                       // ⇔ events.id (TEXT, UUID v4)
    pub title: String,                    // ⇔ events.title
    pub location: String,                 // ⇔ events.location
    pub description: Option<String>,      // ⇔ events.description (NULL when absent)
    pub image: Option<String>,            // ⇔ events.image (NULL when absent)
    pub volunteer_positions: Vec<String>, // ⇔ events.volunteer_positions (JSON text)
    pub user_id: Option<i64>,             // ⇔ events.user_id (owner)

    /// ⇔ events.date (TEXT, canonical ISO)
    #[serde(serialize_with = "serialize_iso")]
    pub date: DateTime<Utc>,
}

impl Event {
    pub fn offers_position(&self, position: &str) -> bool {
        self.volunteer_positions.iter().any(|p| p == position)
    }
}

/// Input for a new event. The owner is passed separately.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub volunteer_positions: Vec<String>,
}

/// Partial update: `None` means "leave untouched", never "clear".
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub volunteer_positions: Option<Vec<String>>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.volunteer_positions.is_none()
    }
}

/// Filters for `GET /events/filter`. Date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

/// Result of an ownership check. A missing event is reported separately so
/// callers can answer 404 rather than 403.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owner,
    NotOwner,
    Missing,
}
