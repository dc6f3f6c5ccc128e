use crate::utils::time::serialize_iso;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A user's claim on one position of one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: i64,
    pub event_id: String,
    pub user_id: i64,
    pub position: String,
    #[serde(serialize_with = "serialize_iso")]
    pub registered_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// All registrations of one event owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventVolunteers {
    pub event_id: String,
    pub event_title: String,
    pub volunteers: Vec<Registration>,
}
