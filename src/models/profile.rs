use crate::utils::time::serialize_iso;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub id: i64,
    pub user_id: i64,
    pub skills: Vec<String>,
    pub age: i32,
    pub gender: String,
    pub contact_email: String,
    pub is_public: bool,
    #[serde(serialize_with = "serialize_iso")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProfile {
    pub skills: Vec<String>,
    pub age: i32,
    pub gender: String,
    pub contact_email: String,
}

/// The anonymous view of a public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicVolunteer {
    pub id: i64,
    pub skills: Vec<String>,
    pub age: i32,
    pub gender: String,
}
