//! Request bodies and the rules they must satisfy.
//!
//! Missing fields deserialize to their defaults so they are reported by the
//! validator per field instead of failing the whole body.

use crate::errors::{AppError, AppResult};
use crate::models::event::{EventChanges, NewEvent};
use crate::models::profile::NewProfile;
use crate::models::user::User;
use crate::utils::time::parse_event_date;
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn event_date(value: &str, _ctx: &()) -> garde::Result {
    match parse_event_date(value) {
        Some(_) => Ok(()),
        None => Err(garde::Error::new("Invalid date format")),
    }
}

fn optional_event_date(value: &Option<String>, ctx: &()) -> garde::Result {
    match value {
        Some(v) => event_date(v, ctx),
        None => Ok(()),
    }
}

fn valid_event_id(value: &str, _ctx: &()) -> garde::Result {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| garde::Error::new("Invalid event ID"))
}

fn parse_date(value: &str) -> AppResult<chrono::DateTime<chrono::Utc>> {
    parse_event_date(value).ok_or_else(|| AppError::InvalidDate(value.to_string()))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[garde(length(min = 1))]
    pub title: String,
    #[garde(custom(event_date))]
    pub date: String,
    #[garde(length(min = 1))]
    pub location: String,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub image: Option<String>,
    #[garde(skip)]
    pub volunteer_positions: Option<Vec<String>>,
}

impl TryFrom<CreateEventRequest> for NewEvent {
    type Error = AppError;

    fn try_from(value: CreateEventRequest) -> AppResult<Self> {
        let CreateEventRequest {
            title,
            date,
            location,
            description,
            image,
            volunteer_positions,
        } = value;
        Ok(NewEvent {
            title,
            date: parse_date(&date)?,
            location,
            description,
            image,
            volunteer_positions: volunteer_positions.unwrap_or_default(),
        })
    }
}

/// Partial event update. `null` is treated like an absent field.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[garde(length(min = 1))]
    pub title: Option<String>,
    #[garde(custom(optional_event_date))]
    pub date: Option<String>,
    #[garde(length(min = 1))]
    pub location: Option<String>,
    #[garde(skip)]
    pub description: Option<String>,
    #[garde(skip)]
    pub image: Option<String>,
    #[garde(skip)]
    pub volunteer_positions: Option<Vec<String>>,
}

impl TryFrom<UpdateEventRequest> for EventChanges {
    type Error = AppError;

    fn try_from(value: UpdateEventRequest) -> AppResult<Self> {
        let UpdateEventRequest {
            title,
            date,
            location,
            description,
            image,
            volunteer_positions,
        } = value;
        Ok(EventChanges {
            title,
            date: date.as_deref().map(parse_date).transpose()?,
            location,
            description,
            image,
            volunteer_positions,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterRequest {
    #[garde(length(min = 1))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
    pub token: String,
}

/// Body of both `POST /volunteers/register` and `DELETE /volunteers/unregister`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistrationRequest {
    #[garde(custom(valid_event_id))]
    pub event_id: String,
    #[garde(length(min = 1))]
    pub position: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ProfileRequest {
    #[garde(length(min = 1), inner(length(min = 1)))]
    pub skills: Vec<String>,
    #[garde(range(min = 16))]
    pub age: i32,
    #[garde(length(min = 1))]
    pub gender: String,
    #[garde(email)]
    pub contact_email: String,
}

impl From<ProfileRequest> for NewProfile {
    fn from(value: ProfileRequest) -> Self {
        let ProfileRequest {
            skills,
            age,
            gender,
            contact_email,
        } = value;
        NewProfile {
            skills,
            age,
            gender,
            contact_email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
