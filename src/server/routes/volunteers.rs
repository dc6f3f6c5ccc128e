use crate::core::profiles::ProfileLogic;
use crate::core::volunteers::VolunteerLogic;
use crate::errors::{AppError, AppResult};
use crate::models::profile::{NewProfile, PublicVolunteer, VolunteerProfile};
use crate::models::volunteer::{EventVolunteers, Registration};
use crate::server::auth::{OptionalAuth, RequireAuth};
use crate::server::payload::{MessageResponse, ProfileRequest, RegistrationRequest};
use crate::server::state::AppState;
use crate::server::validation::ValidatedJson;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/volunteers/public", get(public_volunteers))
        .route("/volunteers/event/{event_id}", get(event_volunteers))
        .route("/volunteers/register", post(register))
        .route("/volunteers/unregister", delete(unregister))
        .route("/volunteers/my-events", get(my_events))
        .route("/volunteers/profile", get(show_profile).post(create_profile))
}

async fn public_volunteers(State(state): State<AppState>) -> AppResult<Json<Vec<PublicVolunteer>>> {
    state.run(|conn| ProfileLogic::list_public(conn)).await.map(Json)
}

async fn event_volunteers(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    OptionalAuth(caller): OptionalAuth,
) -> AppResult<Json<Vec<Registration>>> {
    let include_email = caller.is_some();
    state
        .run(move |conn| VolunteerLogic::list_by_event(conn, &event_id, include_email))
        .await
        .map(Json)
}

async fn register(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<Registration>)> {
    let reg = state
        .run(move |conn| VolunteerLogic::register(conn, &req.event_id, user.id, &req.position))
        .await?;
    Ok((StatusCode::CREATED, Json(reg)))
}

async fn unregister(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<RegistrationRequest>,
) -> AppResult<Json<MessageResponse>> {
    let removed = state
        .run(move |conn| VolunteerLogic::unregister(conn, &req.event_id, user.id, &req.position))
        .await?;

    if !removed {
        return Err(AppError::NotFound("Volunteer registration not found".into()));
    }
    Ok(Json(MessageResponse {
        message: "Successfully unregistered".into(),
    }))
}

async fn my_events(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<EventVolunteers>>> {
    state
        .run(move |conn| VolunteerLogic::list_grouped_by_owner(conn, user.id))
        .await
        .map(Json)
}

async fn create_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<ProfileRequest>,
) -> AppResult<(StatusCode, Json<VolunteerProfile>)> {
    let input = NewProfile::from(req);
    let profile = state
        .run(move |conn| ProfileLogic::create(conn, user.id, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// The caller's profile, or `null` when none exists.
async fn show_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Option<VolunteerProfile>>> {
    state
        .run(move |conn| ProfileLogic::get(conn, user.id))
        .await
        .map(Json)
}
