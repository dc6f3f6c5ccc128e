use crate::core::events::EventLogic;
use crate::errors::{AppError, AppResult};
use crate::models::event::{Event, EventChanges, EventFilter, NewEvent};
use crate::server::auth::RequireAuth;
use crate::server::payload::{CreateEventRequest, UpdateEventRequest};
use crate::server::state::AppState;
use crate::server::validation::ValidatedJson;
use crate::utils::time::parse_event_date;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/search", get(search_events))
        .route("/events/filter", get(filter_events))
        .route("/events/my", get(my_events))
        .route(
            "/events/{id}",
            get(show_event).patch(update_event).delete(delete_event),
        )
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub location: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<FilterQuery> for EventFilter {
    type Error = AppError;

    fn try_from(value: FilterQuery) -> AppResult<Self> {
        let bound = |raw: Option<String>| -> AppResult<_> {
            match non_empty(raw) {
                Some(s) => parse_event_date(&s)
                    .map(Some)
                    .ok_or(AppError::InvalidDate(s)),
                None => Ok(None),
            }
        };

        Ok(EventFilter {
            date_from: bound(value.date_from)?,
            date_to: bound(value.date_to)?,
            location: non_empty(value.location),
        })
    }
}

async fn list_events(State(state): State<AppState>) -> AppResult<Json<Vec<Event>>> {
    state.run(|conn| EventLogic::list(conn)).await.map(Json)
}

async fn search_events(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let term = query.q.unwrap_or_default();
    state
        .run(move |conn| EventLogic::search(conn, &term))
        .await
        .map(Json)
}

async fn filter_events(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let filter = EventFilter::try_from(query)?;
    state
        .run(move |conn| EventLogic::filter(conn, &filter))
        .await
        .map(Json)
}

async fn my_events(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Vec<Event>>> {
    state
        .run(move |conn| EventLogic::list_by_owner(conn, user.id))
        .await
        .map(Json)
}

async fn show_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Event>> {
    state
        .run(move |conn| EventLogic::get(conn, &id))
        .await
        .map(Json)
}

async fn create_event(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<Event>)> {
    let input = NewEvent::try_from(req)?;
    let event = state
        .run(move |conn| EventLogic::create(conn, user.id, &input))
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RequireAuth(user): RequireAuth,
    ValidatedJson(req): ValidatedJson<UpdateEventRequest>,
) -> AppResult<Json<Event>> {
    let changes = EventChanges::try_from(req)?;
    state
        .run(move |conn| EventLogic::update(conn, &id, user.id, &changes))
        .await
        .map(Json)
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<Event>> {
    state
        .run(move |conn| EventLogic::delete(conn, &id, user.id))
        .await
        .map(Json)
}
