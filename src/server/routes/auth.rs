use crate::core::accounts::AccountLogic;
use crate::core::session;
use crate::errors::{AppError, AppResult};
use crate::models::user::{Identity, User};
use crate::server::payload::{AuthResponse, LoginRequest, RegisterRequest};
use crate::server::state::AppState;
use crate::server::validation::ValidatedJson;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn auth_response(state: &AppState, user: User, message: &str) -> AppResult<AuthResponse> {
    let auth = &state.config.auth;
    let token = session::issue(&Identity::from(user.clone()), &auth.secret, auth.token_ttl_hours)?;
    Ok(AuthResponse {
        success: true,
        message: message.to_string(),
        user,
        token,
    })
}

async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> AppResult<Response> {
    let result = state
        .run(move |conn| AccountLogic::register(conn, &req.name, &req.email, &req.password))
        .await;

    match result {
        Ok(user) => {
            let body = auth_response(&state, user, "Registration successful")?;
            Ok((StatusCode::CREATED, Json(body)).into_response())
        }
        Err(AppError::Conflict(message)) => Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .run(move |conn| AccountLogic::login(conn, &req.email, &req.password))
        .await?;
    auth_response(&state, user, "Login successful").map(Json)
}
