//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::AuthService;
use crate::AppState;
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, User};

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    body.validate()?;

    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.register(body).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    body.validate()?;

    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.login(body).await?;

    Ok(Json(tokens))
}

/// Return the authenticated principal
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.get_user(current_user.0.user_id).await?;
    Ok(Json(user))
}
