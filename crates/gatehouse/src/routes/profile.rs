//! Dashboard and profile editing for the session user.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use chromakey_common::{AuthError, ProfileUpdate, UserView};

use super::{ApiError, auth::extract_session_token};
use crate::state::AppState;

/// Current user (401 without a valid session)
pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserView>, ApiError> {
    let token = extract_session_token(&headers);
    let user = state.auth.current_user(token.as_deref()).await?;
    Ok(Json(user.view()))
}

/// Update full name and/or bio
pub async fn update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    update: Result<Json<ProfileUpdate>, JsonRejection>,
) -> Result<Json<UserView>, ApiError> {
    let Json(update) = update.map_err(|e| AuthError::InvalidInput(e.body_text()))?;
    let token = extract_session_token(&headers);
    let user = state.auth.update_profile(token.as_deref(), update).await?;
    Ok(Json(user.view()))
}
