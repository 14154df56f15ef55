//! Registration, login and logout endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
    },
    response::IntoResponse,
};
use chromakey_common::{AuthError, CodecError, UserView, constants::SESSION_COOKIE_NAME};

use super::ApiError;
use crate::auth::{LoginRequest, RegisterRequest};
use crate::state::AppState;

/// Register a new user
///
/// Returns:
/// - 201: Registered
/// - 400: Invalid graphical password or profile field
/// - 409: Username or email already registered
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserView>), ApiError> {
    let Json(payload) = payload.map_err(malformed_body)?;
    let user = state.auth.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user.view())))
}

/// Log in and receive a session cookie
///
/// Returns:
/// - 200: Logged in, `Set-Cookie` carries the session
/// - 400: Malformed or empty graphical password
/// - 401: Invalid username or graphical password
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(malformed_body)?;
    let outcome = state.auth.login(payload).await?;

    let mut headers = HeaderMap::new();
    let cookie = session_cookie(
        &outcome.token,
        state.auth.session_ttl_secs(),
        state.config.session.cookie_secure,
    )
    .map_err(|e| AuthError::Internal(format!("invalid session cookie: {e}")))?;
    headers.insert(SET_COOKIE, cookie);

    Ok((headers, Json(outcome.user.view())))
}

/// Clear the session; always succeeds
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = extract_session_token(&headers) {
        if let Err(e) = state.auth.logout(&token).await {
            tracing::error!(error = %e, "Failed to clear session");
        }
    }

    // Always clear the cookie, even if the session record was missing.
    let mut response_headers = HeaderMap::new();
    if let Ok(cookie) = clear_session_cookie(state.config.session.cookie_secure) {
        response_headers.insert(SET_COOKIE, cookie);
    }
    (StatusCode::NO_CONTENT, response_headers)
}

/// Unreadable register/login body
fn malformed_body(rejection: JsonRejection) -> ApiError {
    AuthError::Codec(CodecError::MalformedInput(rejection.body_text())).into()
}

/// Build an `HttpOnly` cookie for the session token
fn session_cookie(
    token: &str,
    ttl_secs: u64,
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

fn clear_session_cookie(
    secure: bool,
) -> Result<HeaderValue, axum::http::header::InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Session token from `Authorization: Bearer` or the session cookie
pub(super) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value.split(';').find_map(|pair| {
        let (key, val) = pair.trim().split_once('=')?;
        (key.trim() == SESSION_COOKIE_NAME && !val.trim().is_empty())
            .then(|| val.trim().to_string())
    })
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .trim()
        .strip_prefix("Bearer ")
        .or_else(|| value.trim().strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then(|| token.to_string())
}
