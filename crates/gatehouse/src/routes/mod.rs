//! HTTP route handlers for Gatehouse.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chromakey_common::AuthError;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod auth;
mod health;
mod palette;
mod profile;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))

        // Palette for the graphical password UI
        .route("/palette", get(palette::get_palette))

        // Authentication
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))

        // Dashboard / profile of the session user
        .route("/me", get(profile::get_me).patch(profile::update_me))

        .layer(TraceLayer::new_for_http())

        // Add shared state
        .with_state(state)
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

/// Flow error rendered as a JSON response
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Backend details stay in the logs
        let message = match &self.0 {
            AuthError::Store(detail) => {
                tracing::error!(error = %detail, "Store unavailable");
                "Service temporarily unavailable".to_string()
            }
            AuthError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: self.0.kind(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, Response, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    pub async fn app() -> Router {
        super::create_router(crate::state::test_support::memory_state().await)
    }

    pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
        app.clone().oneshot(request).await.unwrap()
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
