//! HTTP routes of the chat relay.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::generate::{self, GenerateError};
use crate::state::SharedState;

/// Builds the relay router.  `POST /chat/` is the only route.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/chat/", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Incoming chat payload.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's prompt text, forwarded verbatim.
    pub text: String,
}

/// Successful relay reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// The model's generated text.
    pub response: String,
}

/// Every failure carries the same `{"detail": ...}` body: a malformed
/// request keeps the rejection's own status, while any upstream failure
/// is a 500, regardless of whether it was a transport error, an
/// upstream error status, or an unparseable reply.
enum RelayError {
    Invalid(JsonRejection),
    Upstream(GenerateError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            RelayError::Invalid(rejection) => (rejection.status(), rejection.body_text()),
            RelayError::Upstream(err) => {
                tracing::error!("chat relay failed: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

async fn chat(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    let Json(request) = payload.map_err(RelayError::Invalid)?;
    let response = generate::generate_content(&state.http, &state.generation, &request.text)
        .await
        .map_err(RelayError::Upstream)?;
    Ok(Json(ChatResponse { response }))
}
