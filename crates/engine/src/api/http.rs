//! HTTP routes.

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pocketpet_domain::{InteractionRecord, StatusSnapshot};

use crate::app::App;
use crate::use_cases::{InteractError, InteractionOutcome};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(pet_info))
        .route("/status", get(pet_status))
        .route("/history", get(interaction_history))
        .route("/interact", post(interact))
}

#[derive(Serialize)]
struct PetInfo {
    name: String,
    status: StatusSnapshot,
    last_interaction: DateTime<Utc>,
}

/// Root endpoint with basic pet information.
async fn pet_info(State(app): State<Arc<App>>) -> Json<PetInfo> {
    let pet = app.pet.lock().await;
    Json(PetInfo {
        name: pet.name().to_string(),
        status: pet.status(),
        last_interaction: pet.last_interaction(),
    })
}

async fn pet_status(State(app): State<Arc<App>>) -> Json<StatusSnapshot> {
    Json(app.pet.lock().await.status())
}

async fn interaction_history(State(app): State<Arc<App>>) -> Json<Vec<InteractionRecord>> {
    Json(app.pet.lock().await.history().to_vec())
}

#[derive(Deserialize)]
struct InteractBody {
    prompt: String,
}

async fn interact(
    State(app): State<Arc<App>>,
    Json(body): Json<InteractBody>,
) -> Result<Json<InteractionOutcome>, ApiError> {
    let outcome = app.interact.execute(body.prompt).await?;
    Ok(Json(outcome))
}

/// API-level error response carrying a human-readable detail string.
#[derive(Debug)]
pub enum ApiError {
    Internal(String),
}

impl From<InteractError> for ApiError {
    fn from(e: InteractError) -> Self {
        tracing::error!(error = %e, "interaction failed");
        ApiError::Internal(e.to_string())
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Internal(detail) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "detail": detail })),
            )
                .into_response(),
        }
    }
}
