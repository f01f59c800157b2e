use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::logger::{self, LogTag};
use crate::validation::{validate_drug_pair, validate_note_request};
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, success_response, validation_response};

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Body of `POST /interactions`; missing fields fail validation, not parsing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpsertInteractionRequest {
    pub drug_a: String,
    pub drug_b: String,
    pub note: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionQuery {
    pub drug_a: String,
    pub drug_b: String,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/interactions", get(get_interaction).post(upsert_interaction))
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Create or replace the note for a drug pair
async fn upsert_interaction(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UpsertInteractionRequest>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(request) = payload.map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_body",
            "Request body must be a JSON object",
            Some(&rejection.body_text()),
        )
    })?;

    validate_note_request(&request.drug_a, &request.drug_b, &request.note)
        .map_err(|errors| validation_response(&errors))?;

    let note = state
        .notes
        .upsert_interaction(&request.drug_a, &request.drug_b, &request.note)
        .await;

    logger::info(
        LogTag::Notes,
        &format!("Saved interaction note for {} + {}", note.drug_a, note.drug_b),
    );

    Ok(success_response(note))
}

/// Note for a drug pair in either order, 404 when none exists
async fn get_interaction(
    State(state): State<Arc<AppState>>,
    params: Result<Query<InteractionQuery>, QueryRejection>,
) -> Result<Response, Response> {
    let Query(params) = params.map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_query",
            "Invalid query string",
            Some(&rejection.body_text()),
        )
    })?;

    validate_drug_pair(&params.drug_a, &params.drug_b)
        .map_err(|errors| validation_response(&errors))?;

    match state
        .notes
        .get_interaction(&params.drug_a, &params.drug_b)
        .await
    {
        Some(note) => Ok(success_response(note)),
        None => Err(error_response(
            StatusCode::NOT_FOUND,
            "interaction_not_found",
            &format!(
                "No interaction note for {} + {}",
                params.drug_a, params.drug_b
            ),
            None,
        )),
    }
}
