use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::errors::ValidationError;
use crate::logger::{self, LogTag};
use crate::validation::{validate_drug_pair, validate_limit};
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, success_response, validation_response};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignalsQuery {
    pub drug_a: String,
    pub drug_b: String,
    pub limit: Option<i64>,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/signals", get(get_signals))
}

/// Adverse-event signal for a drug pair
///
/// Any upstream failure is reported as 502; the cause is logged.
async fn get_signals(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SignalsQuery>, QueryRejection>,
) -> Result<Response, Response> {
    let Query(params) = params.map_err(|rejection| {
        error_response(
            StatusCode::BAD_REQUEST,
            "invalid_query",
            "Invalid query string",
            Some(&rejection.body_text()),
        )
    })?;

    let mut errors = ValidationError::new();
    if let Err(pair_errors) = validate_drug_pair(&params.drug_a, &params.drug_b) {
        errors.merge(pair_errors);
    }
    let limit = match params.limit {
        None => state.analyzer.default_limit(),
        Some(raw) => match validate_limit(raw, state.config.signals.max_limit) {
            Ok(limit) => limit,
            Err(limit_errors) => {
                errors.merge(limit_errors);
                0
            }
        },
    };
    errors
        .into_result()
        .map_err(|errors| validation_response(&errors))?;

    match state
        .analyzer
        .analyze_signals(&params.drug_a, &params.drug_b, Some(limit))
        .await
    {
        Ok(analysis) => Ok(success_response(analysis.as_ref())),
        Err(e) => {
            logger::warning(
                LogTag::Signals,
                &format!(
                    "Signal analysis failed for {} + {} [{}]: {}",
                    params.drug_a,
                    params.drug_b,
                    e.code(),
                    e
                ),
            );
            Err(error_response(
                StatusCode::BAD_GATEWAY,
                e.code(),
                "Adverse-event service request failed",
                Some(&e.to_string()),
            ))
        }
    }
}
