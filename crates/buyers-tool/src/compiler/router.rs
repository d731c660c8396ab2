use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::cache::TraceCache;
use super::registry;
use super::service::{EvaluationRequest, EvaluationService, EvaluationServiceError};

/// Router builder exposing the compiler and registry over HTTP.
pub fn evaluation_router<C>(service: Arc<EvaluationService<C>>) -> Router
where
    C: TraceCache + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(evaluate_handler::<C>))
        .route(
            "/api/v1/evaluations/:input_hash",
            get(lookup_handler::<C>),
        )
        .route("/api/v1/rules", get(rules_handler))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<C>(
    State(service): State<Arc<EvaluationService<C>>>,
    axum::Json(request): axum::Json<EvaluationRequest>,
) -> Response
where
    C: TraceCache + 'static,
{
    match service.evaluate(request) {
        Ok(output) => (StatusCode::OK, axum::Json(output)).into_response(),
        Err(EvaluationServiceError::Input(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn lookup_handler<C>(
    State(service): State<Arc<EvaluationService<C>>>,
    Path(input_hash): Path<String>,
) -> Response
where
    C: TraceCache + 'static,
{
    match service.lookup(&input_hash) {
        Ok(output) => (StatusCode::OK, axum::Json(output)).into_response(),
        Err(EvaluationServiceError::NotFound(_)) => {
            let payload = json!({
                "inputHash": input_hash,
                "rulesetVersion": registry::RULESET_VERSION,
                "error": "no evaluation cached for this input under the current ruleset",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn rules_handler() -> Response {
    (StatusCode::OK, axum::Json(registry::catalog())).into_response()
}
