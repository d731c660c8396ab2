use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::compiler::registry::ALL_RULES;
use crate::compiler::router::{evaluate_handler, lookup_handler};
use crate::compiler::EvaluationService;

fn post_evaluation(body: Vec<u8>) -> Request<Body> {
    Request::post("/api/v1/evaluations")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn evaluate_route_returns_output_with_trace() {
    let (service, cache) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_evaluation(
            serde_json::to_vec(&request(baseline_input())).expect("serializes"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["verdict"]["recommendation"], "PROCEED");
    assert_eq!(payload["_trace"]["timestamp"], TIMESTAMP);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn evaluation_can_be_fetched_by_hash() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let created = router
        .clone()
        .oneshot(post_evaluation(
            serde_json::to_vec(&request(final_sale_without_warranty())).expect("serializes"),
        ))
        .await
        .expect("route executes");
    let created = read_json_body(created).await;
    let hash = created["_trace"]["inputHash"]
        .as_str()
        .expect("hash present")
        .to_string();

    let fetched = router
        .oneshot(
            Request::get(format!("/api/v1/evaluations/{hash}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(fetched.status(), StatusCode::OK);
    let fetched = read_json_body(fetched).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_hash_returns_not_found() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/evaluations/00000000")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert_eq!(payload["inputHash"], "00000000");
}

#[tokio::test]
async fn evaluate_handler_returns_unprocessable_for_bad_timestamp() {
    let (service, _) = build_service();
    let mut req = request(baseline_input());
    req.options.timestamp = "June 1st".to_string();

    let response =
        evaluate_handler::<MemoryCache>(State(Arc::new(service)), axum::Json(req)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("June 1st"));
}

#[tokio::test]
async fn handlers_return_internal_error_when_cache_is_down() {
    let service = Arc::new(EvaluationService::new(Arc::new(UnavailableCache)));

    let evaluated =
        evaluate_handler::<UnavailableCache>(State(service.clone()), axum::Json(request(baseline_input())))
            .await;
    assert_eq!(evaluated.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let looked_up = lookup_handler::<UnavailableCache>(
        State(service),
        axum::extract::Path("abcd1234".to_string()),
    )
    .await;
    assert_eq!(looked_up.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn rules_route_lists_the_registry() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/rules")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["rules"].as_array().map(Vec::len),
        Some(ALL_RULES.len())
    );
    assert_eq!(payload["executionOrder"][0], "DamageClassifier");
}
