use super::common::*;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::onboarding::{
    MockPaymentGateway, OnboardingService, SessionId, WizardCommand,
};

fn post_json(uri: &str, payload: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn start_route_creates_session() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json("/api/v1/onboarding/sessions", &json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert!(payload
        .get("session_id")
        .and_then(Value::as_str)
        .is_some_and(|id| id.starts_with("wiz-")));
    assert_eq!(payload.get("route").and_then(Value::as_str), Some("/"));
}

#[tokio::test]
async fn session_route_returns_not_found_for_unknown_id() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/onboarding/sessions/wiz-unknown"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn command_route_applies_tagged_commands() {
    let (service, _, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/onboarding/sessions/{id}/commands"),
            &json!({ "type": "select_property", "property_type": "condo" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["category"]["property_type"], json!("condo"));
}

#[tokio::test]
async fn command_route_returns_conflict_for_wrong_step() {
    let (service, _, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/onboarding/sessions/{id}/commands"),
            &json!({ "type": "pay" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn gate_warning_maps_to_unprocessable_with_level() {
    let (service, _, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/onboarding/sessions/{id}/commands"),
            &json!({ "type": "select_role", "role": "landlord" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["level"], json!("warning"));
    assert_eq!(
        payload["error"],
        json!("Please select a property type first")
    );
}

#[tokio::test]
async fn invalid_submission_returns_field_errors() {
    let (service, _, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    for command in category_commands() {
        service.apply(&id, command).expect("category command");
    }
    service
        .apply(
            &id,
            WizardCommand::OpenForm {
                kind: crate::workflows::onboarding::SlotKind::Charges,
                index: None,
            },
        )
        .expect("modal opens");
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            &format!("/api/v1/onboarding/sessions/{id}/commands"),
            &json!({
                "type": "submit_form",
                "entity": {
                    "kind": "charges",
                    "value": { "application_fee": "120", "admin_fee": "" }
                }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["level"], json!("error"));
    assert!(payload["field_errors"].get("application_fee").is_some());
    assert!(payload["field_errors"].get("admin_fee").is_some());
}

#[tokio::test]
async fn validate_route_reports_without_session() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/onboarding/forms/validate",
            &json!({
                "kind": "about",
                "value": { "description": "short" }
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["valid"], json!(false));
    assert!(payload["field_errors"].get("description").is_some());
}

#[tokio::test]
async fn catalog_route_lists_option_sets() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/onboarding/catalog"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["application_fees"], json!(["100", "150", "200"]));
    assert_eq!(payload["slots"].as_array().map(Vec::len), Some(13));
    assert_eq!(payload["plans"][1]["monthly_price"], json!("$129.99"));
}

#[tokio::test]
async fn session_handler_returns_internal_error_on_repository_failure() {
    let service = Arc::new(OnboardingService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryNotifier::default()),
        Arc::new(MockPaymentGateway::new()),
    ));

    let response = crate::workflows::onboarding::router::session_handler::<
        UnavailableRepository,
        MemoryNotifier,
        MockPaymentGateway,
    >(
        State(service),
        axum::extract::Path(SessionId::new("wiz-000001").to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn declined_payment_maps_to_payment_required() {
    let service = OnboardingService::new(
        Arc::new(MemoryRepository::default()),
        Arc::new(MemoryNotifier::default()),
        Arc::new(MockPaymentGateway::declining("card expired")),
    );
    let id = service.start().expect("session starts").session_id;
    for command in category_commands().into_iter().chain(condominium_commands()) {
        service.apply(&id, command).expect("setup command");
    }
    service
        .apply(
            &id,
            WizardCommand::SelectTier {
                tier: crate::workflows::onboarding::PlanTier::Regular,
            },
        )
        .expect("tier");
    service
        .apply(
            &id,
            WizardCommand::SelectCard {
                card_id: "amex-0001".to_string(),
            },
        )
        .expect("card");
    let service = Arc::new(service);

    let response = crate::workflows::onboarding::router::command_handler::<
        MemoryRepository,
        MemoryNotifier,
        MockPaymentGateway,
    >(
        State(service),
        axum::extract::Path(id.to_string()),
        axum::Json(WizardCommand::Pay),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
}

#[tokio::test]
async fn delete_route_discards_session() {
    let (service, _, _) = build_service();
    let id = service.start().expect("session starts").session_id;
    let router = router_with_service(service);
    let uri = format!("/api/v1/onboarding/sessions/{id}");

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::delete(uri.as_str())
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.oneshot(get(&uri)).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn amenity_search_ignores_case() {
    let (service, _, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/onboarding/catalog/amenities?search=FIRE"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["amenities"],
        json!(["Fireplace (Home)", "Fire Extinguisher"])
    );
}
