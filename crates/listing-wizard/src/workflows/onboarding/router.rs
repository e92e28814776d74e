use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::catalog;
use super::commands::WizardCommand;
use super::entities::{Entity, SlotKind};
use super::gallery::MediaSlot;
use super::notifications::{NotificationLevel, Notifier};
use super::payment::{format_price, BillingCycle, GatewayError, PaymentGateway, PlanTier};
use super::repository::{RepositoryError, SessionRepository};
use super::service::{OnboardingService, OnboardingServiceError};
use super::session::{SessionId, WizardError};

/// Router builder exposing the wizard session and form validation endpoints.
pub fn onboarding_router<R, N, G>(service: Arc<OnboardingService<R, N, G>>) -> Router
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    Router::new()
        .route(
            "/api/v1/onboarding/sessions",
            post(start_handler::<R, N, G>),
        )
        .route(
            "/api/v1/onboarding/sessions/:session_id",
            get(session_handler::<R, N, G>).delete(discard_handler::<R, N, G>),
        )
        .route(
            "/api/v1/onboarding/sessions/:session_id/commands",
            post(command_handler::<R, N, G>),
        )
        .route(
            "/api/v1/onboarding/forms/validate",
            post(validate_handler::<R, N, G>),
        )
        .route("/api/v1/onboarding/catalog", get(catalog_handler))
        .route("/api/v1/onboarding/catalog/amenities", get(amenity_search_handler))
        .with_state(service)
}

pub(crate) async fn start_handler<R, N, G>(
    State(service): State<Arc<OnboardingService<R, N, G>>>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    match service.start() {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn session_handler<R, N, G>(
    State(service): State<Arc<OnboardingService<R, N, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    match service.get(&SessionId::new(session_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn discard_handler<R, N, G>(
    State(service): State<Arc<OnboardingService<R, N, G>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    match service.discard(&SessionId::new(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn command_handler<R, N, G>(
    State(service): State<Arc<OnboardingService<R, N, G>>>,
    Path(session_id): Path<String>,
    axum::Json(command): axum::Json<WizardCommand>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    match service.apply(&SessionId::new(session_id), command) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn validate_handler<R, N, G>(
    State(service): State<Arc<OnboardingService<R, N, G>>>,
    axum::Json(entity): axum::Json<Entity>,
) -> Response
where
    R: SessionRepository + 'static,
    N: Notifier + 'static,
    G: PaymentGateway + 'static,
{
    let report = service.validate(&entity);
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn catalog_handler() -> Response {
    let slots: Vec<_> = SlotKind::ALL
        .into_iter()
        .map(|kind| {
            json!({
                "kind": kind,
                "label": kind.label(),
                "hint": kind.hint(),
                "required": kind.required(),
                "cardinality": kind.cardinality(),
            })
        })
        .collect();
    let media: Vec<_> = [
        MediaSlot::CoverPhoto,
        MediaSlot::FeaturedPhoto,
        MediaSlot::MorePhoto,
        MediaSlot::PropertyVideo,
        MediaSlot::VirtualTour,
        MediaSlot::AerialVideo,
    ]
    .into_iter()
    .map(|slot| {
        json!({
            "slot": slot,
            "label": slot.label(),
            "accept": slot.group().accept(),
            "capacity": slot.capacity(),
        })
    })
    .collect();
    let plans: Vec<_> = PlanTier::ALL
        .into_iter()
        .map(|tier| {
            json!({
                "tier": tier,
                "name": tier.name(),
                "monthly_price": format_price(tier.monthly_price_cents(BillingCycle::Monthly)),
                "annual_price": format_price(tier.monthly_price_cents(BillingCycle::Annually)),
                "description": tier.description(),
                "features": tier.features(),
            })
        })
        .collect();

    let payload = json!({
        "countries": catalog::COUNTRIES,
        "default_dial_code": catalog::DEFAULT_DIAL_CODE,
        "pet_types": catalog::PET_TYPES,
        "guest_parking_times": catalog::GUEST_PARKING_TIMES,
        "payment_frequencies": catalog::PAYMENT_FREQUENCIES,
        "application_fees": catalog::APPLICATION_FEES,
        "utility_types": catalog::UTILITY_TYPES,
        "amenities": catalog::AMENITIES,
        "slots": slots,
        "media": media,
        "plans": plans,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AmenitySearch {
    #[serde(default)]
    search: String,
}

pub(crate) async fn amenity_search_handler(Query(query): Query<AmenitySearch>) -> Response {
    let amenities = catalog::search_amenities(&query.search);
    (StatusCode::OK, axum::Json(json!({ "amenities": amenities }))).into_response()
}

fn error_response(err: OnboardingServiceError) -> Response {
    let (status, payload) = match &err {
        OnboardingServiceError::Wizard(WizardError::Gate(gate)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": gate.to_string(),
                "level": NotificationLevel::Warning,
            }),
        ),
        OnboardingServiceError::Wizard(
            WizardError::WrongStep { .. }
            | WizardError::AlreadySubmitted
            | WizardError::IncompleteFlow,
        ) => (StatusCode::CONFLICT, json!({ "error": err.to_string() })),
        OnboardingServiceError::Wizard(WizardError::Gateway(GatewayError::Declined(_))) => (
            StatusCode::PAYMENT_REQUIRED,
            json!({ "error": err.to_string() }),
        ),
        OnboardingServiceError::Wizard(WizardError::Gateway(GatewayError::Unavailable(_))) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": err.to_string() }),
        ),
        OnboardingServiceError::Wizard(wizard) => {
            let mut payload = json!({
                "error": wizard.to_string(),
                "level": "error",
            });
            if let Some(field_errors) = wizard.field_errors() {
                payload["field_errors"] = json!(field_errors);
            }
            (StatusCode::UNPROCESSABLE_ENTITY, payload)
        }
        OnboardingServiceError::Repository(RepositoryError::NotFound) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "onboarding session not found" }),
        ),
        OnboardingServiceError::Repository(RepositoryError::CapacityReached { .. }) => (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": err.to_string() }),
        ),
        OnboardingServiceError::Repository(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": err.to_string() }),
        ),
    };
    (status, axum::Json(payload)).into_response()
}
