use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemorySessionRepository, TracingNotifier};
use crate::routes::with_onboarding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_wizard::config::AppConfig;
use listing_wizard::error::AppError;
use listing_wizard::telemetry;
use listing_wizard::workflows::onboarding::{MockPaymentGateway, OnboardingService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemorySessionRepository::with_capacity(
        config.onboarding.max_sessions,
        chrono::Duration::minutes(i64::from(config.onboarding.session_ttl_minutes)),
    ));
    let onboarding_service = Arc::new(OnboardingService::new(
        repository,
        Arc::new(TracingNotifier),
        Arc::new(MockPaymentGateway::new()),
    ));

    let app = with_onboarding_routes(onboarding_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_sessions = config.onboarding.max_sessions,
        session_ttl_minutes = config.onboarding.session_ttl_minutes,
        "listing onboarding wizard ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
