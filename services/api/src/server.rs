use crate::cli::ServeArgs;
use crate::infra::{AppState, SessionBackend};
use crate::routes::with_session_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talent_intake::config::AppConfig;
use talent_intake::error::AppError;
use talent_intake::telemetry;
use talent_intake::workflows::intake::remote::{validate_mapping, FIELD_MAPPING};
use talent_intake::workflows::intake::IntakeSessionService;
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
    validate_mapping(FIELD_MAPPING)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backend = SessionBackend::from_config(&config.intake, args.in_memory);
    let storage = backend.label();
    let session_service = Arc::new(IntakeSessionService::new(
        Arc::new(backend),
        config.intake.pacing(),
    ));

    let app = with_session_routes(session_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, storage, "intake session service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
