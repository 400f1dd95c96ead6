use crate::cli::ServeArgs;
use crate::routes::{with_service_routes, AppState};
use axum_prometheus::PrometheusMetricLayer;
use mindscreen::config::AppConfig;
use mindscreen::diagnostics::{DiagnosticService, ModelCatalog};
use mindscreen::error::AppError;
use mindscreen::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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

    // A network that fails validation must stop startup.
    let catalog = Arc::new(ModelCatalog::load()?);
    let service = Arc::new(DiagnosticService::new(
        catalog,
        config.diagnostics.evidence_policy,
    ));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let app = with_service_routes(service, app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        policy = ?config.diagnostics.evidence_policy,
        "screening service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
