use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_sla_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lettings_sla::config::AppConfig;
use lettings_sla::error::AppError;
use lettings_sla::sla::{SlaEngine, SystemClock};
use lettings_sla::telemetry;
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

    let engine = Arc::new(
        SlaEngine::new(config.default_sla, Arc::new(SystemClock)).with_time_zone(config.time_zone),
    );

    let app = with_sla_routes(engine)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_sla = ?config.default_sla,
        time_zone = %config.time_zone,
        "issue SLA service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
