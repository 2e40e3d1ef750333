use crate::cli::ServeArgs;
use crate::infra::{build_hr_services, AppState};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use synergy_hr::config::AppConfig;
use synergy_hr::error::AppError;
use synergy_hr::telemetry;
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

    // SYNERGY_METRICS_ENABLED=off removes the exporter and the /metrics
    // surface together.
    let (metrics_layer, metrics_handle) = if config.metrics.enabled {
        let (layer, handle) = PrometheusMetricLayer::pair();
        (Some(layer), Some(Arc::new(handle)))
    } else {
        (None, None)
    };

    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: metrics_handle,
    };

    let services = build_hr_services();
    let mut app = with_api_routes(&services).layer(Extension(app_state));
    if let Some(layer) = metrics_layer {
        app = app.layer(layer);
    }

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        metrics = config.metrics.enabled,
        "hr operations service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
