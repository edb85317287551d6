use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ckp_scoring::config::AppConfig;
use ckp_scoring::error::AppError;
use ckp_scoring::service::WorkQualityService;
use ckp_scoring::telemetry;
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
    if let Some(model) = args.model.take() {
        config.model.artifact_path = model;
    }
    if let Some(graph_metrics) = args.graph_metrics.take() {
        config.data.graph_metrics_path = graph_metrics;
    }

    telemetry::init(&config.telemetry)?;

    // Scorer selection happens here, once, before the listener accepts traffic.
    let service = Arc::new(WorkQualityService::from_config(&config));
    let scorer = service.mode();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        scorer,
    };

    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        scorer = scorer.label(),
        "work quality scoring service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
