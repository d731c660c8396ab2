use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryTraceCache};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use buyers_tool::compiler::{EvaluationService, RULESET_VERSION};
use buyers_tool::config::AppConfig;
use buyers_tool::error::AppError;
use buyers_tool::telemetry;
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

    let cache = Arc::new(InMemoryTraceCache::new(config.cache));
    let evaluation_service = Arc::new(EvaluationService::new(cache));

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ruleset = RULESET_VERSION,
        cache_entries = config.cache.max_entries,
        "buyer's tool compiler ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
