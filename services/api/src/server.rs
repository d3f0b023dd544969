use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_workspace_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use esg_auditor::config::AppConfig;
use esg_auditor::error::AppError;
use esg_auditor::store::JsonFileStore;
use esg_auditor::telemetry;
use esg_auditor::workspace::AuditorWorkspace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut config: AppConfig, mut args: ServeArgs) -> Result<(), AppError> {
    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonFileStore::open(&config.storage.path));
    let store_path = store.path().display().to_string();
    let workspace = Arc::new(AuditorWorkspace::new(store));

    let app = with_workspace_routes(workspace)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        store = %store_path,
        "esg auditor ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
