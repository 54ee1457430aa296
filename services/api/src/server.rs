use crate::cli::ServeArgs;
use crate::infra::{seed_employees, AppState};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Duration;
use dp2001::auth::{AccessGate, KeyCache, StaticTokenGate};
use dp2001::config::AppConfig;
use dp2001::error::AppError;
use dp2001::telemetry;
use dp2001::workflows::personnel::{InMemoryWorkflowStore, WorkflowEngine};
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
    let token = args
        .token
        .take()
        .unwrap_or_else(|| "local-dev-token".to_string());

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));

    // Key material is installed explicitly at startup; /ready reports when
    // the configured refresh window has lapsed.
    let key_cache = Arc::new(KeyCache::new(
        Duration::seconds(config.auth.key_refresh_secs as i64),
        Vec::new(),
    ));

    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        keys: key_cache,
    };

    let store = Arc::new(InMemoryWorkflowStore::new());
    let employees = seed_employees(&store);
    info!(count = employees.len(), "seeded employee records");

    let engine = Arc::new(WorkflowEngine::new(store));
    let gate: Arc<dyn AccessGate> =
        Arc::new(StaticTokenGate::default().with_token(token, "local-operator"));

    let app = with_workflow_routes(engine, gate)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "DP-2001 workflow service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
