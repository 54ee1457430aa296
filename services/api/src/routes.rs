use crate::infra::AppState;
use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use chrono::Utc;
use dp2001::auth::AccessGate;
use dp2001::workflows::personnel::{personnel_router, WorkflowEngine, WorkflowStore};
use serde_json::json;
use std::sync::Arc;

/// Mount the workflow routes behind bearer authentication, plus the
/// operational endpoints that stay open.
pub(crate) fn with_workflow_routes<S>(
    engine: Arc<WorkflowEngine<S>>,
    gate: Arc<dyn AccessGate>,
) -> Router
where
    S: WorkflowStore + 'static,
{
    personnel_router(engine)
        .layer(middleware::from_fn_with_state(gate, require_bearer))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

/// Authenticate the caller before any entity state is touched. The engine
/// only ever sees the resulting opaque principal.
pub(crate) async fn require_bearer(
    State(gate): State<Arc<dyn AccessGate>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token.map(|token| gate.authenticate(token)) {
        Some(Ok(principal)) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        _ => {
            let payload = json!({ "error": "invalid or missing bearer token" });
            (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "app": "dp2001" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let keys = if state.keys.is_stale(Utc::now()) {
        "stale"
    } else {
        "fresh"
    };

    let payload = if ready {
        json!({ "status": "ready", "verification_keys": keys })
    } else {
        json!({ "status": "initializing", "verification_keys": keys })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
