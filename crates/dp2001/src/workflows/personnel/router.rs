//! HTTP surface for the workflow operations.
//!
//! Authentication happens upstream: the service layer verifies the bearer
//! credential and injects the resulting [`Principal`] as a request
//! extension before any handler runs. Handlers fall back to an anonymous
//! principal when mounted without that middleware (tests, demos).

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::auth::Principal;

use super::domain::{
    ActionRequestId, ActionRequestStatus, ActionType, EmployeeId, PreValidationId,
};
use super::engine::{WorkflowEngine, WorkflowError};
use super::store::WorkflowStore;

pub fn personnel_router<S>(engine: Arc<WorkflowEngine<S>>) -> Router
where
    S: WorkflowStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/prevalidations",
            post(create_prevalidation_handler::<S>),
        )
        .route(
            "/api/v1/prevalidations/:id",
            get(get_prevalidation_handler::<S>),
        )
        .route(
            "/api/v1/prevalidations/:id/approve",
            post(approve_prevalidation_handler::<S>),
        )
        .route(
            "/api/v1/prevalidations/:id/reject",
            post(reject_prevalidation_handler::<S>),
        )
        .route("/api/v1/dp2001", post(create_action_request_handler::<S>))
        .route("/api/v1/dp2001/:id", get(get_action_request_handler::<S>))
        .route(
            "/api/v1/dp2001/:id/advance",
            post(advance_action_request_handler::<S>),
        )
        .route("/api/v1/audit-log", get(audit_log_handler::<S>))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
pub struct CreatePreValidationRequest {
    pub employee_id: EmployeeId,
    pub action_type: ActionType,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateDp2001Request {
    pub employee_id: EmployeeId,
    pub prevalidation_id: PreValidationId,
    pub action_type: ActionType,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Wire form of an advance request. `submitted` is deliberately absent; no
/// edge leads back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvanceTarget {
    Processing,
    Completed,
    Rejected,
}

impl From<AdvanceTarget> for ActionRequestStatus {
    fn from(value: AdvanceTarget) -> Self {
        match value {
            AdvanceTarget::Processing => Self::Processing,
            AdvanceTarget::Completed => Self::Completed,
            AdvanceTarget::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdvanceDp2001Request {
    pub target_status: AdvanceTarget,
}

pub(crate) fn error_response(err: WorkflowError) -> Response {
    let status = match &err {
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::InvalidTransition { .. } | WorkflowError::Conflict => StatusCode::CONFLICT,
        WorkflowError::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
        WorkflowError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn caller(principal: Option<Extension<Principal>>) -> Principal {
    principal.map_or_else(Principal::anonymous, |Extension(principal)| principal)
}

pub(crate) async fn create_prevalidation_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    principal: Option<Extension<Principal>>,
    axum::Json(payload): axum::Json<CreatePreValidationRequest>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    let principal = caller(principal);
    match engine.create_prevalidation(
        &principal,
        payload.employee_id,
        payload.action_type,
        payload.comments,
    ) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_prevalidation_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    Path(id): Path<u64>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    match engine.prevalidation(PreValidationId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn approve_prevalidation_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<u64>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    let principal = caller(principal);
    match engine.approve_prevalidation(&principal, PreValidationId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn reject_prevalidation_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<u64>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    let principal = caller(principal);
    match engine.reject_prevalidation(&principal, PreValidationId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_action_request_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    principal: Option<Extension<Principal>>,
    axum::Json(payload): axum::Json<CreateDp2001Request>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    let principal = caller(principal);
    match engine.create_action_request(
        &principal,
        payload.employee_id,
        payload.prevalidation_id,
        payload.action_type,
        payload.comments,
    ) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_action_request_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    Path(id): Path<u64>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    match engine.action_request(ActionRequestId(id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn advance_action_request_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
    principal: Option<Extension<Principal>>,
    Path(id): Path<u64>,
    axum::Json(payload): axum::Json<AdvanceDp2001Request>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    let principal = caller(principal);
    match engine.advance_action_request(
        &principal,
        ActionRequestId(id),
        payload.target_status.into(),
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn audit_log_handler<S>(
    State(engine): State<Arc<WorkflowEngine<S>>>,
) -> Response
where
    S: WorkflowStore + 'static,
{
    match engine.audit_log() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(err) => error_response(err),
    }
}
