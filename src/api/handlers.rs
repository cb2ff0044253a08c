//! HTTP request handlers for the payroll API.
//!
//! Handlers are thin: they parse the request, delegate to
//! [`PayrollService`](crate::service::PayrollService) and map the outcome to
//! a JSON response. Every request is tagged with a correlation id in the logs.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::PayrollPeriod;
use crate::store::{AttendanceQuery, RecordFilter};

use super::request::{
    AssignmentRequest, AttendanceRequest, GeneratePayrollRequest, PaymentRequest,
    TogglePaidRequest,
};
use super::response::{ApiError, ApiErrorResponse, DeletedResponse, HealthResponse};
use super::state::AppState;

/// Both arms are complete responses; the error arm is already logged.
type HandlerResult = Result<Response, Response>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/assignments",
            get(list_assignments_handler).post(create_assignment_handler),
        )
        .route(
            "/attendance",
            get(list_attendance_handler).post(record_attendance_handler),
        )
        .route(
            "/payroll",
            get(list_payroll_handler).post(generate_payroll_handler),
        )
        .route(
            "/payroll/:id",
            get(get_payroll_handler).delete(delete_payroll_handler),
        )
        .route("/social-charges/ledger", get(list_ledger_handler))
        .route(
            "/social-charges/ledger/:id",
            get(get_ledger_entry_handler).patch(toggle_paid_handler),
        )
        .route(
            "/social-charges/payments",
            get(list_payments_handler).post(record_payment_handler),
        )
        .route(
            "/social-charges/payments/:id",
            delete(delete_payment_handler),
        )
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    json_response(
        StatusCode::OK,
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    )
}

/// Handler for GET /assignments.
async fn list_assignments_handler(
    State(state): State<AppState>,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing assignments");

    let filter = parse_filter(correlation_id, query)?;
    let assignments = state
        .service()
        .list_assignments(&filter)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, assignments))
}

/// Handler for POST /assignments.
async fn create_assignment_handler(
    State(state): State<AppState>,
    payload: Result<Json<AssignmentRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Registering assignment");

    let request = parse_json(correlation_id, payload)?;
    let assignment = state
        .service()
        .register_assignment(request.into())
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::CREATED, assignment))
}

/// Handler for GET /attendance.
async fn list_attendance_handler(
    State(state): State<AppState>,
    query: Result<Query<AttendanceQuery>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing attendance");

    let Query(query) = query.map_err(|rejection| query_rejection(correlation_id, rejection))?;
    let records = state
        .service()
        .list_attendance(&query)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, records))
}

/// Handler for POST /attendance.
async fn record_attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Recording attendance");

    let request = parse_json(correlation_id, payload)?;
    let record = state
        .service()
        .record_attendance(request.into())
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::CREATED, record))
}

/// Handler for GET /payroll.
async fn list_payroll_handler(
    State(state): State<AppState>,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing payroll snapshots");

    let filter = parse_filter(correlation_id, query)?;
    let snapshots = state
        .service()
        .list_payroll(&filter)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, snapshots))
}

/// Handler for POST /payroll.
///
/// Runs a batch generation and returns the per-assignment report. Partial
/// failures are reported in the body; the status is 201 as long as the batch
/// ran.
async fn generate_payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayrollRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll generation request");

    let request = parse_json(correlation_id, payload)?;
    let period = PayrollPeriod::new(request.month, request.year)
        .map_err(|err| engine_error(correlation_id, err))?;

    let start_time = Instant::now();
    let report = state
        .service()
        .generate_payroll(&period, &request.scope())
        .map_err(|err| engine_error(correlation_id, err))?;

    info!(
        correlation_id = %correlation_id,
        month = period.month(),
        year = period.year(),
        succeeded = report.succeeded,
        failed = report.failed,
        duration_us = start_time.elapsed().as_micros(),
        "Payroll generation completed"
    );
    Ok(json_response(StatusCode::CREATED, report))
}

/// Handler for GET /payroll/:id.
async fn get_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(correlation_id, id)?;
    info!(correlation_id = %correlation_id, payroll_id = %id, "Fetching payroll snapshot");

    let snapshot = state
        .service()
        .get_payroll(id)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, snapshot))
}

/// Handler for DELETE /payroll/:id.
///
/// Removes the snapshot only; the ledger entry for the period stays.
async fn delete_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(correlation_id, id)?;
    info!(correlation_id = %correlation_id, payroll_id = %id, "Deleting payroll snapshot");

    state
        .service()
        .delete_payroll(id)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(
        StatusCode::OK,
        DeletedResponse { id, deleted: true },
    ))
}

/// Handler for GET /social-charges/ledger.
async fn list_ledger_handler(
    State(state): State<AppState>,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing ledger entries");

    let filter = parse_filter(correlation_id, query)?;
    let entries = state
        .service()
        .list_ledger(&filter)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, entries))
}

/// Handler for GET /social-charges/ledger/:id.
async fn get_ledger_entry_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(correlation_id, id)?;
    info!(correlation_id = %correlation_id, entry_id = %id, "Fetching ledger entry");

    let entry = state
        .service()
        .get_ledger_entry(id)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, entry))
}

/// Handler for PATCH /social-charges/ledger/:id.
async fn toggle_paid_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TogglePaidRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(correlation_id, id)?;
    let request = parse_json(correlation_id, payload)?;
    info!(
        correlation_id = %correlation_id,
        entry_id = %id,
        is_paid = request.is_paid,
        "Toggling ledger entry paid status"
    );

    let outcome = state
        .service()
        .set_paid(id, request.is_paid)
        .map_err(|err| engine_error(correlation_id, err))?;
    if let Some(reason) = &outcome.recalculation_error {
        warn!(
            correlation_id = %correlation_id,
            entry_id = %id,
            error = %reason,
            "Paid status saved but recalculation failed"
        );
    }
    Ok(json_response(StatusCode::OK, outcome))
}

/// Handler for GET /social-charges/payments.
async fn list_payments_handler(
    State(state): State<AppState>,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing payments");

    let filter = parse_filter(correlation_id, query)?;
    let payments = state
        .service()
        .list_payments(&filter)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, payments))
}

/// Handler for POST /social-charges/payments.
async fn record_payment_handler(
    State(state): State<AppState>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Recording payment");

    let request = parse_json(correlation_id, payload)?;
    let outcome = state
        .service()
        .record_payment(request.into())
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::CREATED, outcome))
}

/// Handler for DELETE /social-charges/payments/:id.
async fn delete_payment_handler(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> HandlerResult {
    let correlation_id = Uuid::new_v4();
    let id = parse_id(correlation_id, id)?;
    info!(correlation_id = %correlation_id, payment_id = %id, "Deleting payment");

    let deletion = state
        .service()
        .delete_payment(id)
        .map_err(|err| engine_error(correlation_id, err))?;
    Ok(json_response(StatusCode::OK, deletion))
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(api_error: ApiErrorResponse) -> Response {
    json_response(api_error.status, api_error.error)
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    error_response(err.into())
}

/// Maps a body rejection to an error response.
///
/// Syntax errors are malformed JSON; missing or mistyped fields are
/// validation errors.
fn parse_json<T>(correlation_id: Uuid, payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(error_response(ApiErrorResponse::bad_request(error)))
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid query string"
    );
    error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
        body_text,
    )))
}

fn parse_filter(
    correlation_id: Uuid,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> Result<RecordFilter, Response> {
    let Query(filter) = query.map_err(|rejection| query_rejection(correlation_id, rejection))?;
    if let Some(month) = filter.month {
        if !(1..=12).contains(&month) {
            return Err(engine_error(
                correlation_id,
                EngineError::validation("month", format!("{} is not between 1 and 12", month)),
            ));
        }
    }
    Ok(filter)
}

fn parse_id(correlation_id: Uuid, id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, Response> {
    match id {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            let body_text = rejection.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "Invalid record id"
            );
            Err(error_response(ApiErrorResponse::bad_request(
                ApiError::with_details("VALIDATION_ERROR", "Invalid record id", body_text),
            )))
        }
    }
}
