//! HTTP request handlers for the payroll run engine API.
//!
//! Every write endpoint resolves the caller's role set from the
//! `x-actor-id` header through the role directory and fails closed with
//! 403 when the set is empty or absent. All transitions go through
//! [`RunStore::transition`], so each request is one atomic
//! read-check-write against the run.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::aggregation::compute_draft;
use crate::engine::gate::{phase0_gate, phase1_satisfied, require_phase0, GateResult};
use crate::engine::payslips::{derive_payslips, SkippedEmployee};
use crate::engine::{approval, state_machine};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApprovalStage, PayPeriod, PayrollEmployeeLine, PayrollRun, Payslip, PreRunEvent, Role,
    RunAction,
};
use crate::store::TransitionEffect;

use super::request::{
    CreateEventRequest, CreateRunRequest, EditEventRequest, PayslipQuery, RejectPeriodRequest,
    TransitionRequest, UnfreezeRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Response body for `POST /payroll-runs/{id}/validate-phase0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCheckResponse {
    /// The gate evaluation that allowed the validation.
    pub gate: GateResult,
    /// The updated run.
    pub run: PayrollRun,
}

/// Response body for `POST /payroll-runs/{id}/generate-payslips`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipGenerationResponse {
    /// The run after the (state-preserving) transition.
    pub run: PayrollRun,
    /// Number of payslips written (created or replaced).
    pub written: u32,
    /// Employees skipped as non-fatal warnings.
    pub skipped: Vec<SkippedEmployee>,
}

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll-runs", post(create_run))
        .route("/payroll-runs/:id", get(get_run))
        .route("/payroll-runs/:id/employees", get(get_run_employees))
        .route("/payroll-runs/:id/validate-phase0", post(validate_phase0))
        .route("/payroll-runs/:id/approve-period", post(approve_period))
        .route("/payroll-runs/:id/reject-period", post(reject_period))
        .route("/payroll-runs/:id/start-initiation", post(start_initiation))
        .route("/payroll-runs/:id/generate-draft", post(generate_draft))
        .route("/payroll-runs/:id/send-for-approval", post(send_for_approval))
        .route("/payroll-runs/:id/manager-approve", post(manager_approve))
        .route("/payroll-runs/:id/finance-approve", post(finance_approve))
        .route("/payroll-runs/:id/lock", post(lock_run))
        .route("/payroll-runs/:id/unfreeze", post(unfreeze_run))
        .route("/payroll-runs/:id/generate-payslips", post(generate_payslips))
        .route("/pre-run-events", post(create_event))
        .route("/pre-run-events/:id/edit", post(edit_event))
        .route("/pre-run-events/:id/approve", post(approve_event))
        .route("/pre-run-events/:id/reject", post(reject_event))
        .route("/payslips", get(list_payslips))
        .with_state(state)
}

/// Resolves the caller's identity and role set, failing closed.
fn actor(state: &AppState, headers: &HeaderMap) -> Result<(String, HashSet<Role>), ApiErrorResponse> {
    let actor_id = headers
        .get("x-actor-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::forbidden("missing caller identity (x-actor-id header)"),
        })?;
    let roles = state.roles().roles_of(&actor_id);
    if roles.is_empty() {
        warn!(actor_id = %actor_id, "Caller has no assigned roles");
        return Err(ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::forbidden(format!("actor '{actor_id}' has no assigned roles")),
        });
    }
    Ok((actor_id, roles))
}

/// Unwraps a mandatory JSON body, mapping rejections the way the request
/// deserves: missing fields are validation errors, broken JSON is malformed.
fn required_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    ApiError::malformed_json(format!("Invalid JSON syntax: {err}"))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MissingContentType", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error,
            })
        }
    }
}

/// Unwraps an optional JSON body: omitting the body entirely is the same
/// as sending `{}`.
fn optional_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiErrorResponse> {
    match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        other => required_body(other),
    }
}

/// Runs one atomic transition against a run and maps the error.
fn run_transition<F>(
    state: &AppState,
    run_id: Uuid,
    action: RunAction,
    roles: &HashSet<Role>,
    expected_version: Option<u64>,
    mutate: F,
) -> Result<PayrollRun, ApiErrorResponse>
where
    F: FnOnce(&mut PayrollRun) -> EngineResult<TransitionEffect>,
{
    state
        .runs()
        .transition(run_id, action, roles, expected_version, mutate)
        .map_err(Into::into)
}

// ---------------------------------------------------------------------------
// Payroll run endpoints
// ---------------------------------------------------------------------------

async fn create_run(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let (actor_id, roles) = actor(&state, &headers)?;
    let request = required_body(payload)?;

    state_machine::authorize(RunAction::CreateRun, &roles).map_err(ApiErrorResponse::from)?;

    let period = PayPeriod::new(request.entity, request.period_end);
    let run = state.runs().create(period, &actor_id)?;
    info!(
        correlation_id = %correlation_id,
        run_id = %run.id,
        entity = %run.period.entity,
        period_end = %run.period.period_end,
        "Payroll run created"
    );
    Ok((StatusCode::CREATED, Json(run)))
}

async fn get_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    Ok(Json(state.runs().get(run_id)?))
}

async fn get_run_employees(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<Vec<PayrollEmployeeLine>>, ApiErrorResponse> {
    Ok(Json(state.runs().lines(run_id)?))
}

async fn validate_phase0(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<GateCheckResponse>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;

    // Gate evaluation happens inside the transition so the answer reflects
    // the register at commit time, not at request-parse time.
    let mut gate_seen: Option<GateResult> = None;
    let run = run_transition(
        &state,
        run_id,
        RunAction::ValidatePhase0,
        &roles,
        request.expected_version,
        |working| {
            let events = state.events().in_scope(&working.period);
            let gate = phase0_gate(&events);
            let check = require_phase0(&gate);
            gate_seen = Some(gate);
            check?;
            Ok(TransitionEffect::None)
        },
    )
    .map_err(|err| {
        warn!(correlation_id = %correlation_id, run_id = %run_id, error = %err.error.message, "Phase 0 validation rejected");
        err
    })?;

    let gate = gate_seen.unwrap_or_else(|| phase0_gate(&[]));
    info!(correlation_id = %correlation_id, run_id = %run_id, "Phase 0 validated");
    Ok(Json(GateCheckResponse { gate, run }))
}

async fn approve_period(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::ApprovePeriod,
        &roles,
        request.expected_version,
        |_| Ok(TransitionEffect::None),
    )?;
    info!(run_id = %run_id, "Period approved");
    Ok(Json(run))
}

async fn reject_period(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<RejectPeriodRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let new_period_end = request.new_period_end;
    let run = run_transition(
        &state,
        run_id,
        RunAction::RejectPeriod,
        &roles,
        request.expected_version,
        move |working| {
            if let Some(period_end) = new_period_end {
                working.period = PayPeriod::new(working.period.entity.clone(), period_end);
            }
            working.approvals.clear();
            Ok(TransitionEffect::None)
        },
    )?;
    info!(run_id = %run_id, period_end = %run.period.period_end, "Period rejected and reset");
    Ok(Json(run))
}

async fn start_initiation(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::StartInitiation,
        &roles,
        request.expected_version,
        |_| Ok(TransitionEffect::None),
    )?;
    info!(run_id = %run_id, "Run initiated");
    Ok(Json(run))
}

async fn generate_draft(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;

    // Aggregation runs off the critical path: roster fetch and computation
    // happen before the store lock is taken, and a fetch failure leaves the
    // run untouched. The computed line set is swapped in whole.
    let snapshot = state.runs().get(run_id)?;
    let roster = state.roster().roster(&snapshot.period.entity)?;
    let events = state.events().in_scope(&snapshot.period);
    let draft = compute_draft(snapshot.id, &snapshot.period, &roster, &events);

    let run = run_transition(
        &state,
        run_id,
        RunAction::GenerateDraft,
        &roles,
        request.expected_version,
        move |working| {
            // Recomputed at commit time like every gate, even though the
            // transition table already confines this action to post-approval
            // statuses.
            if !phase1_satisfied(working.status) {
                return Err(EngineError::GateNotSatisfied {
                    condition: "pay period has not been approved".to_string(),
                });
            }
            working.totals = draft.totals;
            Ok(TransitionEffect::ReplaceLines(draft.lines))
        },
    )?;
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        employee_count = run.totals.employee_count,
        exception_count = run.totals.exception_count,
        total_net_pay = %run.totals.total_net_pay,
        "Draft generated"
    );
    Ok(Json(run))
}

async fn send_for_approval(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::SendForApproval,
        &roles,
        request.expected_version,
        |_| Ok(TransitionEffect::None),
    )?;
    info!(run_id = %run_id, "Draft sent for approval");
    Ok(Json(run))
}

async fn manager_approve(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (actor_id, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::ManagerApprove,
        &roles,
        request.expected_version,
        move |working| {
            approval::grant(working, ApprovalStage::Manager, actor_id)?;
            Ok(TransitionEffect::None)
        },
    )?;
    info!(run_id = %run_id, "Manager approval granted");
    Ok(Json(run))
}

async fn finance_approve(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (actor_id, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::FinanceApprove,
        &roles,
        request.expected_version,
        move |working| {
            approval::grant(working, ApprovalStage::Finance, actor_id)?;
            Ok(TransitionEffect::None)
        },
    )?;
    info!(run_id = %run_id, "Finance approval granted");
    Ok(Json(run))
}

async fn lock_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;
    let run = run_transition(
        &state,
        run_id,
        RunAction::Lock,
        &roles,
        request.expected_version,
        |_| Ok(TransitionEffect::None),
    )?;
    info!(run_id = %run_id, version = run.version, "Run locked");
    Ok(Json(run))
}

async fn unfreeze_run(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<UnfreezeRequest>, JsonRejection>,
) -> Result<Json<PayrollRun>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let (actor_id, roles) = actor(&state, &headers)?;
    let request = required_body(payload)?;

    if request.reason.trim().len() < state.policy().min_unfreeze_reason_len {
        return Err(EngineError::ValidationError {
            message: "unfreeze requires a non-empty reason".to_string(),
        }
        .into());
    }

    let reason = request.reason;
    let run = run_transition(
        &state,
        run_id,
        RunAction::Unfreeze,
        &roles,
        request.expected_version,
        move |working| {
            approval::unfreeze(working, actor_id, &reason)?;
            Ok(TransitionEffect::None)
        },
    )?;
    warn!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        reason = %run.unfreezes.last().map(|u| u.reason.as_str()).unwrap_or_default(),
        "Locked run unfrozen; manager and finance approvals reset"
    );
    Ok(Json(run))
}

async fn generate_payslips(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<PayslipGenerationResponse>, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    let (_, roles) = actor(&state, &headers)?;
    let request = optional_body(payload)?;

    let snapshot = state.runs().get(run_id)?;
    let lines = state.runs().lines(run_id)?;
    let (payslips, skipped) = derive_payslips(&snapshot, &lines)?;

    // CAS against the snapshot version so a racing unfreeze cannot slip
    // between derivation and commit.
    let expected = request.expected_version.unwrap_or(snapshot.version);
    let run = run_transition(
        &state,
        run_id,
        RunAction::GeneratePayslips,
        &roles,
        Some(expected),
        |_| Ok(TransitionEffect::None),
    )?;
    let written = state.payslips().upsert_batch(payslips);
    info!(
        correlation_id = %correlation_id,
        run_id = %run_id,
        written,
        skipped = skipped.len(),
        "Payslips generated"
    );
    Ok(Json(PayslipGenerationResponse { run, written, skipped }))
}

// ---------------------------------------------------------------------------
// Pre-run event endpoints
// ---------------------------------------------------------------------------

async fn create_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = required_body(payload)?;

    if !roles.contains(&Role::PayrollSpecialist) {
        return Err(ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::forbidden(
                "recording pre-run events requires role 'payroll_specialist'",
            ),
        });
    }

    let period = PayPeriod::new(request.entity, request.period_end);
    let event = state.events().create(
        request.kind,
        &request.employee_id,
        &period,
        request.amount,
    )?;
    info!(
        event_id = %event.id,
        employee_id = %event.employee_id,
        amount = %event.declared_amount,
        "Pre-run event recorded"
    );
    Ok((StatusCode::CREATED, Json(event)))
}

async fn edit_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
    payload: Result<Json<EditEventRequest>, JsonRejection>,
) -> Result<Json<PreRunEvent>, ApiErrorResponse> {
    let (_, roles) = actor(&state, &headers)?;
    let request = required_body(payload)?;

    if !roles.contains(&Role::PayrollSpecialist) {
        return Err(ApiErrorResponse {
            status: StatusCode::FORBIDDEN,
            error: ApiError::forbidden(
                "editing pre-run events requires role 'payroll_specialist'",
            ),
        });
    }

    let event = state.events().edit_amount(event_id, request.given_amount)?;
    info!(event_id = %event.id, given_amount = %event.given_amount, "Pre-run event amount updated");
    Ok(Json(event))
}

async fn approve_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<PreRunEvent>, ApiErrorResponse> {
    adjudicate_event(state, event_id, headers, true)
}

async fn reject_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<PreRunEvent>, ApiErrorResponse> {
    adjudicate_event(state, event_id, headers, false)
}

fn adjudicate_event(
    state: AppState,
    event_id: Uuid,
    headers: HeaderMap,
    approve: bool,
) -> Result<Json<PreRunEvent>, ApiErrorResponse> {
    let (actor_id, roles) = actor(&state, &headers)?;
    if !state.policy().may_adjudicate_events(&roles) {
        return Err(EngineError::EventRoleNotAuthorized.into());
    }

    let event = state.events().adjudicate(event_id, approve, &actor_id)?;
    info!(
        event_id = %event.id,
        status = %event.status,
        adjudicated_by = %actor_id,
        "Pre-run event adjudicated"
    );
    Ok(Json(event))
}

// ---------------------------------------------------------------------------
// Payslip endpoints
// ---------------------------------------------------------------------------

async fn list_payslips(
    State(state): State<AppState>,
    Query(query): Query<PayslipQuery>,
) -> Result<Json<Vec<Payslip>>, ApiErrorResponse> {
    // Listing for an unknown run yields an empty list rather than a 404;
    // payslips only ever exist for runs that reached lock.
    Ok(Json(state.payslips().for_run(query.run_id)))
}
