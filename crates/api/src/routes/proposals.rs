//! Proposal pricing and proposal record routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use plantara_core::{
    auth::Role,
    proposal::{
        PaymentMode, PaymentPlan, PlanError, ProjectType, allowed_durations,
        calculate_installments, parse_amount, parse_years, prepare_proposal,
    },
};
use plantara_db::{entities::proposals, repositories::ProposalRepository};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery, Pagination},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

/// Creates the proposal routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/proposal/durations/{project_type}", get(list_durations))
        .route("/proposal/calculate-installments", post(calculate))
        .route(
            "/proposal",
            authorize(state, Role::CUSTOMER_OR_ADMIN, post(create_proposal))
                .merge(authorize(state, Role::ALL, get(list_proposals))),
        )
        .route(
            "/proposal/{id}",
            authorize(state, Role::ALL, get(get_proposal))
                .merge(authorize(state, Role::ADMIN, delete(delete_proposal))),
        )
}

/// Calculator input. Numbers may arrive as JSON numbers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Project value.
    pub project_value: Option<Value>,
    /// Duration in years.
    pub project_duration: Option<Value>,
    /// `full` or `installments`.
    pub payment_mode: Option<Value>,
}

/// Request body for creating a proposal.
#[derive(Debug, Deserialize)]
pub struct CreateProposalRequest {
    /// Owning customer. Customers may omit it; administrators must supply it.
    pub customer_id: Option<Uuid>,
    /// Project type name.
    pub project_type: String,
    /// Duration in years.
    pub project_duration: Value,
    /// Project value.
    pub project_value: Value,
    /// `full` or `installments`.
    pub payment_mode: String,
}

fn read_plan_inputs(
    value: Option<&Value>,
    duration: Option<&Value>,
    mode: Option<&Value>,
) -> Result<(rust_decimal::Decimal, u32, PaymentMode), PlanError> {
    let value = value.and_then(parse_amount).ok_or(PlanError::InvalidValue)?;
    let years = duration
        .and_then(parse_years)
        .ok_or(PlanError::InvalidDuration)?;
    let mode = mode
        .and_then(Value::as_str)
        .ok_or(PlanError::InvalidPaymentMode)?
        .parse()?;
    Ok((value, years, mode))
}

/// GET `/proposal/durations/{project_type}` - Durations offered for a project type.
async fn list_durations(
    ApiPath(project_type): ApiPath<String>,
) -> Json<Envelope<&'static [u32]>> {
    response::ok(allowed_durations(ProjectType::parse_lenient(&project_type)))
}

/// POST `/proposal/calculate-installments` - Price a project under a payment mode.
async fn calculate(ApiJson(req): ApiJson<CalculateRequest>) -> ApiResult<Json<Envelope<PaymentPlan>>> {
    let (value, years, mode) = read_plan_inputs(
        req.project_value.as_ref(),
        req.project_duration.as_ref(),
        req.payment_mode.as_ref(),
    )?;
    let plan = calculate_installments(value, years, mode)?;
    Ok(response::ok(plan))
}

/// POST `/proposal` - Create a proposal with its computed payment plan.
async fn create_proposal(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateProposalRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<proposals::Model>>)> {
    let customer_id = if auth.is_customer() {
        let own = auth.id();
        if req.customer_id.is_some_and(|id| id != own) {
            return Err(ApiError::forbidden("Access denied"));
        }
        own
    } else {
        req.customer_id
            .ok_or_else(|| ApiError::validation("customer_id is required"))?
    };

    let project_type: ProjectType = req.project_type.parse()?;
    let payment_mode = Value::String(req.payment_mode);
    let (value, years, mode) = read_plan_inputs(
        Some(&req.project_value),
        Some(&req.project_duration),
        Some(&payment_mode),
    )?;
    let prepared = prepare_proposal(project_type, years, value, mode)?;

    let proposal = ProposalRepository::new(state.conn())
        .create(customer_id, &prepared)
        .await?;
    info!(
        proposal_id = %proposal.id,
        customer_id = %customer_id,
        project_type = %project_type,
        "Proposal created"
    );
    Ok(response::created(proposal))
}

/// GET `/proposal` - List proposals; customers see only their own.
async fn list_proposals(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<proposals::Model>>> {
    let owner = auth.is_customer().then(|| auth.id());
    let proposals = ProposalRepository::new(state.conn())
        .list(owner, &page)
        .await?;
    Ok(response::page(proposals))
}

/// GET `/proposal/{id}` - Get one proposal.
async fn get_proposal(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Envelope<proposals::Model>>> {
    let proposal = ProposalRepository::new(state.conn())
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Proposal not found"))?;
    auth.ensure_can_view_customer(proposal.customer_id)?;
    Ok(response::ok(proposal))
}

/// DELETE `/proposal/{id}` - Delete a proposal and its project.
async fn delete_proposal(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Value>> {
    ProposalRepository::new(state.conn()).delete(&id).await?;
    info!(proposal_id = %id, deleted_by = %auth.id(), "Proposal deleted");
    Ok(response::message("Proposal deleted successfully"))
}
