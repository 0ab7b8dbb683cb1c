//! Project routes.
//!
//! Administrators manage every project. Staff see and update only the
//! projects assigned to them and cannot reassign them.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use plantara_core::{auth::Role, project::ProjectStatus};
use plantara_db::{
    entities::projects,
    repositories::{CreateProjectInput, ProjectRepository, UpdateProjectInput},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::nullable;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery, Pagination},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

/// Creates the project routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/project",
            authorize(state, Role::ADMIN, post(create_project))
                .merge(authorize(state, Role::STAFF_OR_ADMIN, get(list_projects))),
        )
        .route(
            "/project/{id}",
            authorize(
                state,
                Role::STAFF_OR_ADMIN,
                get(get_project).put(update_project),
            )
            .merge(authorize(state, Role::ADMIN, delete(delete_project))),
        )
}

/// Request body for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Proposal the project carries out.
    pub proposal_id: String,
    /// Assigned staff member.
    pub staff_id: Option<Uuid>,
    /// Initial status; defaults to Pending.
    pub status: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

/// Patch for a project. `null` clears a nullable field.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// Assigned staff member.
    #[serde(default, deserialize_with = "nullable")]
    pub staff_id: Option<Option<Uuid>>,
    /// New status.
    pub status: Option<String>,
    /// Start date.
    #[serde(default, deserialize_with = "nullable")]
    pub start_date: Option<Option<NaiveDate>>,
    /// End date.
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
}

fn parse_status(raw: Option<&str>) -> ApiResult<Option<ProjectStatus>> {
    Ok(raw.map(str::parse).transpose()?)
}

/// Staff may only touch projects assigned to them.
fn ensure_assigned(auth: &AuthUser, project: &projects::Model) -> ApiResult<()> {
    if auth.role() == Role::Staff && project.staff_id != Some(auth.id()) {
        return Err(ApiError::forbidden("Access denied"));
    }
    Ok(())
}

/// POST `/project` - Start a project for a proposal.
async fn create_project(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<projects::Model>>)> {
    let proposal_id = req.proposal_id.trim().to_string();
    if proposal_id.is_empty() {
        return Err(ApiError::validation("proposal_id is required"));
    }

    let project = ProjectRepository::new(state.conn())
        .create(CreateProjectInput {
            proposal_id,
            staff_id: req.staff_id,
            status: parse_status(req.status.as_deref())?,
            start_date: req.start_date,
            end_date: req.end_date,
        })
        .await?;
    info!(project_id = %project.id, proposal_id = %project.proposal_id, "Project created");
    Ok(response::created(project))
}

/// GET `/project` - List projects; staff see only their assignments.
async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<projects::Model>>> {
    let assignee = (auth.role() == Role::Staff).then(|| auth.id());
    let projects = ProjectRepository::new(state.conn())
        .list(assignee, &page)
        .await?;
    Ok(response::page(projects))
}

/// GET `/project/{id}` - Get one project.
async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<projects::Model>>> {
    let project = find_project(&state, id).await?;
    ensure_assigned(&auth, &project)?;
    Ok(response::ok(project))
}

/// PUT `/project/{id}` - Update assignment, status or dates.
async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> ApiResult<Json<Envelope<projects::Model>>> {
    let repo = ProjectRepository::new(state.conn());
    if auth.role() == Role::Staff {
        let project = find_project(&state, id).await?;
        ensure_assigned(&auth, &project)?;
        if req.staff_id.is_some() {
            return Err(ApiError::forbidden("Only an administrator can reassign a project"));
        }
    }

    let project = repo
        .update(
            id,
            UpdateProjectInput {
                staff_id: req.staff_id,
                status: parse_status(req.status.as_deref())?,
                start_date: req.start_date,
                end_date: req.end_date,
            },
        )
        .await?;
    info!(project_id = %id, status = ?project.status, updated_by = %auth.id(), "Project updated");
    Ok(response::ok(project))
}

/// DELETE `/project/{id}` - Delete a project and its progress entries.
async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    ProjectRepository::new(state.conn()).delete(id).await?;
    info!(project_id = %id, deleted_by = %auth.id(), "Project deleted");
    Ok(response::message("Project deleted successfully"))
}

async fn find_project(state: &AppState, id: Uuid) -> ApiResult<projects::Model> {
    ProjectRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))
}
