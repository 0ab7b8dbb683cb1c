//! Project progress routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use plantara_core::{auth::Role, validation};
use plantara_db::{
    entities::progress_updates,
    repositories::{CreateProgressInput, ProgressRepository, ProjectRepository},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath},
    middleware::{AuthUser, authorize},
    response::{self, Envelope},
};

const MAX_DESCRIPTION_LEN: usize = 2000;

/// Creates the progress routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/progress",
            authorize(state, Role::STAFF_OR_ADMIN, post(create_progress)),
        )
        .route(
            "/progress/project/{project_id}",
            authorize(state, Role::ALL, get(list_progress)),
        )
        .route(
            "/progress/{id}",
            authorize(state, Role::ADMIN, delete(delete_progress)),
        )
}

/// Request body for a progress entry.
#[derive(Debug, Deserialize)]
pub struct CreateProgressRequest {
    /// Project the entry belongs to.
    pub project_id: Uuid,
    /// What happened.
    pub description: String,
    /// Day the work was done; defaults to today.
    pub progress_date: Option<NaiveDate>,
}

/// POST `/progress` - Record progress on a project.
async fn create_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateProgressRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<progress_updates::Model>>)> {
    let description =
        validation::require_text("description", &req.description, MAX_DESCRIPTION_LEN)?;

    let entry = ProgressRepository::new(state.conn())
        .create(CreateProgressInput {
            project_id: req.project_id,
            description: description.to_string(),
            progress_date: req.progress_date,
            created_by: Some(auth.id()),
        })
        .await?;
    info!(progress_id = %entry.id, project_id = %entry.project_id, "Progress recorded");
    Ok(response::created(entry))
}

/// GET `/progress/project/{project_id}` - Progress for a project, newest first.
///
/// Customers may only read progress on projects built from their proposals.
async fn list_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(project_id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<Vec<progress_updates::Model>>>> {
    let owner = ProjectRepository::new(state.conn())
        .owner_of(project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;
    auth.ensure_can_view_customer(owner)?;

    let entries = ProgressRepository::new(state.conn())
        .list_for_project(project_id)
        .await?;
    Ok(response::ok(entries))
}

/// DELETE `/progress/{id}` - Delete a progress entry.
async fn delete_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    ProgressRepository::new(state.conn()).delete(id).await?;
    info!(progress_id = %id, deleted_by = %auth.id(), "Progress entry deleted");
    Ok(response::message("Progress entry deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_customer_cannot_record_progress() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let body = json!({ "project_id": Uuid::new_v4(), "description": "Planted 200 seedlings" });
        let response = send(app(&state), "POST", "/api/progress", Some(&customer), Some(body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_blank_description_rejected() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let body = json!({ "project_id": Uuid::new_v4(), "description": "  " });
        let response = send(app(&state), "POST", "/api/progress", Some(&staff), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_bad_project_id_rejected() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let response = send(
            app(&state),
            "GET",
            "/api/progress/project/not-a-uuid",
            Some(&customer),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
