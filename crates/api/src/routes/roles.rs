//! Staff role routes.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use plantara_core::{auth::Role, validation};
use plantara_db::{entities::roles, repositories::RoleRepository};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    AppState,
    error::ApiResult,
    extractors::ValidJson,
    middleware::authorize,
    response::{self, Envelope},
};

const MAX_ROLE_NAME_LEN: usize = 50;

/// Creates the role routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new().route(
        "/role",
        authorize(state, Role::ADMIN, get(list_roles).post(create_role)),
    )
}

/// Request body for creating a role.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name, unique ignoring case.
    pub name: String,
}

/// GET `/role` - List roles.
async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<roles::Model>>>> {
    let roles = RoleRepository::new(state.conn()).list().await?;
    Ok(response::ok(roles))
}

/// POST `/role` - Create a role.
async fn create_role(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<roles::Model>>)> {
    let name = validation::require_text("name", &req.name, MAX_ROLE_NAME_LEN)?;
    let role = RoleRepository::new(state.conn()).create(name).await?;
    info!(role_id = role.id, name = %role.name, "Role created");
    Ok(response::created(role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_roles_are_admin_only() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let response = send(app(&state), "GET", "/api/role", Some(&staff), None).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_blank_role_name_rejected() {
        let state = state();
        let admin = token(&state, Role::Admin);
        let body = json!({ "name": "   " });
        let response = send(app(&state), "POST", "/api/role", Some(&admin), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }
}
