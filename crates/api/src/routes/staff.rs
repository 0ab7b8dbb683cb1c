//! Staff login and staff account administration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use plantara_core::{
    auth::{Role, hash_password, verify_against_dummy, verify_password},
    validation,
};
use plantara_db::repositories::{CreateStaffInput, StaffAccount, StaffRepository, UpdateStaffInput};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::{AuthResponse, WelcomeMail, non_blank, normalize_email, patch_text, spawn_welcome};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiPath, ApiQuery, Pagination, ValidJson},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

/// Creates the staff routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/staff/login", post(login))
        .route("/staff/register", authorize(state, Role::ADMIN, post(register)))
        .route("/staff", authorize(state, Role::ADMIN, get(list_staff)))
        .route("/staff/me", authorize(state, Role::STAFF_OR_ADMIN, get(me)))
        .route(
            "/staff/password",
            authorize(state, Role::STAFF_OR_ADMIN, put(change_password)),
        )
        .route(
            "/staff/{id}",
            authorize(
                state,
                Role::ADMIN,
                get(get_staff).put(update_staff).delete(delete_staff),
            ),
        )
}

/// Request body for staff login.
#[derive(Debug, Deserialize, Validate)]
pub struct StaffLoginRequest {
    /// Login name.
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for creating a staff member.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStaffRequest {
    /// Full name.
    pub full_name: String,
    /// Login name.
    pub username: String,
    /// Email address.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Initial password, mailed to the new staff member.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// Role to assign.
    pub role_id: i32,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Patch for a staff member.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStaffRequest {
    /// Full name.
    pub full_name: Option<String>,
    /// Email address.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    /// Role to assign.
    pub role_id: Option<i32>,
    /// Contact phone; blank clears it.
    pub phone: Option<String>,
}

/// Request body for a password change.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Password currently on the account.
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// Replacement password.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// POST `/staff/login` - Exchange username and password for a session token.
async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<StaffLoginRequest>,
) -> ApiResult<Json<AuthResponse<StaffAccount>>> {
    let username = req.username.trim();
    let Some(account) = StaffRepository::new(state.conn())
        .find_by_username(username)
        .await?
    else {
        verify_against_dummy(&req.password);
        warn!(username = %username, "Login attempt for unknown staff member");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&req.password, &account.staff.password_hash)? {
        warn!(staff_id = %account.staff.id, "Failed staff login - invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let role = account.session_role();
    let issued = state.jwt_service.issue(account.staff.id, role.as_str())?;
    info!(staff_id = %account.staff.id, role = %role, "Staff member logged in");

    Ok(Json(AuthResponse {
        success: true,
        token: issued.token,
        role: Some(role.as_str()),
        user: account,
        expires_in: issued.expires_in,
    }))
}

/// POST `/staff/register` - Create a staff member.
async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<RegisterStaffRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<StaffAccount>>)> {
    let full_name = req.full_name.trim().to_string();
    validation::validate_full_name(&full_name)?;
    let username = req.username.trim().to_string();
    validation::validate_username(&username)?;
    let phone = non_blank(req.phone);
    if let Some(phone) = &phone {
        validation::validate_phone(phone)?;
    }

    let password_hash = hash_password(&req.password)?;
    let account = StaffRepository::new(state.conn())
        .create(CreateStaffInput {
            full_name,
            username,
            email: normalize_email(&req.email),
            password_hash,
            role_id: req.role_id,
            phone,
        })
        .await?;
    info!(
        staff_id = %account.staff.id,
        role = %account.role_name,
        created_by = %auth.id(),
        "Staff member registered"
    );

    spawn_welcome(
        &state,
        WelcomeMail {
            email: account.staff.email.clone(),
            full_name: account.staff.full_name.clone(),
            username: Some(account.staff.username.clone()),
            initial_password: Some(req.password),
        },
    );

    Ok(response::created(account))
}

/// GET `/staff` - List staff members.
async fn list_staff(
    State(state): State<AppState>,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<StaffAccount>>> {
    let members = StaffRepository::new(state.conn()).list(&page).await?;
    Ok(response::page(members))
}

/// GET `/staff/me` - The caller's own staff record.
async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<StaffAccount>>> {
    find_staff(&state, auth.id()).await.map(response::ok)
}

/// PUT `/staff/password` - Change the caller's password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    let account = find_staff(&state, auth.id()).await?;

    if !verify_password(&req.current_password, &account.staff.password_hash)? {
        warn!(staff_id = %auth.id(), "Password change rejected - wrong current password");
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let password_hash = hash_password(&req.new_password)?;
    StaffRepository::new(state.conn())
        .update_password(auth.id(), &password_hash)
        .await?;
    info!(staff_id = %auth.id(), "Staff password changed");
    Ok(response::message("Password updated successfully"))
}

/// GET `/staff/{id}` - Get one staff member.
async fn get_staff(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<StaffAccount>>> {
    find_staff(&state, id).await.map(response::ok)
}

/// PUT `/staff/{id}` - Update a staff member.
async fn update_staff(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateStaffRequest>,
) -> ApiResult<Json<Envelope<StaffAccount>>> {
    let full_name = req.full_name.map(|n| n.trim().to_string());
    if let Some(name) = &full_name {
        validation::validate_full_name(name)?;
    }
    let phone = patch_text(req.phone);
    if let Some(Some(phone)) = &phone {
        validation::validate_phone(phone)?;
    }

    let account = StaffRepository::new(state.conn())
        .update(
            id,
            UpdateStaffInput {
                full_name,
                email: req.email.as_deref().map(normalize_email),
                role_id: req.role_id,
                phone,
            },
        )
        .await?;
    info!(staff_id = %id, "Staff member updated");
    Ok(response::ok(account))
}

/// DELETE `/staff/{id}` - Delete a staff member; their projects become unassigned.
async fn delete_staff(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    StaffRepository::new(state.conn()).delete(id).await?;
    info!(staff_id = %id, deleted_by = %auth.id(), "Staff member deleted");
    Ok(response::message("Staff member deleted successfully"))
}

async fn find_staff(state: &AppState, id: Uuid) -> ApiResult<StaffAccount> {
    StaffRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_staff_cannot_register_staff() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let body = json!({
            "full_name": "Kamal Silva",
            "username": "kamal",
            "email": "kamal@example.com",
            "password": "secret123",
            "role_id": 2,
        });
        let response = send(app(&state), "POST", "/api/staff/register", Some(&staff), Some(body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_customer_cannot_call_staff_me() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let response = send(app(&state), "GET", "/api/staff/me", Some(&customer), None).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_username() {
        let state = state();
        let admin = token(&state, Role::Admin);
        let body = json!({
            "full_name": "Kamal Silva",
            "username": "k m",
            "email": "kamal@example.com",
            "password": "secret123",
            "role_id": 2,
        });
        let response = send(app(&state), "POST", "/api/staff/register", Some(&admin), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_login_requires_username() {
        let state = state();
        let body = json!({ "username": "", "password": "secret123" });
        let response = send(app(&state), "POST", "/api/staff/login", None, Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Username is required");
    }
}
