//! Customer registration, login and account management routes.

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
use plantara_db::{
    entities::customers,
    repositories::{CreateCustomerInput, CustomerRepository, UpdateCustomerInput},
};
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

/// Creates the customer routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/customer/register", post(register))
        .route("/customer/login", post(login))
        .route(
            "/customer/profile",
            authorize(state, Role::CUSTOMER, get(get_profile).put(update_profile)),
        )
        .route(
            "/customer/password",
            authorize(state, Role::CUSTOMER, put(change_password)),
        )
        .route(
            "/customer",
            authorize(state, Role::STAFF_OR_ADMIN, get(list_customers)),
        )
        .route(
            "/customer/{id}",
            authorize(state, Role::STAFF_OR_ADMIN, get(get_customer)).merge(authorize(
                state,
                Role::ADMIN,
                put(update_customer).delete(delete_customer),
            )),
        )
}

/// Request body for customer registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerRequest {
    /// Full name.
    pub full_name: String,
    /// Email address, used to log in.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// Chosen password.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
    /// National identity card number.
    pub nic_number: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Request body for customer login.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerLoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Patch for a customer record. Blank `phone`/`address` clear the field.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    /// Full name.
    pub full_name: Option<String>,
    /// Email address.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    /// National identity card number.
    pub nic_number: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
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

impl UpdateCustomerRequest {
    fn into_input(self) -> ApiResult<UpdateCustomerInput> {
        let full_name = self.full_name.map(|n| n.trim().to_string());
        if let Some(name) = &full_name {
            validation::validate_full_name(name)?;
        }
        let nic_number = self.nic_number.map(|n| n.trim().to_string());
        if let Some(nic) = &nic_number {
            validation::validate_nic(nic)?;
        }
        let phone = patch_text(self.phone);
        if let Some(Some(phone)) = &phone {
            validation::validate_phone(phone)?;
        }

        Ok(UpdateCustomerInput {
            full_name,
            email: self.email.as_deref().map(normalize_email),
            nic_number,
            phone,
            address: patch_text(self.address),
        })
    }
}

/// POST `/customer/register` - Create a customer account and sign it in.
async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterCustomerRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse<customers::Model>>)> {
    let full_name = req.full_name.trim().to_string();
    validation::validate_full_name(&full_name)?;
    let nic_number = req.nic_number.trim().to_string();
    validation::validate_nic(&nic_number)?;
    let phone = non_blank(req.phone);
    if let Some(phone) = &phone {
        validation::validate_phone(phone)?;
    }

    let password_hash = hash_password(&req.password)?;
    let customer = CustomerRepository::new(state.conn())
        .create(CreateCustomerInput {
            full_name,
            email: normalize_email(&req.email),
            password_hash,
            nic_number,
            phone,
            address: non_blank(req.address),
        })
        .await?;

    let issued = state
        .jwt_service
        .issue(customer.id, Role::Customer.as_str())?;
    info!(customer_id = %customer.id, "Customer registered");

    spawn_welcome(
        &state,
        WelcomeMail {
            email: customer.email.clone(),
            full_name: customer.full_name.clone(),
            username: None,
            initial_password: None,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            token: issued.token,
            role: None,
            user: customer,
            expires_in: issued.expires_in,
        }),
    ))
}

/// POST `/customer/login` - Exchange email and password for a session token.
async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CustomerLoginRequest>,
) -> ApiResult<Json<AuthResponse<customers::Model>>> {
    let email = normalize_email(&req.email);
    let Some(customer) = CustomerRepository::new(state.conn())
        .find_by_email(&email)
        .await?
    else {
        verify_against_dummy(&req.password);
        warn!(email = %email, "Login attempt for unknown customer");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&req.password, &customer.password_hash)? {
        warn!(customer_id = %customer.id, "Failed customer login - invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let issued = state
        .jwt_service
        .issue(customer.id, Role::Customer.as_str())?;
    info!(customer_id = %customer.id, "Customer logged in");

    Ok(Json(AuthResponse {
        success: true,
        token: issued.token,
        role: Some(Role::Customer.as_str()),
        user: customer,
        expires_in: issued.expires_in,
    }))
}

/// GET `/customer/profile` - The caller's own record.
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Envelope<customers::Model>>> {
    find_customer(&state, auth.id()).await.map(response::ok)
}

/// PUT `/customer/profile` - Update the caller's own record.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<UpdateCustomerRequest>,
) -> ApiResult<Json<Envelope<customers::Model>>> {
    let customer = CustomerRepository::new(state.conn())
        .update(auth.id(), req.into_input()?)
        .await?;
    info!(customer_id = %customer.id, "Customer profile updated");
    Ok(response::ok(customer))
}

/// PUT `/customer/password` - Change the caller's password.
async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    let repo = CustomerRepository::new(state.conn());
    let customer = find_customer(&state, auth.id()).await?;

    if !verify_password(&req.current_password, &customer.password_hash)? {
        warn!(customer_id = %customer.id, "Password change rejected - wrong current password");
        return Err(ApiError::unauthorized("Current password is incorrect"));
    }

    let password_hash = hash_password(&req.new_password)?;
    repo.update_password(customer.id, &password_hash).await?;
    info!(customer_id = %customer.id, "Customer password changed");
    Ok(response::message("Password updated successfully"))
}

/// GET `/customer` - List customers.
async fn list_customers(
    State(state): State<AppState>,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<customers::Model>>> {
    let customers = CustomerRepository::new(state.conn()).list(&page).await?;
    Ok(response::page(customers))
}

/// GET `/customer/{id}` - Get one customer.
async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<customers::Model>>> {
    find_customer(&state, id).await.map(response::ok)
}

/// PUT `/customer/{id}` - Update a customer.
async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ValidJson(req): ValidJson<UpdateCustomerRequest>,
) -> ApiResult<Json<Envelope<customers::Model>>> {
    let customer = CustomerRepository::new(state.conn())
        .update(id, req.into_input()?)
        .await?;
    info!(customer_id = %id, "Customer updated");
    Ok(response::ok(customer))
}

/// DELETE `/customer/{id}` - Delete a customer and everything they own.
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    CustomerRepository::new(state.conn()).delete(id).await?;
    info!(customer_id = %id, deleted_by = %auth.id(), "Customer deleted");
    Ok(response::message("Customer deleted successfully"))
}

async fn find_customer(state: &AppState, id: Uuid) -> ApiResult<customers::Model> {
    CustomerRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_profile_requires_token() {
        let state = state();
        let response = send(app(&state), "GET", "/api/customer/profile", None, None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No token, authorization denied");
    }

    #[tokio::test]
    async fn test_staff_cannot_read_customer_profile() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let response = send(app(&state), "GET", "/api/customer/profile", Some(&staff), None).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error"], "Access denied");
    }

    #[tokio::test]
    async fn test_customer_cannot_delete_customers() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let uri = format!("/api/customer/{}", Uuid::new_v4());
        let response = send(app(&state), "DELETE", &uri, Some(&customer), None).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email_before_store() {
        let state = state();
        let body = json!({
            "full_name": "Nimal Perera",
            "email": "not-an-email",
            "password": "secret123",
            "nic_number": "901234567V",
        });
        let response = send(app(&state), "POST", "/api/customer/register", None, Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Please provide a valid email address"
        );
    }

    #[tokio::test]
    async fn test_register_rejects_bad_nic() {
        let state = state();
        let body = json!({
            "full_name": "Nimal Perera",
            "email": "nimal@example.com",
            "password": "secret123",
            "nic_number": "12345",
        });
        let response = send(app(&state), "POST", "/api/customer/register", None, Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_missing_field() {
        let state = state();
        let body = json!({ "email": "nimal@example.com" });
        let response = send(app(&state), "POST", "/api/customer/register", None, Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[test]
    fn test_update_request_blank_phone_clears() {
        let req = UpdateCustomerRequest {
            phone: Some("  ".to_string()),
            email: Some(" Sunil@Example.com".to_string()),
            ..Default::default()
        };
        let input = req.into_input().unwrap();
        assert_eq!(input.phone, Some(None));
        assert_eq!(input.email.as_deref(), Some("sunil@example.com"));
        assert!(input.address.is_none());
    }

    #[test]
    fn test_update_request_rejects_bad_phone() {
        let req = UpdateCustomerRequest {
            phone: Some("12345".to_string()),
            ..Default::default()
        };
        assert!(req.into_input().is_err());
    }
}
