//! Land parcel routes.
//!
//! Customers manage their own parcels, administrators manage all of them,
//! and staff have read access.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use plantara_core::{auth::Role, validation};
use plantara_db::{
    entities::lands,
    repositories::{CreateLandInput, LandRepository, UpdateLandInput},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::{non_blank, patch_text};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery, Pagination},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

const MAX_LOCATION_LEN: usize = 255;

/// Creates the land routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/land",
            authorize(state, Role::CUSTOMER_OR_ADMIN, post(create_land))
                .merge(authorize(state, Role::ALL, get(list_lands))),
        )
        .route(
            "/land/{id}",
            authorize(state, Role::ALL, get(get_land)).merge(authorize(
                state,
                Role::CUSTOMER_OR_ADMIN,
                put(update_land).delete(delete_land),
            )),
        )
}

/// Request body for registering a parcel.
#[derive(Debug, Deserialize)]
pub struct CreateLandRequest {
    /// Owner. Customers may omit it; administrators must supply it.
    pub customer_id: Option<Uuid>,
    /// Where the parcel is.
    pub location: String,
    /// Area in acres.
    pub size_acres: Decimal,
    /// Soil classification.
    pub soil_type: Option<String>,
    /// Notes.
    pub description: Option<String>,
}

/// Patch for a parcel. Blank `soil_type`/`description` clear the field.
#[derive(Debug, Deserialize)]
pub struct UpdateLandRequest {
    /// Where the parcel is.
    pub location: Option<String>,
    /// Area in acres.
    pub size_acres: Option<Decimal>,
    /// Soil classification.
    pub soil_type: Option<String>,
    /// Notes.
    pub description: Option<String>,
}

fn check_size(size_acres: Decimal) -> ApiResult<Decimal> {
    if size_acres <= Decimal::ZERO {
        return Err(ApiError::validation("Land size must be greater than zero"));
    }
    Ok(size_acres)
}

/// POST `/land` - Register a land parcel.
async fn create_land(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateLandRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<lands::Model>>)> {
    let customer_id = if auth.is_customer() {
        if req.customer_id.is_some_and(|id| id != auth.id()) {
            return Err(ApiError::forbidden("Access denied"));
        }
        auth.id()
    } else {
        req.customer_id
            .ok_or_else(|| ApiError::validation("customer_id is required"))?
    };
    let location = validation::require_text("location", &req.location, MAX_LOCATION_LEN)?;
    let size_acres = check_size(req.size_acres)?;

    let land = LandRepository::new(state.conn())
        .create(CreateLandInput {
            customer_id,
            location: location.to_string(),
            size_acres,
            soil_type: non_blank(req.soil_type),
            description: non_blank(req.description),
        })
        .await?;
    info!(land_id = %land.id, customer_id = %customer_id, "Land registered");
    Ok(response::created(land))
}

/// GET `/land` - List parcels; customers see only their own.
async fn list_lands(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<lands::Model>>> {
    let owner = auth.is_customer().then(|| auth.id());
    let lands = LandRepository::new(state.conn()).list(owner, &page).await?;
    Ok(response::page(lands))
}

/// GET `/land/{id}` - Get one parcel.
async fn get_land(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<lands::Model>>> {
    let land = find_visible_land(&state, &auth, id).await?;
    Ok(response::ok(land))
}

/// PUT `/land/{id}` - Update a parcel.
async fn update_land(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateLandRequest>,
) -> ApiResult<Json<Envelope<lands::Model>>> {
    let location = req
        .location
        .as_deref()
        .map(|l| validation::require_text("location", l, MAX_LOCATION_LEN))
        .transpose()?
        .map(ToString::to_string);
    let size_acres = req.size_acres.map(check_size).transpose()?;
    find_visible_land(&state, &auth, id).await?;

    let land = LandRepository::new(state.conn())
        .update(
            id,
            UpdateLandInput {
                location,
                size_acres,
                soil_type: patch_text(req.soil_type),
                description: patch_text(req.description),
            },
        )
        .await?;
    info!(land_id = %id, updated_by = %auth.id(), "Land updated");
    Ok(response::ok(land))
}

/// DELETE `/land/{id}` - Delete a parcel.
async fn delete_land(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    find_visible_land(&state, &auth, id).await?;
    LandRepository::new(state.conn()).delete(id).await?;
    info!(land_id = %id, deleted_by = %auth.id(), "Land deleted");
    Ok(response::message("Land deleted successfully"))
}

async fn find_visible_land(state: &AppState, auth: &AuthUser, id: Uuid) -> ApiResult<lands::Model> {
    let land = LandRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Land not found"))?;
    auth.ensure_can_view_customer(land.customer_id)?;
    Ok(land)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_staff_cannot_register_land() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let body = json!({ "customer_id": Uuid::new_v4(), "location": "Kandy", "size_acres": 2 });
        let response = send(app(&state), "POST", "/api/land", Some(&staff), Some(body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_zero_acres_rejected() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let body = json!({ "location": "Kandy", "size_acres": "0" });
        let response = send(app(&state), "POST", "/api/land", Some(&customer), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "Land size must be greater than zero"
        );
    }

    #[tokio::test]
    async fn test_admin_must_name_owner() {
        let state = state();
        let admin = token(&state, Role::Admin);
        let body = json!({ "location": "Galle", "size_acres": 1.5 });
        let response = send(app(&state), "POST", "/api/land", Some(&admin), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "customer_id is required");
    }

    #[tokio::test]
    async fn test_staff_cannot_delete_land() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let uri = format!("/api/land/{}", Uuid::new_v4());
        let response = send(app(&state), "DELETE", &uri, Some(&staff), None).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
