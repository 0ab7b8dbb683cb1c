//! Shipment routes. Creating a shipment takes the units out of stock.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use plantara_core::auth::Role;
use plantara_db::{
    entities::shipments,
    repositories::{CreateShipmentInput, ShipmentRepository},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::non_blank;
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery, Pagination},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

/// Creates the shipment routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/shipment",
            authorize(
                state,
                Role::STAFF_OR_ADMIN,
                get(list_shipments).post(create_shipment),
            ),
        )
        .route(
            "/shipment/{id}",
            authorize(state, Role::STAFF_OR_ADMIN, get(get_shipment))
                .merge(authorize(state, Role::ADMIN, delete(delete_shipment))),
        )
}

/// Request body for a shipment.
#[derive(Debug, Deserialize)]
pub struct CreateShipmentRequest {
    /// Receiving customer.
    pub customer_id: Uuid,
    /// Item shipped.
    pub inventory_id: Uuid,
    /// Units shipped.
    pub quantity: i32,
    /// Delivery notes.
    pub notes: Option<String>,
}

/// Query parameters for listing shipments.
#[derive(Debug, Default, Deserialize)]
pub struct ShipmentFilter {
    /// Only shipments to this customer.
    pub customer_id: Option<Uuid>,
}

/// POST `/shipment` - Ship stock to a customer.
async fn create_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateShipmentRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<shipments::Model>>)> {
    let shipment = ShipmentRepository::new(state.conn())
        .create(CreateShipmentInput {
            customer_id: req.customer_id,
            inventory_id: req.inventory_id,
            quantity: req.quantity,
            notes: non_blank(req.notes),
        })
        .await?;
    info!(
        shipment_id = %shipment.id,
        customer_id = %shipment.customer_id,
        inventory_id = %shipment.inventory_id,
        quantity = shipment.quantity,
        by = %auth.id(),
        "Shipment recorded"
    );
    Ok(response::created(shipment))
}

/// GET `/shipment` - List shipments, newest first.
async fn list_shipments(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ShipmentFilter>,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<shipments::Model>>> {
    let shipments = ShipmentRepository::new(state.conn())
        .list(filter.customer_id, &page)
        .await?;
    Ok(response::page(shipments))
}

/// GET `/shipment/{id}` - Get one shipment.
async fn get_shipment(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<shipments::Model>>> {
    ShipmentRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(response::ok)
        .ok_or_else(|| ApiError::not_found("Shipment not found"))
}

/// DELETE `/shipment/{id}` - Delete a shipment record. Stock is not restored.
async fn delete_shipment(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    ShipmentRepository::new(state.conn()).delete(id).await?;
    info!(shipment_id = %id, deleted_by = %auth.id(), "Shipment deleted");
    Ok(response::message("Shipment deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use serde_json::json;

    #[tokio::test]
    async fn test_customer_cannot_ship() {
        let state = state();
        let customer = token(&state, Role::Customer);
        let body = json!({
            "customer_id": Uuid::new_v4(),
            "inventory_id": Uuid::new_v4(),
            "quantity": 1,
        });
        let response = send(app(&state), "POST", "/api/shipment", Some(&customer), Some(body)).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_before_store() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let body = json!({
            "customer_id": Uuid::new_v4(),
            "inventory_id": Uuid::new_v4(),
            "quantity": 0,
        });
        let response = send(app(&state), "POST", "/api/shipment", Some(&staff), Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let state = state();
        let response = send(app(&state), "GET", "/api/shipment", Some("garbage"), None).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error"], "Token is not valid");
    }
}
