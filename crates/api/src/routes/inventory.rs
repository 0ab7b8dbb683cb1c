//! Plant and supply inventory routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
};
use plantara_core::{
    auth::Role,
    inventory::StockError,
    validation::{self, MAX_ITEM_NAME_LEN},
};
use plantara_db::{
    entities::inventory_items,
    repositories::{CreateInventoryInput, InventoryRepository, UpdateInventoryInput},
};
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

/// Creates the inventory routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/inventory",
            authorize(
                state,
                Role::STAFF_OR_ADMIN,
                get(list_items).post(add_stock),
            ),
        )
        .route(
            "/inventory/{id}",
            authorize(state, Role::STAFF_OR_ADMIN, get(get_item).put(update_item))
                .merge(authorize(state, Role::ADMIN, delete(delete_item))),
        )
        .route(
            "/inventory/{id}/reduce",
            authorize(state, Role::STAFF_OR_ADMIN, post(reduce_stock)),
        )
}

/// Request body for adding stock.
#[derive(Debug, Deserialize)]
pub struct AddStockRequest {
    /// Item name; matched against existing items ignoring case.
    pub item_name: String,
    /// Units to add.
    pub quantity: i32,
    /// Unit of measure, e.g. "plants".
    pub unit: Option<String>,
}

/// Patch for an item. A blank `unit` clears it.
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    /// New name.
    pub item_name: Option<String>,
    /// New quantity on hand.
    pub quantity: Option<i32>,
    /// Unit of measure.
    pub unit: Option<String>,
}

/// Request body for removing stock.
#[derive(Debug, Deserialize)]
pub struct ReduceStockRequest {
    /// Units to remove.
    pub quantity: i32,
}

/// GET `/inventory` - List items alphabetically.
async fn list_items(
    State(state): State<AppState>,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<inventory_items::Model>>> {
    let items = InventoryRepository::new(state.conn()).list(&page).await?;
    Ok(response::page(items))
}

/// GET `/inventory/{id}` - Get one item.
async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<inventory_items::Model>>> {
    InventoryRepository::new(state.conn())
        .find_by_id(id)
        .await?
        .map(response::ok)
        .ok_or_else(|| ApiError::not_found("Inventory item not found"))
}

/// POST `/inventory` - Add stock. Merges into an existing item of the same
/// name (201 for a new item, 200 for a merge).
async fn add_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AddStockRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<inventory_items::Model>>)> {
    let item_name = validation::require_text("item_name", &req.item_name, MAX_ITEM_NAME_LEN)?;

    let change = InventoryRepository::new(state.conn())
        .create_or_merge(CreateInventoryInput {
            item_name: item_name.to_string(),
            quantity: req.quantity,
            unit: non_blank(req.unit),
        })
        .await?;
    info!(
        item_id = %change.item.id,
        added = req.quantity,
        quantity = change.item.quantity,
        merged = change.merged,
        by = %auth.id(),
        "Stock added"
    );

    if change.merged {
        Ok((StatusCode::OK, response::ok(change.item)))
    } else {
        Ok(response::created(change.item))
    }
}

/// PUT `/inventory/{id}` - Rename an item or set its quantity and unit.
async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateItemRequest>,
) -> ApiResult<Json<Envelope<inventory_items::Model>>> {
    let item_name = req
        .item_name
        .as_deref()
        .map(|name| validation::require_text("item_name", name, MAX_ITEM_NAME_LEN))
        .transpose()?
        .map(ToString::to_string);

    let item = InventoryRepository::new(state.conn())
        .update(
            id,
            UpdateInventoryInput {
                item_name,
                quantity: req.quantity,
                unit: patch_text(req.unit),
            },
        )
        .await?;
    info!(item_id = %id, quantity = item.quantity, "Inventory item updated");
    Ok(response::ok(item))
}

/// POST `/inventory/{id}/reduce` - Remove stock without going below zero.
async fn reduce_stock(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<ReduceStockRequest>,
) -> ApiResult<Json<Envelope<inventory_items::Model>>> {
    if req.quantity <= 0 {
        return Err(StockError::NonPositiveQuantity.into());
    }

    let item = InventoryRepository::new(state.conn())
        .reduce(id, req.quantity)
        .await?;
    info!(
        item_id = %id,
        removed = req.quantity,
        quantity = item.quantity,
        by = %auth.id(),
        "Stock reduced"
    );
    Ok(response::ok(item))
}

/// DELETE `/inventory/{id}` - Delete an item and its shipment records.
async fn delete_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    InventoryRepository::new(state.conn()).delete(id).await?;
    info!(item_id = %id, deleted_by = %auth.id(), "Inventory item deleted");
    Ok(response::message("Inventory item deleted successfully"))
}
