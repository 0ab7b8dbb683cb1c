//! Shipment repository.
//!
//! Recording a shipment and decrementing stock happen in one transaction:
//! either both are written or neither is.

use plantara_core::inventory::{self as stock, StockError};
use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::{fetch_page, inventory::lock_item};
use crate::entities::{customers, inventory_items, shipments};

/// Error types for shipment operations.
#[derive(Debug, thiserror::Error)]
pub enum ShipmentError {
    /// Customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Inventory item does not exist.
    #[error("Inventory item not found: {0}")]
    InventoryNotFound(Uuid),

    /// Shipment not found.
    #[error("Shipment not found: {0}")]
    NotFound(Uuid),

    /// Not enough stock, or a non-positive quantity.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a shipment.
#[derive(Debug, Clone)]
pub struct CreateShipmentInput {
    /// Receiving customer.
    pub customer_id: Uuid,
    /// Item shipped.
    pub inventory_id: Uuid,
    /// Units shipped.
    pub quantity: i32,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Shipment repository.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    db: DatabaseConnection,
}

impl ShipmentRepository {
    /// Creates a new shipment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a shipment and takes the units out of stock.
    ///
    /// The inventory row is locked for the duration of the transaction, so
    /// concurrent shipments of the same item are serialised.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound`, `InventoryNotFound`, or
    /// `Stock(Insufficient)`. On any error the transaction is rolled back and
    /// stock is unchanged.
    pub async fn create(
        &self,
        input: CreateShipmentInput,
    ) -> Result<shipments::Model, ShipmentError> {
        if input.quantity <= 0 {
            return Err(StockError::NonPositiveQuantity.into());
        }

        let customer = customers::Entity::find_by_id(input.customer_id)
            .count(&self.db)
            .await?;
        if customer == 0 {
            return Err(ShipmentError::CustomerNotFound(input.customer_id));
        }

        let txn = self.db.begin().await?;

        let Some(item) = lock_item(&txn, input.inventory_id).await? else {
            txn.rollback().await?;
            return Err(ShipmentError::InventoryNotFound(input.inventory_id));
        };

        let remaining = match stock::take(item.quantity, input.quantity) {
            Ok(remaining) => remaining,
            Err(e) => {
                debug!(
                    inventory_id = %input.inventory_id,
                    available = item.quantity,
                    requested = input.quantity,
                    "Shipment rejected, rolling back"
                );
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        let now = chrono::Utc::now().into();
        let mut active: inventory_items::ActiveModel = item.into();
        active.quantity = Set(remaining);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        let shipment = shipments::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            inventory_id: Set(input.inventory_id),
            quantity: Set(input.quantity),
            notes: Set(input.notes),
            shipped_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(shipment)
    }

    /// Finds a shipment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<shipments::Model>, DbErr> {
        shipments::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists shipments, most recent first, optionally for one customer.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<PageResponse<shipments::Model>, ShipmentError> {
        let mut query = shipments::Entity::find().order_by_desc(shipments::Column::ShippedAt);
        if let Some(customer_id) = customer_id {
            query = query.filter(shipments::Column::CustomerId.eq(customer_id));
        }
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Deletes a shipment record. Stock is not restored.
    pub async fn delete(&self, id: Uuid) -> Result<(), ShipmentError> {
        let result = shipments::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ShipmentError::NotFound(id));
        }
        Ok(())
    }
}
