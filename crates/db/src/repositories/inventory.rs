//! Inventory repository.
//!
//! Item names are unique ignoring case. Creating an item whose name already
//! exists adds to that item's stock instead of inserting a second row.
//! Stock changes lock the row (`SELECT ... FOR UPDATE`) inside a transaction.

use plantara_core::inventory::{self as stock, StockError};
use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, Func},
};
use tracing::debug;
use uuid::Uuid;

use super::{fetch_page, is_unique_violation};
use crate::entities::inventory_items;

/// Error types for inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Another item already uses this name.
    #[error("Inventory item '{0}' already exists")]
    DuplicateName(String),

    /// Item not found.
    #[error("Inventory item not found: {0}")]
    NotFound(Uuid),

    /// Stock rule violated.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for adding stock.
#[derive(Debug, Clone)]
pub struct CreateInventoryInput {
    /// Item name.
    pub item_name: String,
    /// Units to add.
    pub quantity: i32,
    /// Unit of measure.
    pub unit: Option<String>,
}

/// Input for editing an item.
#[derive(Debug, Clone, Default)]
pub struct UpdateInventoryInput {
    /// New name.
    pub item_name: Option<String>,
    /// New absolute quantity.
    pub quantity: Option<i32>,
    /// Unit of measure.
    pub unit: Option<Option<String>>,
}

/// Outcome of adding stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockChange {
    /// The item after the change.
    pub item: inventory_items::Model,
    /// True if an existing item was topped up.
    pub merged: bool,
}

/// Inventory repository.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    db: DatabaseConnection,
}

impl InventoryRepository {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds stock, merging into an existing item with the same name.
    ///
    /// If a concurrent request inserts the same name first, the losing
    /// insert is retried once as a merge.
    ///
    /// # Errors
    ///
    /// Returns `Stock` for a negative quantity or an overflowing total.
    pub async fn create_or_merge(
        &self,
        input: CreateInventoryInput,
    ) -> Result<StockChange, InventoryError> {
        stock::check_quantity(input.quantity)?;
        let name = input.item_name.trim().to_string();

        match self.add_stock(&name, &input).await {
            Err(InventoryError::DuplicateName(_)) => {
                debug!(item_name = %name, "Item inserted concurrently, merging instead");
                self.add_stock(&name, &input).await
            }
            other => other,
        }
    }

    async fn add_stock(
        &self,
        name: &str,
        input: &CreateInventoryInput,
    ) -> Result<StockChange, InventoryError> {
        let txn = self.db.begin().await?;
        let existing = find_by_name(&txn, name, true).await?;

        let change = if let Some(item) = existing {
            let quantity = stock::merge_quantity(item.quantity, input.quantity)?;
            let mut active: inventory_items::ActiveModel = item.into();
            active.quantity = Set(quantity);
            if let Some(unit) = &input.unit {
                active.unit = Set(Some(unit.clone()));
            }
            active.updated_at = Set(chrono::Utc::now().into());
            StockChange {
                item: active.update(&txn).await?,
                merged: true,
            }
        } else {
            let now = chrono::Utc::now().into();
            let item = inventory_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                item_name: Set(name.to_string()),
                quantity: Set(input.quantity),
                unit: Set(input.unit.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            let item = match item.insert(&txn).await {
                Ok(item) => item,
                Err(e) if is_unique_violation(&e) => {
                    txn.rollback().await?;
                    return Err(InventoryError::DuplicateName(name.to_string()));
                }
                Err(e) => return Err(e.into()),
            };
            StockChange {
                item,
                merged: false,
            }
        };

        txn.commit().await?;
        Ok(change)
    }

    /// Finds an item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<inventory_items::Model>, DbErr> {
        inventory_items::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an item by name, ignoring case and surrounding whitespace.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<inventory_items::Model>, DbErr> {
        find_by_name(&self.db, name, false).await
    }

    /// Lists items alphabetically.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<inventory_items::Model>, InventoryError> {
        let query = inventory_items::Entity::find().order_by_asc(inventory_items::Column::ItemName);
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Edits name, quantity and unit.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` when renaming onto another item's name.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateInventoryInput,
    ) -> Result<inventory_items::Model, InventoryError> {
        if let Some(quantity) = input.quantity {
            stock::check_quantity(quantity)?;
        }

        let item = self
            .find_by_id(id)
            .await?
            .ok_or(InventoryError::NotFound(id))?;

        let new_name = input.item_name.map(|n| n.trim().to_string());
        if let Some(name) = &new_name
            && let Some(other) = self.find_by_name(name).await?
            && other.id != id
        {
            return Err(InventoryError::DuplicateName(name.clone()));
        }

        let mut active: inventory_items::ActiveModel = item.into();
        if let Some(name) = new_name.clone() {
            active.item_name = Set(name);
        }
        if let Some(quantity) = input.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(unit) = input.unit {
            active.unit = Set(unit);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                InventoryError::DuplicateName(new_name.unwrap_or_default())
            } else {
                InventoryError::Database(e)
            }
        })
    }

    /// Removes `quantity` units from stock.
    ///
    /// # Errors
    ///
    /// Returns `Stock(Insufficient)` if fewer units are on hand; nothing is
    /// written in that case.
    pub async fn reduce(
        &self,
        id: Uuid,
        quantity: i32,
    ) -> Result<inventory_items::Model, InventoryError> {
        let txn = self.db.begin().await?;

        let item = lock_item(&txn, id)
            .await?
            .ok_or(InventoryError::NotFound(id))?;

        let remaining = match stock::take(item.quantity, quantity) {
            Ok(remaining) => remaining,
            Err(e) => {
                debug!(
                    item_id = %id,
                    available = item.quantity,
                    requested = quantity,
                    "Stock reduction rejected, rolling back"
                );
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        let mut active: inventory_items::ActiveModel = item.into();
        active.quantity = Set(remaining);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes an item and its shipment records.
    pub async fn delete(&self, id: Uuid) -> Result<(), InventoryError> {
        let result = inventory_items::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(InventoryError::NotFound(id));
        }
        Ok(())
    }
}

/// Loads an item with a row lock held until the transaction ends.
pub(crate) async fn lock_item<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<inventory_items::Model>, DbErr> {
    inventory_items::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
}

async fn find_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    lock: bool,
) -> Result<Option<inventory_items::Model>, DbErr> {
    let mut query = inventory_items::Entity::find().filter(
        Expr::expr(Func::lower(Expr::col(inventory_items::Column::ItemName)))
            .eq(stock::normalize_item_name(name)),
    );
    if lock {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}
