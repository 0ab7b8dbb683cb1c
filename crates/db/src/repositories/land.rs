//! Land parcel repository.

use plantara_shared::types::{PageRequest, PageResponse};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::{fetch_page, is_foreign_key_violation};
use crate::entities::lands;

/// Error types for land operations.
#[derive(Debug, thiserror::Error)]
pub enum LandError {
    /// Owning customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Land record not found.
    #[error("Land not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a land parcel.
#[derive(Debug, Clone)]
pub struct CreateLandInput {
    /// Owner.
    pub customer_id: Uuid,
    /// Address or description of the location.
    pub location: String,
    /// Area in acres, greater than zero.
    pub size_acres: Decimal,
    /// Soil classification.
    pub soil_type: Option<String>,
    /// Notes.
    pub description: Option<String>,
}

/// Patch for a land parcel.
#[derive(Debug, Clone, Default)]
pub struct UpdateLandInput {
    /// Location.
    pub location: Option<String>,
    /// Area in acres.
    pub size_acres: Option<Decimal>,
    /// Soil classification.
    pub soil_type: Option<Option<String>>,
    /// Notes.
    pub description: Option<Option<String>>,
}

/// Land repository.
#[derive(Debug, Clone)]
pub struct LandRepository {
    db: DatabaseConnection,
}

impl LandRepository {
    /// Creates a new land repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a land parcel.
    pub async fn create(&self, input: CreateLandInput) -> Result<lands::Model, LandError> {
        let now = chrono::Utc::now().into();
        let land = lands::ActiveModel {
            id: Set(Uuid::new_v4()),
            customer_id: Set(input.customer_id),
            location: Set(input.location),
            size_acres: Set(input.size_acres),
            soil_type: Set(input.soil_type),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        land.insert(&self.db).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                LandError::CustomerNotFound(input.customer_id)
            } else {
                LandError::Database(e)
            }
        })
    }

    /// Finds a land parcel by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<lands::Model>, DbErr> {
        lands::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists land parcels, optionally for one customer.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<PageResponse<lands::Model>, LandError> {
        let mut query = lands::Entity::find().order_by_desc(lands::Column::CreatedAt);
        if let Some(customer_id) = customer_id {
            query = query.filter(lands::Column::CustomerId.eq(customer_id));
        }
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Updates a land parcel.
    pub async fn update(&self, id: Uuid, input: UpdateLandInput) -> Result<lands::Model, LandError> {
        let land = self
            .find_by_id(id)
            .await?
            .ok_or(LandError::NotFound(id))?;

        let mut active: lands::ActiveModel = land.into();
        if let Some(location) = input.location {
            active.location = Set(location);
        }
        if let Some(size_acres) = input.size_acres {
            active.size_acres = Set(size_acres);
        }
        if let Some(soil_type) = input.soil_type {
            active.soil_type = Set(soil_type);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a land parcel.
    pub async fn delete(&self, id: Uuid) -> Result<(), LandError> {
        let result = lands::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(LandError::NotFound(id));
        }
        Ok(())
    }
}
