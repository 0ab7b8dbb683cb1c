//! Customer repository for database operations.

use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{fetch_page, is_unique_violation};
use crate::entities::customers;

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Email is registered to another customer.
    #[error("Customer already exists")]
    DuplicateEmail,

    /// NIC number is registered to another customer.
    #[error("A customer with this NIC number already exists")]
    DuplicateNic,

    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Full name.
    pub full_name: String,
    /// Email, already normalised to lowercase.
    pub email: String,
    /// Argon2 PHC hash of the password.
    pub password_hash: String,
    /// National identity card number.
    pub nic_number: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

/// Input for updating a customer profile.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// Full name.
    pub full_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// NIC number.
    pub nic_number: Option<String>,
    /// Contact phone.
    pub phone: Option<Option<String>>,
    /// Postal address.
    pub address: Option<Option<String>>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a customer by email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a customer by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id).one(&self.db).await
    }

    /// Registers a new customer.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` or `DuplicateNic` if either is already taken.
    pub async fn create(&self, input: CreateCustomerInput) -> Result<customers::Model, CustomerError> {
        self.ensure_unique(&input.email, &input.nic_number, None)
            .await?;

        let now = chrono::Utc::now().into();
        let customer = customers::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            nic_number: Set(input.nic_number),
            phone: Set(input.phone),
            address: Set(input.address),
            created_at: Set(now),
            updated_at: Set(now),
        };

        customer.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CustomerError::DuplicateEmail
            } else {
                CustomerError::Database(e)
            }
        })
    }

    /// Lists customers, newest first.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<customers::Model>, CustomerError> {
        let query = customers::Entity::find().order_by_desc(customers::Column::CreatedAt);
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Updates a customer profile.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown ID and `DuplicateEmail`/`DuplicateNic`
    /// when the new value belongs to another customer.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = self
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let email = input.email.as_deref().unwrap_or(&customer.email);
        let nic = input.nic_number.as_deref().unwrap_or(&customer.nic_number);
        self.ensure_unique(email, nic, Some(id)).await?;

        let mut active: customers::ActiveModel = customer.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(nic_number) = input.nic_number {
            active.nic_number = Set(nic_number);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Replaces the stored password hash.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), CustomerError> {
        let customer = self
            .find_by_id(id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut active: customers::ActiveModel = customer.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a customer together with their proposals, lands and shipments.
    pub async fn delete(&self, id: Uuid) -> Result<(), CustomerError> {
        let result = customers::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(CustomerError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_unique(
        &self,
        email: &str,
        nic_number: &str,
        except: Option<Uuid>,
    ) -> Result<(), CustomerError> {
        let mut by_email = customers::Entity::find().filter(customers::Column::Email.eq(email));
        let mut by_nic =
            customers::Entity::find().filter(customers::Column::NicNumber.eq(nic_number));
        if let Some(id) = except {
            by_email = by_email.filter(customers::Column::Id.ne(id));
            by_nic = by_nic.filter(customers::Column::Id.ne(id));
        }

        if by_email.count(&self.db).await? > 0 {
            return Err(CustomerError::DuplicateEmail);
        }
        if by_nic.count(&self.db).await? > 0 {
            return Err(CustomerError::DuplicateNic);
        }
        Ok(())
    }
}
