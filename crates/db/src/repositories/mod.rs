//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod customer;
pub mod inventory;
pub mod land;
pub mod message;
pub mod progress;
pub mod project;
pub mod proposal;
pub mod role;
pub mod shipment;
pub mod staff;

pub use customer::{CreateCustomerInput, CustomerError, CustomerRepository, UpdateCustomerInput};
pub use inventory::{
    CreateInventoryInput, InventoryError, InventoryRepository, StockChange, UpdateInventoryInput,
};
pub use land::{CreateLandInput, LandError, LandRepository, UpdateLandInput};
pub use message::{CreateMessageInput, MessageRepository};
pub use progress::{CreateProgressInput, ProgressError, ProgressRepository};
pub use project::{CreateProjectInput, ProjectError, ProjectRepository, UpdateProjectInput};
pub use proposal::{ProposalError, ProposalRepository};
pub use role::{RoleError, RoleRepository};
pub use shipment::{CreateShipmentInput, ShipmentError, ShipmentRepository};
pub use staff::{CreateStaffInput, StaffAccount, StaffError, StaffRepository, UpdateStaffInput};

use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Select, SqlErr};

/// Runs `select` for one page and counts the full result set.
pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: &PageRequest,
) -> Result<PageResponse<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let page = page.normalized();
    let paginator = select.paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.page_index()).await?;
    Ok(PageResponse::new(items, page.page, page.per_page, total))
}

/// True when `err` is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// True when `err` is a foreign-key violation.
pub(crate) fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
