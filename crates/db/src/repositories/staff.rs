//! Staff repository for database operations.
//!
//! Staff rows are always read together with their role so callers can derive
//! the session role ("Admin" grants admin rights, anything else is staff).

use std::collections::HashMap;

use plantara_core::auth::Role;
use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use uuid::Uuid;

use super::{fetch_page, is_unique_violation};
use crate::entities::{roles, staff};

/// Error types for staff operations.
#[derive(Debug, thiserror::Error)]
pub enum StaffError {
    /// Username is taken.
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),

    /// Email is taken.
    #[error("Staff member with this email already exists")]
    DuplicateEmail,

    /// Referenced role does not exist.
    #[error("Role not found: {0}")]
    RoleNotFound(i32),

    /// Staff member not found.
    #[error("Staff member not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A staff member with the name of their role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffAccount {
    /// Staff row.
    #[serde(flatten)]
    pub staff: staff::Model,
    /// Name of the referenced role.
    pub role_name: String,
}

impl StaffAccount {
    /// Session role for this account.
    #[must_use]
    pub fn session_role(&self) -> Role {
        Role::from_staff_role_name(&self.role_name)
    }
}

/// Input for creating a staff member.
#[derive(Debug, Clone)]
pub struct CreateStaffInput {
    /// Full name.
    pub full_name: String,
    /// Login name.
    pub username: String,
    /// Email, lowercase.
    pub email: String,
    /// Argon2 PHC hash of the initial password.
    pub password_hash: String,
    /// Role ID.
    pub role_id: i32,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Input for updating a staff member.
#[derive(Debug, Clone, Default)]
pub struct UpdateStaffInput {
    /// Full name.
    pub full_name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Role ID.
    pub role_id: Option<i32>,
    /// Contact phone.
    pub phone: Option<Option<String>>,
}

/// Staff repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    db: DatabaseConnection,
}

impl StaffRepository {
    /// Creates a new staff repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a staff member and role by username.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<StaffAccount>, DbErr> {
        let row = staff::Entity::find()
            .filter(staff::Column::Username.eq(username))
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(into_account))
    }

    /// Finds a staff member and role by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffAccount>, DbErr> {
        let row = staff::Entity::find_by_id(id)
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(into_account))
    }

    /// Creates a staff member.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateUsername`/`DuplicateEmail` when taken and
    /// `RoleNotFound` if `role_id` does not resolve.
    pub async fn create(&self, input: CreateStaffInput) -> Result<StaffAccount, StaffError> {
        let taken = staff::Entity::find()
            .filter(staff::Column::Username.eq(&input.username))
            .count(&self.db)
            .await?;
        if taken > 0 {
            return Err(StaffError::DuplicateUsername(input.username));
        }
        self.ensure_email_free(&input.email, None).await?;

        let role = roles::Entity::find_by_id(input.role_id)
            .one(&self.db)
            .await?
            .ok_or(StaffError::RoleNotFound(input.role_id))?;

        let now = chrono::Utc::now().into();
        let member = staff::ActiveModel {
            id: Set(Uuid::new_v4()),
            full_name: Set(input.full_name),
            username: Set(input.username.clone()),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role_id: Set(role.id),
            phone: Set(input.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let staff = member.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                StaffError::DuplicateUsername(input.username)
            } else {
                StaffError::Database(e)
            }
        })?;

        Ok(StaffAccount {
            staff,
            role_name: role.name,
        })
    }

    /// Lists staff members, newest first.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<StaffAccount>, StaffError> {
        let query = staff::Entity::find().order_by_desc(staff::Column::CreatedAt);
        let members = fetch_page(&self.db, query, page).await?;

        let role_names: HashMap<i32, String> = roles::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        Ok(members.map(|staff| {
            let role_name = role_names.get(&staff.role_id).cloned().unwrap_or_default();
            StaffAccount { staff, role_name }
        }))
    }

    /// Updates a staff member.
    pub async fn update(&self, id: Uuid, input: UpdateStaffInput) -> Result<StaffAccount, StaffError> {
        let account = self.find_by_id(id).await?.ok_or(StaffError::NotFound(id))?;

        if let Some(email) = &input.email {
            self.ensure_email_free(email, Some(id)).await?;
        }

        let mut role_name = account.role_name;
        if let Some(role_id) = input.role_id {
            let role = roles::Entity::find_by_id(role_id)
                .one(&self.db)
                .await?
                .ok_or(StaffError::RoleNotFound(role_id))?;
            role_name = role.name;
        }

        let mut active: staff::ActiveModel = account.staff.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(role_id) = input.role_id {
            active.role_id = Set(role_id);
        }
        if let Some(phone) = input.phone {
            active.phone = Set(phone);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let staff = active.update(&self.db).await?;
        Ok(StaffAccount { staff, role_name })
    }

    /// Replaces the stored password hash.
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), StaffError> {
        let member = staff::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StaffError::NotFound(id))?;

        let mut active: staff::ActiveModel = member.into();
        active.password_hash = Set(password_hash.to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&self.db).await?;
        Ok(())
    }

    /// Deletes a staff member. Their projects become unassigned.
    pub async fn delete(&self, id: Uuid) -> Result<(), StaffError> {
        let result = staff::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StaffError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str, except: Option<Uuid>) -> Result<(), StaffError> {
        let mut query = staff::Entity::find().filter(staff::Column::Email.eq(email));
        if let Some(id) = except {
            query = query.filter(staff::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(StaffError::DuplicateEmail);
        }
        Ok(())
    }
}

fn into_account((staff, role): (staff::Model, Option<roles::Model>)) -> StaffAccount {
    StaffAccount {
        staff,
        role_name: role.map(|r| r.name).unwrap_or_default(),
    }
}
