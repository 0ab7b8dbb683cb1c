//! Staff role repository.

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
    sea_query::{Expr, Func},
};

use super::is_unique_violation;
use crate::entities::roles;

/// Error types for role operations.
#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    /// A role with this name already exists.
    #[error("Role '{0}' already exists")]
    Duplicate(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Role repository.
#[derive(Debug, Clone)]
pub struct RoleRepository {
    db: DatabaseConnection,
}

impl RoleRepository {
    /// Creates a new role repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all roles ordered by ID.
    pub async fn list(&self) -> Result<Vec<roles::Model>, DbErr> {
        roles::Entity::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
    }

    /// Finds a role by ID.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a role by name, ignoring case.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<roles::Model>, DbErr> {
        roles::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(roles::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            )
            .one(&self.db)
            .await
    }

    /// Creates a role.
    ///
    /// # Errors
    ///
    /// Returns `RoleError::Duplicate` if the name is taken (ignoring case).
    pub async fn create(&self, name: &str) -> Result<roles::Model, RoleError> {
        let name = name.trim().to_string();
        if self.find_by_name(&name).await?.is_some() {
            return Err(RoleError::Duplicate(name));
        }

        let role = roles::ActiveModel {
            id: NotSet,
            name: Set(name.clone()),
        };
        role.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                RoleError::Duplicate(name)
            } else {
                RoleError::Database(e)
            }
        })
    }
}
