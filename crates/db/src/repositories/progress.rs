//! Project progress log.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{progress_updates, projects};

/// Error types for progress operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// Project does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(Uuid),

    /// Progress entry not found.
    #[error("Progress entry not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording progress.
#[derive(Debug, Clone)]
pub struct CreateProgressInput {
    /// Project the entry belongs to.
    pub project_id: Uuid,
    /// What was done.
    pub description: String,
    /// Day the work happened; defaults to today.
    pub progress_date: Option<NaiveDate>,
    /// Staff member recording the entry.
    pub created_by: Option<Uuid>,
}

/// Progress repository.
#[derive(Debug, Clone)]
pub struct ProgressRepository {
    db: DatabaseConnection,
}

impl ProgressRepository {
    /// Creates a new progress repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a progress entry.
    pub async fn create(
        &self,
        input: CreateProgressInput,
    ) -> Result<progress_updates::Model, ProgressError> {
        let exists = projects::Entity::find_by_id(input.project_id)
            .count(&self.db)
            .await?;
        if exists == 0 {
            return Err(ProgressError::ProjectNotFound(input.project_id));
        }

        let now = chrono::Utc::now();
        let entry = progress_updates::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(input.project_id),
            description: Set(input.description),
            progress_date: Set(input.progress_date.unwrap_or_else(|| now.date_naive())),
            created_by: Set(input.created_by),
            created_at: Set(now.into()),
        };

        Ok(entry.insert(&self.db).await?)
    }

    /// Lists entries for a project, most recent first.
    pub async fn list_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<progress_updates::Model>, DbErr> {
        progress_updates::Entity::find()
            .filter(progress_updates::Column::ProjectId.eq(project_id))
            .order_by_desc(progress_updates::Column::ProgressDate)
            .order_by_desc(progress_updates::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Deletes an entry.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProgressError> {
        let result = progress_updates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ProgressError::NotFound(id));
        }
        Ok(())
    }
}
