//! Project repository.
//!
//! Every write runs the lifecycle rules from `plantara_core::project` on the
//! merged record, so status and dates are always accepted or rejected
//! together.

use chrono::NaiveDate;
use plantara_core::project::{self as lifecycle, LifecycleError, ProjectDates, ProjectStatus};
use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use super::{fetch_page, is_unique_violation};
use crate::entities::{projects, proposals, staff};

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Proposal does not exist.
    #[error("Proposal not found: {0}")]
    ProposalNotFound(String),

    /// Proposal already has a project.
    #[error("A project already exists for proposal {0}")]
    ProposalTaken(String),

    /// Assigned staff member does not exist.
    #[error("Staff member not found: {0}")]
    StaffNotFound(Uuid),

    /// Project not found.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// Status or dates break a lifecycle rule.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct CreateProjectInput {
    /// Proposal the project delivers.
    pub proposal_id: String,
    /// Assigned staff member.
    pub staff_id: Option<Uuid>,
    /// Initial status; defaults to Pending.
    pub status: Option<ProjectStatus>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<NaiveDate>,
}

/// Patch for a project. `None` leaves a field unchanged; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectInput {
    /// Assigned staff member.
    pub staff_id: Option<Option<Uuid>>,
    /// New status.
    pub status: Option<ProjectStatus>,
    /// Start date.
    pub start_date: Option<Option<NaiveDate>>,
    /// End date.
    pub end_date: Option<Option<NaiveDate>>,
}

/// Project repository.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project for a proposal.
    ///
    /// # Errors
    ///
    /// Returns `ProposalNotFound`, `ProposalTaken`, `StaffNotFound`, or a
    /// lifecycle error if the initial status and dates are inconsistent.
    pub async fn create(&self, input: CreateProjectInput) -> Result<projects::Model, ProjectError> {
        let status = input.status.unwrap_or(ProjectStatus::Pending);
        lifecycle::validate_state(status, ProjectDates::new(input.start_date, input.end_date))?;

        let proposal = proposals::Entity::find_by_id(input.proposal_id.clone())
            .one(&self.db)
            .await?;
        if proposal.is_none() {
            return Err(ProjectError::ProposalNotFound(input.proposal_id));
        }

        let existing = projects::Entity::find()
            .filter(projects::Column::ProposalId.eq(&input.proposal_id))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(ProjectError::ProposalTaken(input.proposal_id));
        }

        if let Some(staff_id) = input.staff_id {
            ensure_staff(&self.db, staff_id).await?;
        }

        let now = chrono::Utc::now().into();
        let project = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            staff_id: Set(input.staff_id),
            proposal_id: Set(input.proposal_id.clone()),
            status: Set(status.into()),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            created_at: Set(now),
            updated_at: Set(now),
        };

        project.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ProjectError::ProposalTaken(input.proposal_id)
            } else {
                ProjectError::Database(e)
            }
        })
    }

    /// Finds a project by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<projects::Model>, DbErr> {
        projects::Entity::find_by_id(id).one(&self.db).await
    }

    /// Returns the customer who owns the project through its proposal.
    pub async fn owner_of(&self, id: Uuid) -> Result<Option<Uuid>, DbErr> {
        let row = projects::Entity::find_by_id(id)
            .find_also_related(proposals::Entity)
            .one(&self.db)
            .await?;
        Ok(row.and_then(|(_, proposal)| proposal.map(|p| p.customer_id)))
    }

    /// Lists projects, newest first, optionally only those assigned to a
    /// staff member.
    pub async fn list(
        &self,
        staff_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<PageResponse<projects::Model>, ProjectError> {
        let mut query = projects::Entity::find().order_by_desc(projects::Column::CreatedAt);
        if let Some(staff_id) = staff_id {
            query = query.filter(projects::Column::StaffId.eq(staff_id));
        }
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Applies a patch after checking the resulting state.
    ///
    /// The row stays locked from the read until the write, so concurrent
    /// patches are checked against each other's results.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `StaffNotFound`, or a lifecycle error for a
    /// backward move or inconsistent dates.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProjectInput,
    ) -> Result<projects::Model, ProjectError> {
        let txn = self.db.begin().await?;
        let project = lock_project(&txn, id)
            .await?
            .ok_or(ProjectError::NotFound(id))?;

        let current: ProjectStatus = project.status.into();
        let next = input.status.unwrap_or(current);
        let dates = ProjectDates::new(
            input.start_date.unwrap_or(project.start_date),
            input.end_date.unwrap_or(project.end_date),
        );
        let status = match lifecycle::transition(current, next, dates) {
            Ok(status) => status,
            Err(e) => {
                debug!(
                    project_id = %id,
                    from = ?current,
                    to = ?next,
                    "Project update rejected, rolling back"
                );
                txn.rollback().await?;
                return Err(e.into());
            }
        };

        if let Some(Some(staff_id)) = input.staff_id {
            ensure_staff(&txn, staff_id).await?;
        }

        let mut active: projects::ActiveModel = project.into();
        if let Some(staff_id) = input.staff_id {
            active.staff_id = Set(staff_id);
        }
        active.status = Set(status.into());
        active.start_date = Set(dates.start_date);
        active.end_date = Set(dates.end_date);
        active.updated_at = Set(chrono::Utc::now().into());

        let updated = active.update(&txn).await?;
        txn.commit().await?;
        Ok(updated)
    }

    /// Deletes a project and its progress entries.
    pub async fn delete(&self, id: Uuid) -> Result<(), ProjectError> {
        let result = projects::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(ProjectError::NotFound(id));
        }
        Ok(())
    }
}

async fn lock_project<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id)
        .lock_exclusive()
        .one(conn)
        .await
}

async fn ensure_staff<C: ConnectionTrait>(conn: &C, staff_id: Uuid) -> Result<(), ProjectError> {
    let count = staff::Entity::find_by_id(staff_id).count(conn).await?;
    if count == 0 {
        return Err(ProjectError::StaffNotFound(staff_id));
    }
    Ok(())
}
