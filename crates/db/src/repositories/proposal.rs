//! Proposal repository.
//!
//! Proposal IDs are human-readable (`PRO1`, `PRO2`, ...) and drawn from the
//! `proposal_number_seq` sequence.

use plantara_core::proposal::PreparedProposal;
use plantara_shared::types::{PageRequest, PageResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set, Statement,
};
use uuid::Uuid;

use super::fetch_page;
use crate::entities::{customers, proposals};

/// Error types for proposal operations.
#[derive(Debug, thiserror::Error)]
pub enum ProposalError {
    /// Customer does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Proposal not found.
    #[error("Proposal not found: {0}")]
    NotFound(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Proposal repository.
#[derive(Debug, Clone)]
pub struct ProposalRepository {
    db: DatabaseConnection,
}

impl ProposalRepository {
    /// Creates a new proposal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a validated proposal for a customer.
    ///
    /// Installment fields are written only for installment plans.
    ///
    /// # Errors
    ///
    /// Returns `CustomerNotFound` if the customer does not exist.
    pub async fn create(
        &self,
        customer_id: Uuid,
        prepared: &PreparedProposal,
    ) -> Result<proposals::Model, ProposalError> {
        let customer = customers::Entity::find_by_id(customer_id)
            .one(&self.db)
            .await?;
        if customer.is_none() {
            return Err(ProposalError::CustomerNotFound(customer_id));
        }

        let id = self.next_id().await?;
        let now = chrono::Utc::now();
        let plan = &prepared.plan;

        let proposal = proposals::ActiveModel {
            id: Set(id),
            customer_id: Set(customer_id),
            project_type: Set(prepared.project_type.into()),
            project_duration: Set(to_i32(prepared.duration_years)?),
            project_value: Set(plan.original_amount),
            payment_mode: Set(prepared.payment_mode.into()),
            installment_count: Set(prepared.installment_count().map(to_i32).transpose()?),
            installment_amount: Set(prepared.installment_amount()),
            discount_amount: Set(plan.discount_amount),
            final_amount: Set(plan.final_amount),
            proposal_date: Set(now.date_naive()),
            created_at: Set(now.into()),
        };

        Ok(proposal.insert(&self.db).await?)
    }

    /// Finds a proposal by ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<proposals::Model>, DbErr> {
        proposals::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
    }

    /// Lists proposals, newest first, optionally for one customer.
    pub async fn list(
        &self,
        customer_id: Option<Uuid>,
        page: &PageRequest,
    ) -> Result<PageResponse<proposals::Model>, ProposalError> {
        let mut query = proposals::Entity::find().order_by_desc(proposals::Column::CreatedAt);
        if let Some(customer_id) = customer_id {
            query = query.filter(proposals::Column::CustomerId.eq(customer_id));
        }
        Ok(fetch_page(&self.db, query, page).await?)
    }

    /// Deletes a proposal and its project.
    pub async fn delete(&self, id: &str) -> Result<(), ProposalError> {
        let result = proposals::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ProposalError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn next_id(&self) -> Result<String, DbErr> {
        let row = self
            .db
            .query_one(Statement::from_string(
                DbBackend::Postgres,
                "SELECT nextval('proposal_number_seq') AS n",
            ))
            .await?
            .ok_or_else(|| DbErr::Custom("proposal_number_seq returned no row".to_string()))?;
        let n: i64 = row.try_get("", "n")?;
        Ok(format_proposal_id(n))
    }
}

/// Formats a sequence number as a proposal ID.
#[must_use]
pub fn format_proposal_id(n: i64) -> String {
    format!("PRO{n}")
}

fn to_i32(value: u32) -> Result<i32, DbErr> {
    i32::try_from(value).map_err(|_| DbErr::Custom(format!("value {value} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "PRO1")]
    #[case(1042, "PRO1042")]
    #[case(1_000_000, "PRO1000000")]
    fn test_format_proposal_id(#[case] n: i64, #[case] expected: &str) {
        assert_eq!(format_proposal_id(n), expected);
    }

    #[test]
    fn test_to_i32_range() {
        assert_eq!(to_i32(1200).unwrap(), 1200);
        assert!(to_i32(u32::MAX).is_err());
    }
}
