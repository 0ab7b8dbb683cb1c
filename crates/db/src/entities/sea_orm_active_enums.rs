//! Postgres enum types and their mapping onto the domain enums.

use plantara_core::project::ProjectStatus as DomainProjectStatus;
use plantara_core::proposal::{PaymentMode as DomainPaymentMode, ProjectType as DomainProjectType};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_type")]
pub enum ProjectType {
    #[sea_orm(string_value = "Agarwood")]
    Agarwood,
    #[sea_orm(string_value = "Sandalwood")]
    Sandalwood,
    #[sea_orm(string_value = "Vanilla")]
    Vanilla,
    #[sea_orm(string_value = "Other")]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[sea_orm(string_value = "full")]
    Full,
    #[sea_orm(string_value = "installments")]
    Installments,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Ongoing")]
    Ongoing,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl From<DomainProjectType> for ProjectType {
    fn from(value: DomainProjectType) -> Self {
        match value {
            DomainProjectType::Agarwood => Self::Agarwood,
            DomainProjectType::Sandalwood => Self::Sandalwood,
            DomainProjectType::Vanilla => Self::Vanilla,
            DomainProjectType::Other => Self::Other,
        }
    }
}

impl From<ProjectType> for DomainProjectType {
    fn from(value: ProjectType) -> Self {
        match value {
            ProjectType::Agarwood => Self::Agarwood,
            ProjectType::Sandalwood => Self::Sandalwood,
            ProjectType::Vanilla => Self::Vanilla,
            ProjectType::Other => Self::Other,
        }
    }
}

impl From<DomainPaymentMode> for PaymentMode {
    fn from(value: DomainPaymentMode) -> Self {
        match value {
            DomainPaymentMode::Full => Self::Full,
            DomainPaymentMode::Installments => Self::Installments,
        }
    }
}

impl From<PaymentMode> for DomainPaymentMode {
    fn from(value: PaymentMode) -> Self {
        match value {
            PaymentMode::Full => Self::Full,
            PaymentMode::Installments => Self::Installments,
        }
    }
}

impl From<DomainProjectStatus> for ProjectStatus {
    fn from(value: DomainProjectStatus) -> Self {
        match value {
            DomainProjectStatus::Pending => Self::Pending,
            DomainProjectStatus::Ongoing => Self::Ongoing,
            DomainProjectStatus::Completed => Self::Completed,
        }
    }
}

impl From<ProjectStatus> for DomainProjectStatus {
    fn from(value: ProjectStatus) -> Self {
        match value {
            ProjectStatus::Pending => Self::Pending,
            ProjectStatus::Ongoing => Self::Ongoing,
            ProjectStatus::Completed => Self::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_is_lossless() {
        for status in [
            DomainProjectStatus::Pending,
            DomainProjectStatus::Ongoing,
            DomainProjectStatus::Completed,
        ] {
            let stored: ProjectStatus = status.into();
            assert_eq!(DomainProjectStatus::from(stored), status);
            assert_eq!(stored.to_value(), status.as_str());
        }
    }

    #[test]
    fn test_payment_mode_values_match_wire_format() {
        assert_eq!(PaymentMode::from(DomainPaymentMode::Full).to_value(), "full");
        assert_eq!(
            PaymentMode::from(DomainPaymentMode::Installments).to_value(),
            "installments"
        );
    }
}
