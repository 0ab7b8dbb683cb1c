//! HTTP error envelope.
//!
//! Every failure leaves a handler as `{ "success": false, "error": "..." }`
//! with the status taken from [`AppError::status_code`]. Server-side detail
//! is logged and never returned.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plantara_core::{
    auth::PasswordError, inventory::StockError, project::LifecycleError, proposal::PlanError,
    validation::ValidationRuleError,
};
use plantara_db::repositories::{
    CustomerError, InventoryError, LandError, ProgressError, ProjectError, ProposalError,
    RoleError, ShipmentError, StaffError,
};
use plantara_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;
use validator::ValidationErrors;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`AppError`] on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with `message`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 403 with `message`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// 404 with `message`.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_server_error() {
            tracing::error!(error = %self.0, code = self.0.error_code(), "Request failed");
        }

        let mut body = json!({
            "success": false,
            "error": self.0.public_message(),
        });
        if let AppError::InsufficientStock { available, .. } = self.0 {
            body["available"] = json!(available);
        }

        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => Self::unauthorized("Token has expired"),
            JwtError::Invalid => Self::unauthorized("Token is not valid"),
            JwtError::MissingSecret | JwtError::EncodingError(_) => {
                Self(AppError::Internal(err.to_string()))
            }
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Insufficient {
                available,
                requested,
            } => Self(AppError::InsufficientStock {
                available,
                requested,
            }),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<ValidationRuleError> for ApiError {
    fn from(err: ValidationRuleError) -> Self {
        Self::validation(err.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation(describe_validation_errors(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::DuplicateEmail | CustomerError::DuplicateNic => {
                Self(AppError::Conflict(err.to_string()))
            }
            CustomerError::NotFound(_) => Self::not_found("Customer not found"),
            CustomerError::Database(e) => e.into(),
        }
    }
}

impl From<StaffError> for ApiError {
    fn from(err: StaffError) -> Self {
        match err {
            StaffError::DuplicateUsername(_) | StaffError::DuplicateEmail => {
                Self(AppError::Conflict(err.to_string()))
            }
            StaffError::RoleNotFound(_) => Self::not_found("Role not found"),
            StaffError::NotFound(_) => Self::not_found("Staff member not found"),
            StaffError::Database(e) => e.into(),
        }
    }
}

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::Duplicate(_) => Self(AppError::Conflict(err.to_string())),
            RoleError::Database(e) => e.into(),
        }
    }
}

impl From<ProposalError> for ApiError {
    fn from(err: ProposalError) -> Self {
        match err {
            ProposalError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            ProposalError::NotFound(_) => Self::not_found("Proposal not found"),
            ProposalError::Database(e) => e.into(),
        }
    }
}

impl From<ProjectError> for ApiError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::ProposalNotFound(_) => Self::not_found("Proposal not found"),
            ProjectError::StaffNotFound(_) => Self::not_found("Staff member not found"),
            ProjectError::NotFound(_) => Self::not_found("Project not found"),
            ProjectError::ProposalTaken(_) => Self(AppError::Conflict(err.to_string())),
            ProjectError::Lifecycle(e) => e.into(),
            ProjectError::Database(e) => e.into(),
        }
    }
}

impl From<ProgressError> for ApiError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::ProjectNotFound(_) => Self::not_found("Project not found"),
            ProgressError::NotFound(_) => Self::not_found("Progress entry not found"),
            ProgressError::Database(e) => e.into(),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::DuplicateName(_) => Self(AppError::Conflict(err.to_string())),
            InventoryError::NotFound(_) => Self::not_found("Inventory item not found"),
            InventoryError::Stock(e) => e.into(),
            InventoryError::Database(e) => e.into(),
        }
    }
}

impl From<LandError> for ApiError {
    fn from(err: LandError) -> Self {
        match err {
            LandError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            LandError::NotFound(_) => Self::not_found("Land not found"),
            LandError::Database(e) => e.into(),
        }
    }
}

impl From<ShipmentError> for ApiError {
    fn from(err: ShipmentError) -> Self {
        match err {
            ShipmentError::CustomerNotFound(_) => Self::not_found("Customer not found"),
            ShipmentError::InventoryNotFound(_) => Self::not_found("Inventory item not found"),
            ShipmentError::NotFound(_) => Self::not_found("Shipment not found"),
            ShipmentError::Stock(e) => e.into(),
            ShipmentError::Database(e) => e.into(),
        }
    }
}

/// First field error as a sentence, fields in alphabetical order.
fn describe_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields.into_iter().next().map_or_else(
        || "Invalid input".to_string(),
        |(field, errs)| {
            errs.first()
                .and_then(|e| e.message.as_ref())
                .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_server_errors_are_sanitized() {
        let response = ApiError::from(DbErr::Custom("relation \"x\" does not exist".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Server error");
    }

    #[tokio::test]
    async fn test_insufficient_stock_reports_available() {
        let response = ApiError::from(StockError::Insufficient {
            available: 5,
            requested: 10,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["available"], 5);
        assert_eq!(body["error"], "Insufficient stock");
    }

    #[tokio::test]
    async fn test_duplicate_customer_is_bad_request() {
        let response = ApiError::from(CustomerError::DuplicateEmail).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Customer already exists");
    }

    #[test]
    fn test_lifecycle_errors_are_validation() {
        let err = ApiError::from(ProjectError::Lifecycle(
            LifecycleError::StartDateWhilePending,
        ));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        assert_eq!(
            ApiError::from(JwtError::Expired).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(JwtError::MissingSecret).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
