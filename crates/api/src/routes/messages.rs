//! Contact-form message routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use plantara_core::{auth::Role, validation};
use plantara_db::{
    entities::messages,
    repositories::{CreateMessageInput, MessageRepository},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::{non_blank, normalize_email};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiPath, ApiQuery, Pagination},
    middleware::{AuthUser, authorize},
    response::{self, Envelope, ListEnvelope},
};

const MAX_NAME_LEN: usize = 100;
const MAX_SUBJECT_LEN: usize = 200;
const MAX_BODY_LEN: usize = 5000;

/// Creates the message routes.
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/message",
            post(submit_message).merge(authorize(state, Role::ADMIN, get(list_messages))),
        )
        .route(
            "/message/{id}/read",
            authorize(state, Role::ADMIN, put(mark_read)),
        )
        .route(
            "/message/{id}",
            authorize(state, Role::ADMIN, delete(delete_message)),
        )
}

/// Contact-form submission.
#[derive(Debug, Deserialize)]
pub struct SubmitMessageRequest {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Sender phone.
    pub phone: Option<String>,
    /// Subject line.
    pub subject: String,
    /// Message text.
    #[serde(alias = "message")]
    pub body: String,
}

/// Query parameters for listing messages.
#[derive(Debug, Default, Deserialize)]
pub struct MessageFilter {
    /// Only unread messages.
    #[serde(default)]
    pub unread: bool,
}

/// POST `/message` - Submit the public contact form.
async fn submit_message(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SubmitMessageRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<messages::Model>>)> {
    let name = validation::require_text("name", &req.name, MAX_NAME_LEN)?.to_string();
    let email = normalize_email(&req.email);
    validation::validate_email(&email)?;
    let phone = non_blank(req.phone);
    if let Some(phone) = &phone {
        validation::validate_phone(phone)?;
    }
    let subject = validation::require_text("subject", &req.subject, MAX_SUBJECT_LEN)?.to_string();
    let body = validation::require_text("body", &req.body, MAX_BODY_LEN)?.to_string();

    let message = MessageRepository::new(state.conn())
        .create(CreateMessageInput {
            name,
            email,
            phone,
            subject,
            body,
        })
        .await?;
    info!(message_id = %message.id, "Contact message received");
    Ok(response::created(message))
}

/// GET `/message` - List messages, newest first. `?unread=true` filters.
async fn list_messages(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<MessageFilter>,
    ApiQuery(page): Pagination,
) -> ApiResult<Json<ListEnvelope<messages::Model>>> {
    let messages = MessageRepository::new(state.conn())
        .list(filter.unread, &page)
        .await?;
    Ok(response::page(messages))
}

/// PUT `/message/{id}/read` - Mark a message as read.
async fn mark_read(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Envelope<messages::Model>>> {
    MessageRepository::new(state.conn())
        .mark_read(id)
        .await?
        .map(response::ok)
        .ok_or_else(|| ApiError::not_found("Message not found"))
}

/// DELETE `/message/{id}` - Delete a message.
async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    if !MessageRepository::new(state.conn()).delete(id).await? {
        return Err(ApiError::not_found("Message not found"));
    }
    info!(message_id = %id, deleted_by = %auth.id(), "Message deleted");
    Ok(response::message("Message deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{app, body_json, send, state, token};
    use rstest::rstest;
    use serde_json::json;

    #[tokio::test]
    async fn test_listing_messages_requires_admin() {
        let state = state();
        let staff = token(&state, Role::Staff);
        let response = send(app(&state), "GET", "/api/message", Some(&staff), None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(app(&state), "GET", "/api/message", None, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(json!({ "name": "", "email": "a@b.lk", "subject": "Hi", "body": "Hello" }))]
    #[case(json!({ "name": "Ravi", "email": "nope", "subject": "Hi", "body": "Hello" }))]
    #[case(json!({ "name": "Ravi", "email": "a@b.lk", "phone": "123", "subject": "Hi", "body": "Hello" }))]
    #[case(json!({ "name": "Ravi", "email": "a@b.lk", "subject": " ", "body": "Hello" }))]
    #[case(json!({ "name": "Ravi", "email": "a@b.lk", "subject": "Hi", "body": "" }))]
    #[tokio::test]
    async fn test_contact_form_validation(#[case] body: Value) {
        let state = state();
        let response = send(app(&state), "POST", "/api/message", None, Some(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], false);
    }

    #[test]
    fn test_message_alias_for_body() {
        let req: SubmitMessageRequest = serde_json::from_value(json!({
            "name": "Ravi",
            "email": "ravi@example.com",
            "subject": "Visit",
            "message": "Can I visit the nursery?",
        }))
        .unwrap();
        assert_eq!(req.body, "Can I visit the nursery?");
    }
}
