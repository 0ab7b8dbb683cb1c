//! API route definitions.

use axum::Router;
use plantara_shared::WelcomeRecipient;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::AppState;

pub mod customers;
pub mod health;
pub mod inventory;
pub mod lands;
pub mod messages;
pub mod progress;
pub mod projects;
pub mod proposals;
pub mod roles;
pub mod shipments;
pub mod staff;

/// Creates the API router. Protected routes carry their own role gate.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(customers::routes(state))
        .merge(staff::routes(state))
        .merge(roles::routes(state))
        .merge(proposals::routes(state))
        .merge(projects::routes(state))
        .merge(progress::routes(state))
        .merge(inventory::routes(state))
        .merge(lands::routes(state))
        .merge(messages::routes(state))
        .merge(shipments::routes(state))
}

/// Body returned by the login and registration endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse<U> {
    /// Always true.
    pub success: bool,
    /// Signed session token.
    pub token: String,
    /// Session role; omitted on registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    /// The account, without its password hash.
    pub user: U,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// Lowercases and trims an email address for storage and lookup.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trims an optional text field, treating blank as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims a patch field: absent stays absent, blank clears the column.
pub(crate) fn patch_text(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| non_blank(Some(v)))
}

/// Deserializes a patch field where `null` clears the value and an absent
/// key leaves it alone. Use with `#[serde(default)]`.
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Owned copy of a welcome mail, sent after the response is on its way.
pub(crate) struct WelcomeMail {
    pub email: String,
    pub full_name: String,
    pub username: Option<String>,
    pub initial_password: Option<String>,
}

/// Sends the welcome mail on a background task. Failures are logged only.
pub(crate) fn spawn_welcome(state: &AppState, mail: WelcomeMail) {
    let email_service = state.email_service.clone();
    tokio::spawn(async move {
        let recipient = WelcomeRecipient {
            email: &mail.email,
            full_name: &mail.full_name,
            username: mail.username.as_deref(),
            initial_password: mail.initial_password.as_deref(),
        };
        match email_service.send_welcome(&recipient).await {
            Ok(()) => info!(email = %mail.email, "Welcome email sent"),
            Err(e) => warn!(email = %mail.email, error = %e, "Failed to send welcome email"),
        }
    });
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Router harness backed by a disconnected database.

    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, Response, header::AUTHORIZATION},
    };
    use http_body_util::BodyExt;
    use plantara_core::auth::Role;
    use plantara_shared::{EmailConfig, EmailService, JwtConfig, JwtService};
    use sea_orm::DatabaseConnection;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::{AppState, create_router};

    pub fn state() -> AppState {
        AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default()).unwrap()),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
        }
    }

    pub fn app(state: &AppState) -> Router {
        create_router(state.clone())
    }

    pub fn token(state: &AppState, role: Role) -> String {
        state
            .jwt_service
            .issue(Uuid::new_v4(), role.as_str())
            .unwrap()
            .token
    }

    pub async fn send(
        app: Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    pub async fn body_json(response: Response<Body>) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), Some(None))]
    #[case(Some("   "), Some(None))]
    #[case(Some(" Colombo 07 "), Some(Some("Colombo 07")))]
    fn test_patch_text(#[case] input: Option<&str>, #[case] expected: Option<Option<&str>>) {
        let result = patch_text(input.map(ToString::to_string));
        assert_eq!(result, expected.map(|o| o.map(ToString::to_string)));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Nimal@Example.COM "), "nimal@example.com");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let state = test_support::state();
        let response =
            test_support::send(test_support::app(&state), "GET", "/api/health", None, None).await;
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(test_support::body_json(response).await["status"], "healthy");
    }
}
