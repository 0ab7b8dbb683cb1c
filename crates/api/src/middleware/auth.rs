//! Role gate for protected routes.
//!
//! Every protected method route is registered through [`authorize`] with the
//! roles allowed to call it. The gate:
//! 1. Reads the session token (`Authorization: Bearer`, else `x-auth-token`)
//! 2. Verifies it (401 on failure)
//! 3. Checks the token role against the allow-list (403 on mismatch)
//! 4. Stores a [`Principal`] in request extensions for [`AuthUser`]

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use plantara_core::auth::Role;
use plantara_shared::JwtService;
use tracing::debug;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Legacy header some clients still send the token in.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Message returned when a protected route is called without a token.
pub const NO_TOKEN_MESSAGE: &str = "No token, authorization denied";

/// The authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// Customer or staff ID.
    pub id: Uuid,
    /// Session role.
    pub role: Role,
}

#[derive(Clone)]
struct RoleGate {
    jwt: Arc<JwtService>,
    allowed: &'static [Role],
}

/// Wraps `route` so only callers holding one of `allowed` reach it.
pub fn authorize(
    state: &AppState,
    allowed: &'static [Role],
    route: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let gate = RoleGate {
        jwt: Arc::clone(&state.jwt_service),
        allowed,
    };
    route.route_layer(middleware::from_fn_with_state(gate, role_gate))
}

/// Extracts the session token; a Bearer header wins over `x-auth-token`.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| {
            let (scheme, token) = value.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
        })
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        headers
            .get(LEGACY_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|token| !token.is_empty())
    })
}

async fn role_gate(State(gate): State<RoleGate>, mut request: Request, next: Next) -> Response {
    let Some(token) = extract_token(request.headers()) else {
        return ApiError::unauthorized(NO_TOKEN_MESSAGE).into_response();
    };

    let claims = match gate.jwt.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected session token");
            return ApiError::from(e).into_response();
        }
    };

    let Ok(role) = claims.role.parse::<Role>() else {
        return ApiError::unauthorized("Token is not valid").into_response();
    };

    if !role.is_one_of(gate.allowed) {
        debug!(subject = %claims.sub, role = %role, "Role not permitted for route");
        return ApiError::forbidden("Access denied").into_response();
    }

    request.extensions_mut().insert(Principal {
        id: claims.subject_id(),
        role,
    });
    next.run(request).await
}

/// Extractor for the caller authenticated by the role gate.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Caller's ID.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.0.id
    }

    /// Caller's role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.0.role
    }

    /// True for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.0.role == Role::Admin
    }

    /// True for customers.
    #[must_use]
    pub fn is_customer(&self) -> bool {
        self.0.role == Role::Customer
    }

    /// Fails with 403 unless the caller is a customer acting on their own
    /// record, or a staff-side user.
    pub fn ensure_can_view_customer(&self, customer_id: Uuid) -> Result<(), ApiError> {
        if self.is_customer() && self.id() != customer_id {
            return Err(ApiError::forbidden("Access denied"));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized(NO_TOKEN_MESSAGE))
    }
}
