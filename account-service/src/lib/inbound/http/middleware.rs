use auth::Authenticator;
use auth::IdentityClaim;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity attached to a request by the authentication gate.
///
/// Handlers take it as an extractor; it is only present when the gate admitted
/// the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount(pub IdentityClaim);

/// Why the gate rejected a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateRejection {
    #[error("Missing Authorization header")]
    MissingCredential,

    #[error("Invalid or expired token")]
    InvalidCredential,
}

/// A handler asked for the identity on a route the gate did not admit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No authenticated identity in request context")]
pub struct NoIdentityInContext;

impl From<GateRejection> for ApiError {
    fn from(rejection: GateRejection) -> Self {
        ApiError::Unauthorized(rejection.to_string())
    }
}

impl From<NoIdentityInContext> for ApiError {
    fn from(err: NoIdentityInContext) -> Self {
        tracing::error!(error = %err, "Identity requested outside the authentication gate");
        ApiError::Unauthorized("Unauthenticated".to_string())
    }
}

/// Middleware that verifies the request token and adds the identity to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = admit(&state.authenticator, req.headers())?;

    req.extensions_mut().insert(AuthenticatedAccount(identity));

    Ok(next.run(req).await)
}

/// Decide whether a request carrying `headers` is authenticated.
///
/// Every token failure collapses into `InvalidCredential`; the precise kind is
/// only logged.
pub fn admit(
    authenticator: &Authenticator,
    headers: &HeaderMap,
) -> Result<IdentityClaim, GateRejection> {
    let token = extract_token_from_header(headers)?;

    authenticator.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        GateRejection::InvalidCredential
    })
}

/// Accepts `Bearer <token>` as well as a bare token.
fn extract_token_from_header(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(GateRejection::MissingCredential)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| GateRejection::InvalidCredential)?;

    let token = match auth_str.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => auth_str.trim(),
    };

    if token.is_empty() {
        return Err(GateRejection::InvalidCredential);
    }

    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| NoIdentityInContext.into())
    }
}
