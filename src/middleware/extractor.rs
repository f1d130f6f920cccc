use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::AuthError;
use crate::claims::SessionClaims;

/// Decoded session claims of an allowed request.
///
/// Use as an Axum extractor in route handlers behind
/// [`enforce`](super::enforce); the layer stores the claims in request
/// extensions when it lets a request through. Returns `401 Unauthorized`
/// when no claims are present (anonymous request on a public path, or the
/// layer is not mounted).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(AuthClaims(claims): AuthClaims) -> impl IntoResponse {
///     format!("hello, {}", claims.sub)
/// }
///
/// // Accessible to both authenticated and anonymous visitors:
/// async fn public(claims: Option<AuthClaims>) -> impl IntoResponse {
///     match claims {
///         Some(AuthClaims(c)) => format!("hello, {}", c.sub),
///         None => "hello, guest".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClaims(pub SessionClaims);

impl<S: Send + Sync> FromRequestParts<S> for AuthClaims {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionClaims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(AuthError::Unauthenticated)
    }
}

impl std::ops::Deref for AuthClaims {
    type Target = SessionClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
