use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::claims::decode_session_claims;
use crate::error::Error;
use crate::gate::{Decision, GateConfig, evaluate};

/// Cookie carrying the session bearer token.
pub const SESSION_COOKIE: &str = "__lawdesk_session";

/// Shared state for the gate middleware.
#[derive(Clone)]
pub struct GateState {
    config: Arc<GateConfig>,
    secret: Arc<str>,
    cookie_name: Arc<str>,
}

impl GateState {
    /// Create state from a gate config and the token decode secret.
    #[must_use]
    pub fn new(config: GateConfig, secret: impl Into<String>) -> Self {
        Self {
            config: Arc::new(config),
            secret: Arc::from(secret.into()),
            cookie_name: Arc::from(SESSION_COOKIE),
        }
    }

    /// Create state from environment variables, with the default route map.
    ///
    /// # Required env vars
    /// - `SESSION_SECRET`: secret the session tokens are signed with
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `SESSION_SECRET` is missing.
    pub fn from_env() -> Result<Self, Error> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| Error::Config("SESSION_SECRET is required".into()))?;
        Ok(Self::new(GateConfig::new(), secret))
    }

    /// Override the session cookie name.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = Arc::from(name.into());
        self
    }

    /// The route tables in effect.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

/// Gate middleware for `axum::middleware::from_fn_with_state`.
///
/// Reads the bearer token from the `Authorization` header or the session
/// cookie and decodes it; a decode failure of any kind counts as no session.
/// Allowed requests proceed with the decoded claims stored in request
/// extensions for the [`AuthClaims`](super::AuthClaims) extractor; blocked
/// requests are answered with a redirect to the configured target page.
pub async fn enforce(
    State(state): State<GateState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let token = bearer_token(req.headers())
        .map(str::to_owned)
        .or_else(|| jar.get(&state.cookie_name).map(|c| c.value().to_owned()));

    let claims = token.and_then(|t| decode_session_claims(&t, &state.secret).ok());

    match evaluate(&state.config, req.uri().path(), claims.as_ref()) {
        Decision::Allow => {
            if let Some(claims) = claims {
                req.extensions_mut().insert(claims);
            }
            next.run(req).await
        }
        Decision::Redirect(target) => {
            tracing::debug!(path = %req.uri().path(), ?target, "request gated");
            Redirect::to(state.config.target_path(target)).into_response()
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
