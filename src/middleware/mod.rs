//! Request gating middleware for Axum.
//!
//! Wires the access gate into a router: every request's bearer token is
//! decoded and evaluated against the route tables, and blocked requests are
//! redirected to the configured target page before any handler runs.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lawdesk_auth::middleware::{AuthClaims, GateState, enforce};
//! use lawdesk_auth::GateConfig;
//!
//! let state = GateState::from_env()?; // SESSION_SECRET
//!
//! let app = axum::Router::new()
//!     .route("/cases", axum::routing::get(list_cases))
//!     .layer(axum::middleware::from_fn_with_state(state, enforce));
//!
//! async fn list_cases(AuthClaims(claims): AuthClaims) -> String {
//!     format!("cases for {}", claims.sub)
//! }
//! ```

mod error;
mod extractor;
mod layer;

pub use error::AuthError;
pub use extractor::AuthClaims;
pub use layer::{GateState, SESSION_COOKIE, enforce};
