//! Request-time authorization gate.
//!
//! [`evaluate`] classifies one request into allow/redirect from the decoded
//! session claims and the static route tables in [`GateConfig`]. It is a pure
//! function: no I/O, no shared state, identical inputs give identical output.
//! Decoding the bearer token is the caller's job (the `middleware` feature
//! does it for axum consumers); a decode failure of any kind must be passed
//! in as `None`, never as empty claims.
//!
//! Rules are checked top to bottom and the first match wins. The order is a
//! contract: Admin bypass shadows the verification and permission gates, and
//! overlapping permission-route prefixes resolve by table order. Paths not
//! covered by any table are allowed once authenticated; only the listed
//! prefixes are gated.

mod config;
mod decision;

pub use config::GateConfig;
pub use decision::{Decision, RedirectTarget};

use crate::claims::SessionClaims;

/// Classify a request into a routing decision.
///
/// `path` is the normalized request path. `claims` is the decoded session,
/// or `None` when there is no session or the decode failed.
#[must_use]
pub fn evaluate(config: &GateConfig, path: &str, claims: Option<&SessionClaims>) -> Decision {
    // No session: only the public prefixes are reachable.
    let Some(claims) = claims else {
        if starts_with_any(&config.public_paths, path) {
            return Decision::Allow;
        }
        return Decision::Redirect(RedirectTarget::Login);
    };

    // Admin bypasses every later gate, but has no business on auth pages.
    if claims.is_admin() {
        if starts_with_any(&config.auth_paths, path) {
            return Decision::Redirect(RedirectTarget::Home);
        }
        return Decision::Allow;
    }

    if claims.is_verified() {
        // Verified users are bounced off the pages meant for the
        // not-yet-verified and the not-yet-signed-in.
        if starts_with_any(&config.verification_exempt_paths, path)
            || starts_with_any(&config.auth_paths, path)
        {
            return Decision::Redirect(RedirectTarget::Home);
        }
    } else if !starts_with_any(&config.verification_exempt_paths, path)
        && !starts_with_any(&config.public_paths, path)
    {
        return Decision::Redirect(RedirectTarget::VerificationRequired);
    }

    // Attorney desk is employee-only regardless of permissions.
    if path.starts_with(config.attorney_prefix.as_str()) && !claims.is_employee() {
        return Decision::Redirect(RedirectTarget::Unauthorized);
    }

    // Non-Admin reaching here; permission administration stays closed.
    if path.starts_with(config.permission_admin_prefix.as_str()) {
        return Decision::Redirect(RedirectTarget::Unauthorized);
    }

    // First matching permission route decides; later entries are not checked.
    if let Some((_, permission)) = config
        .permission_routes
        .iter()
        .find(|(prefix, _)| path.starts_with(prefix.as_str()))
    {
        if !claims.has_permission(permission) {
            return Decision::Redirect(RedirectTarget::Unauthorized);
        }
    }

    Decision::Allow
}

fn starts_with_any(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|p| path.starts_with(p.as_str()))
}
