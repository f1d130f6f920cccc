use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Role name with blanket bypass semantics in the access gate.
pub const ADMIN_ROLE: &str = "Admin";

/// User type required for the attorney route family.
pub const EMPLOYEE_USER_TYPE: &str = "Employee";

/// Decoded claims from a session's bearer token.
///
/// Holding a `SessionClaims` proves the token decoded successfully with the
/// configured secret. A failed decode never yields claims with empty fields;
/// callers represent that case as `None` (unauthenticated).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Subject (account identifier).
    pub sub: String,
    /// Role names attached to the principal.
    #[serde(default)]
    pub roles: HashSet<String>,
    /// Principal category, e.g. `"Employee"`.
    #[serde(default)]
    pub user_type: Option<String>,
    /// Profile grants and verification flags.
    #[serde(default)]
    pub profile: Profile,
    /// Expiry, unix seconds. Validated during decode.
    pub exp: i64,
}

/// Profile section of the session claims.
///
/// Absent claims decode to their defaults: no grant is simply no grant,
/// never a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Named permission grants, matched by exact name.
    #[serde(default)]
    pub permissions: HashSet<String>,
    #[serde(default)]
    pub email_confirmed: bool,
    #[serde(default)]
    pub phone_number_confirmed: bool,
}

impl SessionClaims {
    /// Whether the principal carries the `Admin` role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(ADMIN_ROLE)
    }

    /// Whether the principal is an employee (attorney routes require this).
    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.user_type.as_deref() == Some(EMPLOYEE_USER_TYPE)
    }

    /// Whether both email and phone number are confirmed.
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.profile.email_confirmed && self.profile.phone_number_confirmed
    }

    /// Whether the profile holds the named permission (exact match).
    #[must_use]
    pub fn has_permission(&self, name: &str) -> bool {
        self.profile.permissions.contains(name)
    }
}

/// Decodes and validates a session bearer token (HS256).
///
/// Signature and `exp` are checked. Every failure collapses into
/// [`Error::Token`]; callers that only care about authenticated-or-not
/// treat any error as an absent session.
///
/// # Errors
///
/// Returns [`Error::Token`] if the token is malformed, the signature does
/// not verify against `secret`, or the token is expired.
pub fn decode_session_claims(token: &str, secret: &str) -> Result<SessionClaims, Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    jsonwebtoken::decode::<SessionClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| Error::Token(e.to_string()))
}
