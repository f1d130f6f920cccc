use super::decision::RedirectTarget;

/// Route tables and redirect targets for the access gate.
///
/// All tables hold path *prefixes* matched with a plain `starts_with` test,
/// no glob or regex. Tables are ordered: entries are checked top to bottom
/// and the first match wins, so overlapping prefixes resolve
/// deterministically by insertion order.
///
/// [`new()`](GateConfig::new) carries the dashboard's route map. Every table
/// and target path can be overridden with `with_*` methods.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Paths reachable without a session.
    pub(crate) public_paths: Vec<String>,
    /// Sign-in/sign-up pages; authenticated users are bounced home.
    pub(crate) auth_paths: Vec<String>,
    /// Paths an unverified principal may still reach.
    pub(crate) verification_exempt_paths: Vec<String>,
    /// Ordered (prefix, required permission) pairs for non-Admin principals.
    pub(crate) permission_routes: Vec<(String, String)>,
    /// Route family reserved for employees (power-of-attorney desk).
    pub(crate) attorney_prefix: String,
    /// Permission administration screens, Admin only.
    pub(crate) permission_admin_prefix: String,
    login_path: String,
    unauthorized_path: String,
    verification_path: String,
    home_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GateConfig {
    /// Create a config with the dashboard's default route map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            public_paths: vec![
                "/login".into(),
                "/register".into(),
                "/forgot-password".into(),
                "/verification".into(),
            ],
            auth_paths: vec![
                "/login".into(),
                "/register".into(),
                "/forgot-password".into(),
            ],
            verification_exempt_paths: vec!["/verification".into()],
            permission_routes: vec![
                ("/cases".into(), "Cases".into()),
                ("/settlements".into(), "Settlements".into()),
                ("/mailbox".into(), "Mailbox".into()),
            ],
            attorney_prefix: "/attorneys".into(),
            permission_admin_prefix: "/settings/permissions".into(),
            login_path: "/login".into(),
            unauthorized_path: "/unauthorized".into(),
            verification_path: "/verification".into(),
            home_path: "/".into(),
        }
    }

    /// Replace the public path table.
    #[must_use]
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = paths;
        self
    }

    /// Replace the auth-page table.
    #[must_use]
    pub fn with_auth_paths(mut self, paths: Vec<String>) -> Self {
        self.auth_paths = paths;
        self
    }

    /// Replace the verification-exempt table.
    #[must_use]
    pub fn with_verification_exempt_paths(mut self, paths: Vec<String>) -> Self {
        self.verification_exempt_paths = paths;
        self
    }

    /// Replace the permission-route table.
    ///
    /// Entry order is evaluation order.
    #[must_use]
    pub fn with_permission_routes(mut self, routes: Vec<(String, String)>) -> Self {
        self.permission_routes = routes;
        self
    }

    /// Append a permission route after the existing entries.
    #[must_use]
    pub fn with_permission_route(
        mut self,
        prefix: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        self.permission_routes.push((prefix.into(), permission.into()));
        self
    }

    /// Override the employee-only route family prefix.
    #[must_use]
    pub fn with_attorney_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.attorney_prefix = prefix.into();
        self
    }

    /// Override the Admin-only permission administration prefix.
    #[must_use]
    pub fn with_permission_admin_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.permission_admin_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    #[must_use]
    pub fn with_unauthorized_path(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_path = path.into();
        self
    }

    #[must_use]
    pub fn with_verification_path(mut self, path: impl Into<String>) -> Self {
        self.verification_path = path.into();
        self
    }

    #[must_use]
    pub fn with_home_path(mut self, path: impl Into<String>) -> Self {
        self.home_path = path.into();
        self
    }

    /// Concrete path for a redirect target.
    #[must_use]
    pub fn target_path(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.login_path,
            RedirectTarget::Unauthorized => &self.unauthorized_path,
            RedirectTarget::VerificationRequired => &self.verification_path,
            RedirectTarget::Home => &self.home_path,
        }
    }
}
