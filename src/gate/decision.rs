/// Routing decision produced by the access gate.
///
/// A blocked request is always answered with a redirect to a fixed target
/// page; the gate never partially serves protected content and never raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Serve the requested path.
    Allow,
    /// Send the client to a fixed target page instead.
    Redirect(RedirectTarget),
}

/// Fixed redirect targets.
///
/// Concrete paths come from [`GateConfig::target_path`](super::GateConfig::target_path),
/// so the decision itself stays independent of the consumer's URL layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Sign-in page, for requests with no valid session.
    Login,
    /// Access-denied page, for authenticated requests missing a grant.
    Unauthorized,
    /// Contact-verification page, for unverified principals.
    VerificationRequired,
    /// Dashboard home, for pages an authenticated user has no business on.
    Home,
}
