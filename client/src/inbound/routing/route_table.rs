//! Path to access-class mapping.

use std::collections::BTreeMap;

use crate::domain::{CapabilityRequirement, DASHBOARD_PATH, LOGIN_PATH};

/// How a route is protected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteAccess {
    /// Evaluated by the capability policy.
    Guarded(CapabilityRequirement),
    /// Public, but signed-in users are sent to the dashboard (login and
    /// registration screens).
    GuestOnly,
    /// The catch-all page. Always renders.
    NotFound,
}

/// Declared routes. Paths not in the table resolve to
/// [`RouteAccess::NotFound`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteAccess>,
}

impl RouteTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `path` with the given access class.
    #[must_use]
    pub fn with_route(mut self, path: &str, access: RouteAccess) -> Self {
        self.routes.insert(normalize(path).to_owned(), access);
        self
    }

    /// The portal's route declarations.
    pub fn portal() -> Self {
        use CapabilityRequirement::{AdminOnly, AnyAuthenticated, ApprovedBarangayOnly};
        use RouteAccess::{GuestOnly, Guarded};

        Self::new()
            .with_route(LOGIN_PATH, GuestOnly)
            .with_route("/register", GuestOnly)
            .with_route(DASHBOARD_PATH, Guarded(AnyAuthenticated))
            .with_route("/profile", Guarded(AnyAuthenticated))
            .with_route("/notifications", Guarded(AnyAuthenticated))
            .with_route("/incidents", Guarded(AnyAuthenticated))
            .with_route("/admin/users", Guarded(AdminOnly))
            .with_route("/admin/barangays", Guarded(AdminOnly))
            .with_route("/admin/analytics", Guarded(AdminOnly))
            .with_route("/admin/incidents", Guarded(AdminOnly))
            .with_route("/incidents/report", Guarded(ApprovedBarangayOnly))
            .with_route("/population", Guarded(ApprovedBarangayOnly))
            .with_route("/analytics", Guarded(ApprovedBarangayOnly))
    }

    /// Access class for `path`; query strings, fragments, and a trailing
    /// slash are ignored.
    pub fn resolve(&self, path: &str) -> RouteAccess {
        self.routes
            .get(normalize(path))
            .copied()
            .unwrap_or(RouteAccess::NotFound)
    }

    /// Declared paths in lexical order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }
}

fn normalize(path: &str) -> &str {
    let route = path.split(['?', '#']).next().unwrap_or_default();
    match route.trim_end_matches('/') {
        "" => LOGIN_PATH,
        trimmed => trimmed,
    }
}
