//! Console route table.
//!
//! Each screen of the client maps to one route; the public dashboard
//! screens never touch the session, the admin screens require an
//! administrator, and the login screen is guest-only.

/// A navigable screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Public dashboard overview.
    Dashboard,
    /// Public listing of sampling methods.
    MethodsOverview,
    /// Public per-method dashboard.
    MethodDashboard(String),
    /// Admin sign-in screen.
    Login,
    /// Admin landing screen.
    AdminHome,
    /// Admin water-quality record management.
    AdminRecords,
}

/// Declared access requirements of a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteRequirements {
    /// Allowed unconditionally; the guard must not touch session state.
    pub public: bool,
    pub requires_auth: bool,
    pub requires_admin: bool,
    /// Only reachable while signed out (the login screen).
    pub requires_guest: bool,
}

impl Route {
    pub fn requirements(&self) -> RouteRequirements {
        match self {
            Route::Dashboard | Route::MethodsOverview | Route::MethodDashboard(_) => {
                RouteRequirements {
                    public: true,
                    ..Default::default()
                }
            }
            Route::Login => RouteRequirements {
                requires_guest: true,
                ..Default::default()
            },
            Route::AdminHome | Route::AdminRecords => RouteRequirements {
                requires_auth: true,
                requires_admin: true,
                ..Default::default()
            },
        }
    }

    /// Screen title shown in the console header.
    pub fn title(&self) -> String {
        match self {
            Route::Dashboard => "Water Quality Dashboard".to_string(),
            Route::MethodsOverview => "Sampling Methods".to_string(),
            Route::MethodDashboard(method) => format!("Dashboard: {method}"),
            Route::Login => "Admin Sign-in".to_string(),
            Route::AdminHome => "Admin Overview".to_string(),
            Route::AdminRecords => "Water Quality Records".to_string(),
        }
    }
}

/// One navigation attempt: the target plus its declared requirements,
/// captured at construction. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntent {
    pub route: Route,
    pub requirements: RouteRequirements,
}

impl RouteIntent {
    pub fn new(route: Route) -> Self {
        let requirements = route.requirements();
        Self {
            route,
            requirements,
        }
    }
}
