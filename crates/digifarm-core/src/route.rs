//! Route table and navigation resolution.

use serde::Serialize;
use std::fmt;

use crate::auth::{AccessDecision, Role, Session, authorize};
use crate::error::{DigiFarmError, Result};

/// Every screen the front end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "route", content = "id", rename_all = "camelCase")]
pub enum Route {
    Login,
    AdminDashboard,
    UserDashboard,
    DiseaseDetection,
    Marketplace,
    ProductDetail(u32),
}

impl Route {
    /// Parses a path such as `/marketplace/3`.
    ///
    /// The bare root `/` maps to [`Route::Login`]. Trailing slashes are
    /// ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let route = match normalized {
            "" => Route::Login,
            "/login" => Route::Login,
            "/admin" => Route::AdminDashboard,
            "/dashboard" => Route::UserDashboard,
            "/disease-detection" => Route::DiseaseDetection,
            "/marketplace" => Route::Marketplace,
            other => {
                let id = other
                    .strip_prefix("/marketplace/")
                    .and_then(|id| id.parse::<u32>().ok())
                    .ok_or_else(|| DigiFarmError::not_found("route", trimmed))?;
                Route::ProductDetail(id)
            }
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::AdminDashboard => "/admin".to_string(),
            Route::UserDashboard => "/dashboard".to_string(),
            Route::DiseaseDetection => "/disease-detection".to_string(),
            Route::Marketplace => "/marketplace".to_string(),
            Route::ProductDetail(id) => format!("/marketplace/{}", id),
        }
    }

    /// The role a session needs to see this route; `None` for public routes.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Login => None,
            Route::AdminDashboard => Some(Role::Admin),
            Route::UserDashboard
            | Route::DiseaseDetection
            | Route::Marketplace
            | Route::ProductDetail(_) => Some(Role::User),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Result of asking to navigate somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub requested: Route,
    /// The route actually shown.
    pub resolved: Route,
    pub decision: AccessDecision,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        self.requested != self.resolved
    }
}

/// Works out which route to show for `requested` given `session`.
///
/// The login screen bounces an authenticated user to their home; protected
/// routes go through [`authorize`].
pub fn resolve(session: &Session, requested: Route) -> Navigation {
    let decision = match (requested.required_role(), session.role()) {
        (None, Some(role)) => AccessDecision::RedirectToHome(role),
        (None, None) => AccessDecision::Allow,
        (Some(required), _) => authorize(session, required),
    };
    let resolved = decision.redirect().unwrap_or(requested);
    Navigation {
        requested,
        resolved,
        decision,
    }
}
