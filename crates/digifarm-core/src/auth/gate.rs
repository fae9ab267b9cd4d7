//! Authorization gate for protected routes.

use serde::Serialize;

use super::model::{Role, Session};
use crate::route::Route;

/// Outcome of checking a session against a required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "role", rename_all = "camelCase")]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    /// Authenticated, but for a different role; go to that role's home.
    RedirectToHome(Role),
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Where the caller should navigate instead, if anywhere.
    pub fn redirect(self) -> Option<Route> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin => Some(Route::Login),
            AccessDecision::RedirectToHome(role) => Some(role.home()),
        }
    }
}

/// Decides whether `session` may enter a view gated on `required`.
pub fn authorize(session: &Session, required: Role) -> AccessDecision {
    match session.role() {
        None => AccessDecision::RedirectToLogin,
        Some(role) if role == required => AccessDecision::Allow,
        Some(role) => AccessDecision::RedirectToHome(role),
    }
}
