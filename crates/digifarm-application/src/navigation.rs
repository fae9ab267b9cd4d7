//! Session-aware navigation.

use std::sync::Arc;

use digifarm_core::auth::SessionManager;
use digifarm_core::error::Result;
use digifarm_core::route::{Navigation, Route, resolve};
use tokio::sync::{Mutex, RwLock};

/// Tracks the current screen and applies the gate on every move.
#[derive(Debug)]
pub struct Navigator {
    sessions: Arc<RwLock<SessionManager>>,
    current: Mutex<Route>,
}

impl Navigator {
    /// Starts on the login screen.
    pub fn new(sessions: Arc<RwLock<SessionManager>>) -> Self {
        Self {
            sessions,
            current: Mutex::new(Route::Login),
        }
    }

    /// Navigates to `path`, following any redirect the gate imposes.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for paths outside the route table; the current
    /// route is unchanged.
    pub async fn navigate(&self, path: &str) -> Result<Navigation> {
        let route = Route::parse(path)?;
        Ok(self.go(route).await)
    }

    pub async fn go(&self, route: Route) -> Navigation {
        let navigation = {
            let manager = self.sessions.read().await;
            resolve(manager.session(), route)
        };
        if navigation.was_redirected() {
            tracing::debug!(
                target: "auth",
                requested = %navigation.requested,
                resolved = %navigation.resolved,
                "Redirected"
            );
        }
        *self.current.lock().await = navigation.resolved;
        navigation
    }

    /// Re-applies the gate to the current screen, e.g. after login or logout.
    pub async fn refresh(&self) -> Navigation {
        let route = *self.current.lock().await;
        self.go(route).await
    }

    pub async fn current(&self) -> Route {
        *self.current.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digifarm_core::auth::{AccessDecision, Role};

    fn navigator() -> (Navigator, Arc<RwLock<SessionManager>>) {
        let sessions = Arc::new(RwLock::new(SessionManager::default()));
        (Navigator::new(sessions.clone()), sessions)
    }

    #[tokio::test]
    async fn test_root_goes_to_login() {
        let (navigator, _) = navigator();
        let nav = navigator.navigate("/").await.unwrap();
        assert_eq!(nav.resolved, Route::Login);
        assert_eq!(navigator.current().await, Route::Login);
    }

    #[tokio::test]
    async fn test_unknown_path_keeps_current_route() {
        let (navigator, sessions) = navigator();
        sessions.write().await.login("Jana", "1234");
        navigator.navigate("/marketplace").await.unwrap();

        assert!(navigator.navigate("/nowhere").await.unwrap_err().is_not_found());
        assert_eq!(navigator.current().await, Route::Marketplace);
    }

    #[tokio::test]
    async fn test_refresh_after_login_and_logout() {
        let (navigator, sessions) = navigator();
        assert_eq!(navigator.refresh().await.resolved, Route::Login);

        sessions.write().await.login("triple charm", "12345");
        let nav = navigator.refresh().await;
        assert_eq!(nav.decision, AccessDecision::RedirectToHome(Role::Admin));
        assert_eq!(navigator.current().await, Route::AdminDashboard);

        sessions.write().await.logout();
        assert_eq!(navigator.refresh().await.resolved, Route::Login);
    }

    #[tokio::test]
    async fn test_user_cannot_reach_admin() {
        let (navigator, sessions) = navigator();
        sessions.write().await.login("Jana", "1234");
        let nav = navigator.navigate("/admin").await.unwrap();
        assert_eq!(nav.resolved, Route::UserDashboard);
        assert!(nav.was_redirected());
    }
}
