//! Sign-in flow in front of the session manager.

use std::sync::Arc;
use std::time::Duration;

use digifarm_core::auth::{SessionManager, SessionSnapshot};
use digifarm_core::error::{DigiFarmError, Result};
use tokio::sync::RwLock;

pub const MISSING_CREDENTIALS: &str = "Please enter both username and password";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Validates form input, waits out the simulated round trip, then logs in.
///
/// Holds the shared session; every view that needs the session gets the same
/// `Arc` rather than reaching for a global.
#[derive(Debug, Clone)]
pub struct LoginUseCase {
    sessions: Arc<RwLock<SessionManager>>,
    delay: Duration,
}

impl LoginUseCase {
    pub fn new(sessions: Arc<RwLock<SessionManager>>, delay: Duration) -> Self {
        Self { sessions, delay }
    }

    /// Attempts to sign in.
    ///
    /// # Errors
    ///
    /// - `Validation` with [`MISSING_CREDENTIALS`] if either field is blank;
    ///   no delay is applied and the session is not touched.
    /// - `Authentication` with [`INVALID_CREDENTIALS`] on mismatch; the
    ///   session is unchanged.
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionSnapshot> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Err(DigiFarmError::validation(MISSING_CREDENTIALS));
        }

        tokio::time::sleep(self.delay).await;

        let mut manager = self.sessions.write().await;
        if manager.login(username, password) {
            let snapshot = manager.session().snapshot();
            tracing::info!(
                target: "auth",
                username = %snapshot.username,
                role = ?snapshot.role,
                "Login succeeded"
            );
            Ok(snapshot)
        } else {
            tracing::warn!(target: "auth", username = %username, "Login rejected");
            Err(DigiFarmError::authentication(INVALID_CREDENTIALS))
        }
    }

    pub async fn logout(&self) {
        let mut manager = self.sessions.write().await;
        if manager.session().is_authenticated() {
            tracing::info!(target: "auth", username = %manager.session().username(), "Logout");
        }
        manager.logout();
    }

    pub async fn current(&self) -> SessionSnapshot {
        self.sessions.read().await.session().snapshot()
    }
}
