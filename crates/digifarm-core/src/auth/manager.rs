use std::sync::Arc;

use super::credentials::{CredentialVerifier, StaticCredentialStore};
use super::gate::{AccessDecision, authorize};
use super::model::{Role, Session};

/// Single source of truth for who is logged in and with what privilege.
///
/// `SessionManager` is responsible for:
/// - Holding the current [`Session`]
/// - Authenticating through an injected [`CredentialVerifier`]
/// - Answering authorization questions for protected views
///
/// Nothing is persisted; a new manager always starts anonymous.
pub struct SessionManager {
    session: Session,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionManager {
    /// Creates a manager with an anonymous session.
    ///
    /// # Arguments
    ///
    /// * `verifier` - The credential backend used by [`SessionManager::login`]
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            session: Session::anonymous(),
            verifier,
        }
    }

    /// Returns the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Attempts to log in.
    ///
    /// On a match the session becomes authenticated with the granted role and
    /// `true` is returned. On a mismatch the session is left untouched (an
    /// already logged-in user stays logged in) and `false` is returned.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        match self.verifier.verify(username, password) {
            Some(role) => {
                self.session = Session::authenticated(username, role);
                true
            }
            None => false,
        }
    }

    /// Resets to the anonymous session. Idempotent.
    pub fn logout(&mut self) {
        self.session = Session::anonymous();
    }

    /// Applies the authorization gate to the current session.
    pub fn authorize(&self, required: Role) -> AccessDecision {
        authorize(&self.session, required)
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Arc::new(StaticCredentialStore::demo()))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_login() {
        let mut manager = SessionManager::default();

        assert!(manager.login("triple charm", "12345"));

        let session = manager.session();
        assert_eq!(session.username(), "triple charm");
        assert_eq!(session.role(), Some(Role::Admin));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_user_login() {
        let mut manager = SessionManager::default();

        assert!(manager.login("Jana", "1234"));

        assert_eq!(manager.session().username(), "Jana");
        assert_eq!(manager.session().role(), Some(Role::User));
        assert!(manager.session().is_authenticated());
    }

    #[test]
    fn test_rejected_pairs_leave_session_anonymous() {
        let pairs = [
            ("Jana", "12345"),
            ("triple charm", "1234"),
            ("jana", "1234"),
            ("triple  charm", "12345"),
            ("admin", "admin"),
            ("Jana", ""),
            (" ", " "),
        ];

        for (username, password) in pairs {
            let mut manager = SessionManager::default();
            assert!(!manager.login(username, password), "{username}/{password}");
            assert_eq!(manager.session(), &Session::anonymous());
        }
    }

    #[test]
    fn test_failed_login_keeps_existing_session() {
        let mut manager = SessionManager::default();
        assert!(manager.login("Jana", "1234"));

        assert!(!manager.login("triple charm", "wrong"));

        assert_eq!(manager.session().username(), "Jana");
        assert_eq!(manager.session().role(), Some(Role::User));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let mut manager = SessionManager::default();
        manager.logout();
        assert_eq!(manager.session(), &Session::anonymous());

        assert!(manager.login("triple charm", "12345"));
        manager.logout();
        assert_eq!(manager.session(), &Session::anonymous());
        manager.logout();
        assert_eq!(manager.session(), &Session::anonymous());
    }

    #[test]
    fn test_authorize_follows_session() {
        let mut manager = SessionManager::default();
        assert_eq!(manager.authorize(Role::User), AccessDecision::RedirectToLogin);

        manager.login("Jana", "1234");
        assert_eq!(manager.authorize(Role::User), AccessDecision::Allow);
        assert_eq!(
            manager.authorize(Role::Admin),
            AccessDecision::RedirectToHome(Role::User)
        );
    }

    struct EveryoneIsUser;

    impl CredentialVerifier for EveryoneIsUser {
        fn verify(&self, _username: &str, _password: &str) -> Option<Role> {
            Some(Role::User)
        }
    }

    #[test]
    fn test_injected_verifier() {
        let mut manager = SessionManager::new(Arc::new(EveryoneIsUser));
        assert!(manager.login("anyone", "anything"));
        assert_eq!(manager.session().role(), Some(Role::User));
    }
}
