//! Credential verification.
//!
//! The session manager never sees passwords beyond handing them to a
//! [`CredentialVerifier`]. The bundled [`StaticCredentialStore`] holds a
//! fixed table and stands in for a real credential backend.

use serde::{Deserialize, Serialize};

use super::model::Role;

/// Capability to check a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    /// Returns the role granted to the pair, or `None` on mismatch.
    fn verify(&self, username: &str, password: &str) -> Option<Role>;
}

/// One row of a credential table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// In-memory credential table with exact, case-sensitive matching.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    entries: Vec<Credential>,
}

impl StaticCredentialStore {
    pub fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// The two demo accounts.
    pub fn demo() -> Self {
        Self::new(vec![
            Credential::new("triple charm", "12345", Role::Admin),
            Credential::new("Jana", "1234", Role::User),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticCredentialStore {
    fn default() -> Self {
        Self::demo()
    }
}

impl CredentialVerifier for StaticCredentialStore {
    fn verify(&self, username: &str, password: &str) -> Option<Role> {
        self.entries
            .iter()
            .find(|c| c.username == username && c.password == password)
            .map(|c| c.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_pairs() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.verify("triple charm", "12345"), Some(Role::Admin));
        assert_eq!(store.verify("Jana", "1234"), Some(Role::User));
    }

    #[test]
    fn test_matching_is_exact() {
        let store = StaticCredentialStore::demo();
        assert_eq!(store.verify("jana", "1234"), None);
        assert_eq!(store.verify("Jana ", "1234"), None);
        assert_eq!(store.verify("Jana", "12345"), None);
        assert_eq!(store.verify("triple charm", "1234"), None);
        assert_eq!(store.verify("Triple Charm", "12345"), None);
    }

    #[test]
    fn test_custom_table() {
        let store = StaticCredentialStore::new(vec![Credential::new("ravi", "secret", Role::User)]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.verify("ravi", "secret"), Some(Role::User));
        assert_eq!(store.verify("Jana", "1234"), None);
    }
}
