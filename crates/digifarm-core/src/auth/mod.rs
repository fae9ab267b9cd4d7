//! Authentication and authorization domain module.
//!
//! # Module Structure
//!
//! - `model`: `Role`, `Session` and its serializable snapshot
//! - `credentials`: `CredentialVerifier` trait and the static demo table
//! - `manager`: `SessionManager`, the login/logout state machine
//! - `gate`: the pure authorization decision for protected views
//!
//! # Usage
//!
//! ```
//! use digifarm_core::auth::{AccessDecision, Role, SessionManager};
//!
//! let mut manager = SessionManager::default();
//! assert!(manager.login("Jana", "1234"));
//! assert_eq!(manager.authorize(Role::User), AccessDecision::Allow);
//! ```

mod credentials;
mod gate;
mod manager;
mod model;

// Re-export public API
pub use credentials::{Credential, CredentialVerifier, StaticCredentialStore};
pub use gate::{AccessDecision, authorize};
pub use manager::SessionManager;
pub use model::{Role, Session, SessionSnapshot};
