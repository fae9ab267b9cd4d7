//! Domain core for DigiFarm.
//!
//! Pure, synchronous logic: the session state machine and authorization
//! gate, the route table, the disease catalog and detection workflow, and
//! the produce marketplace. Timers, configuration files and terminal I/O live
//! in the application, infrastructure and CLI crates.

pub mod auth;
pub mod config;
pub mod detection;
pub mod disease;
pub mod error;
pub mod marketplace;
pub mod route;

// Re-export common error type
pub use error::{DigiFarmError, Result};
