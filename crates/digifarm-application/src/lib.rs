//! Application layer for DigiFarm.
//!
//! This crate provides use case implementations that coordinate the domain
//! state machines with time: the simulated sign-in round trip, the timed
//! disease analysis, and session-aware navigation.

pub mod app;
pub mod detection_service;
pub mod login_usecase;
pub mod navigation;

pub use app::DigiFarmApp;
pub use detection_service::{AnalysisHandle, DetectionService};
pub use login_usecase::{INVALID_CREDENTIALS, LoginUseCase, MISSING_CREDENTIALS};
pub use navigation::Navigator;
