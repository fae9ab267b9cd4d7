pub mod config_service;
pub mod file_preview_store;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::file_preview_store::FilePreviewStore;
pub use crate::paths::{DigiFarmPaths, PathError};
