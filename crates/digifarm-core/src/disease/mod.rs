//! Disease reference data.

mod catalog;
mod model;

pub use catalog::DiseaseCatalog;
pub use model::{DiseaseRecord, MedicalShop, Severity};
