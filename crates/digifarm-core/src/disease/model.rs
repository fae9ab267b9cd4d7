//! Disease reference records.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        f.write_str(label)
    }
}

/// A shop stocking treatments for a disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalShop {
    pub name: String,
    pub location: String,
    pub phone: String,
    pub available_products: Vec<String>,
}

/// One entry of the disease catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRecord {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Crop name, capitalised (e.g. "Tomato").
    pub crop: String,
    pub severity: Severity,
    pub symptoms: Vec<String>,
    pub solutions: Vec<String>,
    pub medical_shops: Vec<MedicalShop>,
}
