//! The read-only disease catalog.

use super::model::{DiseaseRecord, MedicalShop, Severity};
use crate::error::{DigiFarmError, Result};

/// Immutable set of disease records.
///
/// There are no mutating methods; share it behind an `Arc` for the lifetime
/// of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiseaseCatalog {
    records: Vec<DiseaseRecord>,
}

impl DiseaseCatalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn new(records: Vec<DiseaseRecord>) -> Result<Self> {
        for (i, record) in records.iter().enumerate() {
            if records[..i].iter().any(|r| r.id == record.id) {
                return Err(DigiFarmError::validation(format!(
                    "Duplicate disease id {}",
                    record.id
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&DiseaseRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records whose crop equals `crop` exactly.
    pub fn by_crop<'a>(&'a self, crop: &'a str) -> impl Iterator<Item = &'a DiseaseRecord> + 'a {
        self.records.iter().filter(move |r| r.crop == crop)
    }

    pub fn contains(&self, record: &DiseaseRecord) -> bool {
        self.records.iter().any(|r| r == record)
    }

    /// The five built-in records covering tomato, apple, rose and grape.
    pub fn builtin() -> Self {
        Self {
            records: vec![
                record(
                    1,
                    "Tomato Late Blight",
                    "A fungal disease that affects tomato plants, causing dark lesions on leaves and fruit rot.",
                    "Tomato",
                    Severity::High,
                    &[
                        "Dark brown spots on leaves",
                        "White fuzzy growth on leaf undersides",
                        "Rotting fruits with greasy appearance",
                    ],
                    &[
                        "Apply copper-based fungicides",
                        "Remove and destroy infected plant parts",
                        "Ensure good air circulation between plants",
                        "Water at the base, avoiding wetting the foliage",
                    ],
                    vec![
                        shop(
                            "Green Solutions Agro Store",
                            "Main Market Road, Bangalore",
                            "+91 98765 43210",
                            &["Copper oxychloride", "Mancozeb fungicide"],
                        ),
                        shop(
                            "Farm Care Center",
                            "Agricultural Complex, Mysore",
                            "+91 98765 43211",
                            &["Bordeaux mixture", "Systemic fungicides"],
                        ),
                    ],
                ),
                record(
                    2,
                    "Tomato Leaf Curl Virus",
                    "A viral disease spread by whiteflies that causes severe curling and yellowing of leaves.",
                    "Tomato",
                    Severity::High,
                    &[
                        "Upward curling of leaves",
                        "Yellowing of leaf edges",
                        "Stunted plant growth",
                    ],
                    &[
                        "Use neem-based insecticides for whitefly control",
                        "Install yellow sticky traps",
                        "Remove and destroy infected plants",
                        "Plant resistant varieties",
                    ],
                    vec![shop(
                        "Krishi Seva Kendra",
                        "Rural Market, Hassan",
                        "+91 98765 43212",
                        &["Neem oil", "Yellow sticky traps"],
                    )],
                ),
                record(
                    3,
                    "Apple Scab",
                    "A fungal disease that affects apple trees, causing dark, scab-like lesions on leaves and fruit.",
                    "Apple",
                    Severity::Medium,
                    &[
                        "Olive-green to brown spots on leaves",
                        "Dark, crusty spots on fruits",
                        "Premature leaf drop",
                    ],
                    &[
                        "Apply preventative fungicide sprays",
                        "Rake and destroy fallen leaves",
                        "Prune to improve air circulation",
                        "Plant resistant apple varieties",
                    ],
                    vec![shop(
                        "Himalayan Agro Care",
                        "Shimla Market, HP",
                        "+91 98765 43213",
                        &["Myclobutanil", "Captan fungicide"],
                    )],
                ),
                record(
                    4,
                    "Rose Black Spot",
                    "A fungal disease that causes black spots on rose leaves, leading to yellowing and leaf drop.",
                    "Rose",
                    Severity::Medium,
                    &[
                        "Circular black spots on leaves",
                        "Yellowing around spots",
                        "Premature defoliation",
                    ],
                    &[
                        "Apply fungicides specifically for black spot",
                        "Remove and destroy infected leaves",
                        "Avoid overhead watering",
                        "Space plants for good air circulation",
                    ],
                    vec![shop(
                        "Garden Care Solutions",
                        "MG Road, Bangalore",
                        "+91 98765 43214",
                        &["Trifloxystrobin", "Propiconazole spray"],
                    )],
                ),
                record(
                    5,
                    "Grape Downy Mildew",
                    "A fungal disease affecting grape vines, causing yellow spots on leaves and fruit rot.",
                    "Grape",
                    Severity::High,
                    &[
                        "Yellow-green spots on upper leaf surface",
                        "White downy growth underneath",
                        "Brown, shriveled fruits",
                    ],
                    &[
                        "Apply copper-based fungicides",
                        "Improve vineyard drainage",
                        "Remove affected fruits",
                        "Maintain good air circulation",
                    ],
                    vec![shop(
                        "Vineyard Supplies",
                        "Nashik, Maharashtra",
                        "+91 98765 43215",
                        &["Metalaxyl", "Fosetyl-aluminum"],
                    )],
                ),
            ],
        }
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn shop(name: &str, location: &str, phone: &str, products: &[&str]) -> MedicalShop {
    MedicalShop {
        name: name.to_string(),
        location: location.to_string(),
        phone: phone.to_string(),
        available_products: strings(products),
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: u32,
    name: &str,
    description: &str,
    crop: &str,
    severity: Severity,
    symptoms: &[&str],
    solutions: &[&str],
    medical_shops: Vec<MedicalShop>,
) -> DiseaseRecord {
    DiseaseRecord {
        id,
        name: name.to_string(),
        description: description.to_string(),
        crop: crop.to_string(),
        severity,
        symptoms: strings(symptoms),
        solutions: strings(solutions),
        medical_shops,
    }
}
