//! The simulated disease classifier.
//!
//! Classification looks only at the file name: the first crop keyword found
//! narrows the catalog to that crop, then one candidate is drawn at random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

use crate::disease::{DiseaseCatalog, DiseaseRecord};
use crate::error::{DigiFarmError, Result};

/// Crop keywords in priority order, paired with the catalog crop name.
pub const CROP_KEYWORDS: [(&str, &str); 4] = [
    ("tomato", "Tomato"),
    ("apple", "Apple"),
    ("rose", "Rose"),
    ("grape", "Grape"),
];

/// Source of uniform random indices.
pub trait RandomSource: Send {
    /// Returns an index in `0..upper`. `upper` is always non-zero.
    fn next_index(&mut self, upper: usize) -> usize;
}

/// Thread-local entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_index(&mut self, upper: usize) -> usize {
        self.rng.gen_range(0..upper)
    }
}

/// Maps an image file name to a disease record.
pub trait DiseaseClassifier: Send + Sync {
    fn classify(&self, file_name: &str, rng: &mut dyn RandomSource) -> Result<DiseaseRecord>;
}

/// Keyword-on-file-name classifier over a [`DiseaseCatalog`].
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    catalog: Arc<DiseaseCatalog>,
}

impl KeywordClassifier {
    pub fn new(catalog: Arc<DiseaseCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// The crop selected by the first keyword in `file_name`, if any.
    pub fn detect_crop(file_name: &str) -> Option<&'static str> {
        let lowered = file_name.to_lowercase();
        CROP_KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, crop)| *crop)
    }

    /// Records eligible for `file_name`: the detected crop's records, or the
    /// whole catalog when no keyword matches.
    pub fn candidates(&self, file_name: &str) -> Vec<&DiseaseRecord> {
        match Self::detect_crop(file_name) {
            Some(crop) => self.catalog.by_crop(crop).collect(),
            None => self.catalog.records().iter().collect(),
        }
    }
}

impl DiseaseClassifier for KeywordClassifier {
    fn classify(&self, file_name: &str, rng: &mut dyn RandomSource) -> Result<DiseaseRecord> {
        let candidates = self.candidates(file_name);
        if candidates.is_empty() {
            return Err(DigiFarmError::classification(
                "Unable to classify image: no matching diseases in catalog",
            ));
        }
        let index = rng.next_index(candidates.len());
        candidates
            .get(index)
            .map(|record| (*record).clone())
            .ok_or_else(|| {
                DigiFarmError::internal(format!(
                    "random index {} out of range for {} candidates",
                    index,
                    candidates.len()
                ))
            })
    }
}
