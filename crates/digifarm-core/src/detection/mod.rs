//! Crop disease detection domain module.
//!
//! # Module Structure
//!
//! - `image`: file-drop intake and MIME filtering (`DroppedFile`, `ImageFile`)
//! - `preview`: preview handles and their scoped release (`PreviewLease`)
//! - `classifier`: the keyword-on-file-name classifier and random sources
//! - `workflow`: the `DetectionWorkflow` state machine
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use digifarm_core::detection::{
//!     DetectionState, DetectionWorkflow, DiseaseClassifier, DroppedFile, InMemoryPreviewStore,
//!     KeywordClassifier, SeededRandom,
//! };
//! use digifarm_core::disease::DiseaseCatalog;
//!
//! let mut workflow = DetectionWorkflow::new(Arc::new(InMemoryPreviewStore::new()));
//! workflow.stage_drop(vec![DroppedFile::from_name("tomato_leaf.jpg", vec![])]).unwrap();
//!
//! let ticket = workflow.begin_analysis().unwrap();
//! let classifier = KeywordClassifier::new(Arc::new(DiseaseCatalog::builtin()));
//! let outcome = classifier.classify(ticket.file_name(), &mut SeededRandom::new(1));
//! workflow.complete(&ticket, outcome);
//!
//! assert_eq!(workflow.state(), DetectionState::Resolved);
//! assert_eq!(workflow.result().unwrap().crop, "Tomato");
//! ```

mod classifier;
mod image;
mod preview;
mod workflow;

// Re-export public API
pub use classifier::{
    CROP_KEYWORDS, DiseaseClassifier, KeywordClassifier, RandomSource, SeededRandom, ThreadRandom,
};
pub use image::{DroppedFile, ImageFile, ImageKind, accept_drop, infer_mime_type};
pub use preview::{InMemoryPreviewStore, PreviewHandle, PreviewLease, PreviewStore};
pub use workflow::{AnalysisTicket, DetectionSnapshot, DetectionState, DetectionWorkflow};
