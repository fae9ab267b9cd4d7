use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::image::{DroppedFile, ImageFile, accept_drop};
use super::preview::{PreviewHandle, PreviewLease, PreviewStore};
use crate::disease::DiseaseRecord;
use crate::error::{DigiFarmError, Result};

/// Lifecycle states of a detection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DetectionState {
    Idle,
    Staged,
    Analyzing,
    Resolved,
    Errored,
}

impl fmt::Display for DetectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DetectionState::Idle => "idle",
            DetectionState::Staged => "staged",
            DetectionState::Analyzing => "analyzing",
            DetectionState::Resolved => "resolved",
            DetectionState::Errored => "errored",
        };
        f.write_str(label)
    }
}

/// Proof that an analysis was started.
///
/// Completion must present the ticket it was started with; tickets from a
/// cancelled or cleared analysis no longer match and are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
    file_name: String,
}

impl AnalysisTicket {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Serializable view of the workflow for the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionSnapshot {
    pub state: DetectionState,
    pub file_name: Option<String>,
    pub preview_url: Option<String>,
    pub result: Option<DiseaseRecord>,
    pub error_message: Option<String>,
}

/// State machine driving one image from upload to diagnosis.
///
/// ```text
/// Idle --stage--> Staged --begin_analysis--> Analyzing --complete--> Resolved | Errored
///   ^               |  ^                         |
///   +-----clear-----+  +------cancel_analysis----+
/// ```
///
/// `clear` returns to `Idle` from every state. Staging a new image is allowed
/// from every state except `Analyzing`.
///
/// The timer that separates `begin_analysis` from `complete` lives outside
/// this type; see the application layer's detection service.
pub struct DetectionWorkflow {
    previews: Arc<dyn PreviewStore>,
    state: DetectionState,
    staged: Option<ImageFile>,
    preview: Option<PreviewLease>,
    result: Option<DiseaseRecord>,
    error_message: Option<String>,
    generation: u64,
}

impl DetectionWorkflow {
    pub fn new(previews: Arc<dyn PreviewStore>) -> Self {
        Self {
            previews,
            state: DetectionState::Idle,
            staged: None,
            preview: None,
            result: None,
            error_message: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    pub fn staged_image(&self) -> Option<&ImageFile> {
        self.staged.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref().map(PreviewLease::handle)
    }

    pub fn result(&self) -> Option<&DiseaseRecord> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.state == DetectionState::Analyzing
    }

    /// Stages an accepted image, replacing whatever was staged before.
    ///
    /// The previous preview is released before the new one is acquired.
    /// Refused while an analysis is running.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` while analyzing, or the preview store's error
    /// if a preview cannot be created (the workflow is then left `Idle`).
    pub fn stage(&mut self, image: ImageFile) -> Result<&PreviewHandle> {
        if self.is_analyzing() {
            return Err(DigiFarmError::invalid_state(
                "cannot stage a new image while analysis is running",
            ));
        }
        self.reset();
        let lease = PreviewLease::acquire(self.previews.clone(), &image)?;
        self.staged = Some(image);
        self.state = DetectionState::Staged;
        Ok(self.preview.insert(lease).handle())
    }

    /// Accepts a file drop, keeping only the first file, and stages it.
    ///
    /// A rejected drop leaves the workflow untouched.
    pub fn stage_drop(&mut self, files: Vec<DroppedFile>) -> Result<&PreviewHandle> {
        if self.is_analyzing() {
            return Err(DigiFarmError::invalid_state(
                "cannot stage a new image while analysis is running",
            ));
        }
        let image = accept_drop(files)?;
        self.stage(image)
    }

    /// Discards the staged image, preview, result and error. Always ends in
    /// `Idle`; a running analysis is abandoned.
    pub fn clear(&mut self) {
        self.reset();
    }

    /// Starts an analysis. Only valid from `Staged`; returns `None` (and
    /// changes nothing) otherwise.
    pub fn begin_analysis(&mut self) -> Option<AnalysisTicket> {
        if self.state != DetectionState::Staged {
            return None;
        }
        let file_name = self.staged.as_ref()?.name().to_string();
        self.generation += 1;
        self.state = DetectionState::Analyzing;
        self.error_message = None;
        Some(AnalysisTicket {
            generation: self.generation,
            file_name,
        })
    }

    /// Aborts a running analysis, returning to `Staged`.
    ///
    /// Returns `false` if nothing was running.
    pub fn cancel_analysis(&mut self) -> bool {
        if !self.is_analyzing() {
            return false;
        }
        self.generation += 1;
        self.state = DetectionState::Staged;
        true
    }

    /// Like [`DetectionWorkflow::cancel_analysis`], but only if `ticket` is
    /// still the running analysis. Used by the timer task when its own
    /// cancellation fires.
    pub fn abandon(&mut self, ticket: &AnalysisTicket) -> bool {
        if !self.is_analyzing() || ticket.generation != self.generation {
            return false;
        }
        self.cancel_analysis()
    }

    /// Applies the outcome of the analysis identified by `ticket`.
    ///
    /// Returns `false` and changes nothing when the ticket is stale (the
    /// analysis was cancelled, the image cleared or replaced).
    pub fn complete(&mut self, ticket: &AnalysisTicket, outcome: Result<DiseaseRecord>) -> bool {
        if !self.is_analyzing() || ticket.generation != self.generation {
            return false;
        }
        match outcome {
            Ok(record) => {
                self.result = Some(record);
                self.error_message = None;
                self.state = DetectionState::Resolved;
            }
            Err(err) => {
                self.result = None;
                self.error_message = Some(err.to_string());
                self.state = DetectionState::Errored;
            }
        }
        true
    }

    pub fn snapshot(&self) -> DetectionSnapshot {
        DetectionSnapshot {
            state: self.state,
            file_name: self.staged.as_ref().map(|i| i.name().to_string()),
            preview_url: self.preview().map(|p| p.url().to_string()),
            result: self.result.clone(),
            error_message: self.error_message.clone(),
        }
    }

    fn reset(&mut self) {
        // Dropping the lease revokes the preview.
        self.preview = None;
        self.staged = None;
        self.result = None;
        self.error_message = None;
        if self.is_analyzing() {
            self.generation += 1;
        }
        self.state = DetectionState::Idle;
    }
}

impl fmt::Debug for DetectionWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionWorkflow")
            .field("state", &self.state)
            .field("staged", &self.staged.as_ref().map(ImageFile::name))
            .field("preview", &self.preview())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::preview::InMemoryPreviewStore;
    use crate::disease::DiseaseCatalog;

    fn setup() -> (DetectionWorkflow, Arc<InMemoryPreviewStore>) {
        let store = Arc::new(InMemoryPreviewStore::new());
        (DetectionWorkflow::new(store.clone()), store)
    }

    fn image(name: &str) -> ImageFile {
        ImageFile::accept(DroppedFile::from_name(name, vec![1, 2, 3])).unwrap()
    }

    fn apple_scab() -> DiseaseRecord {
        DiseaseCatalog::builtin().get(3).cloned().unwrap()
    }

    #[test]
    fn test_starts_idle() {
        let (workflow, store) = setup();
        assert_eq!(workflow.state(), DetectionState::Idle);
        assert!(workflow.staged_image().is_none());
        assert!(workflow.preview().is_none());
        assert_eq!(store.created_count(), 0);
    }

    #[test]
    fn test_stage_creates_preview() {
        let (mut workflow, store) = setup();
        let handle = workflow.stage(image("apple.jpg")).unwrap().clone();

        assert_eq!(workflow.state(), DetectionState::Staged);
        assert_eq!(workflow.staged_image().unwrap().name(), "apple.jpg");
        assert!(store.is_live(&handle));
    }

    #[test]
    fn test_restaging_releases_previous_preview_once() {
        let (mut workflow, store) = setup();
        let first = workflow.stage(image("apple.jpg")).unwrap().clone();
        let second = workflow.stage(image("rose.png")).unwrap().clone();

        assert!(!store.is_live(&first));
        assert!(store.is_live(&second));
        assert_eq!(store.created_count(), 2);
        assert_eq!(store.revoked_count(), 1);
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_restaging_after_result_resets_result() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.complete(&ticket, Ok(apple_scab()));

        workflow.stage(image("grape.gif")).unwrap();

        assert_eq!(workflow.state(), DetectionState::Staged);
        assert!(workflow.result().is_none());
    }

    #[test]
    fn test_stage_drop_rejects_unsupported_and_keeps_state() {
        let (mut workflow, store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();

        let err = workflow
            .stage_drop(vec![DroppedFile::new("notes.txt", "text/plain", vec![])])
            .unwrap_err();

        assert!(err.is_unsupported_media());
        assert_eq!(workflow.state(), DetectionState::Staged);
        assert_eq!(workflow.staged_image().unwrap().name(), "apple.jpg");
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_analyze_requires_staged() {
        let (mut workflow, _store) = setup();
        assert!(workflow.begin_analysis().is_none());
        assert_eq!(workflow.state(), DetectionState::Idle);
    }

    #[test]
    fn test_analyze_is_not_reentrant() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("tomato.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        assert_eq!(ticket.file_name(), "tomato.jpg");

        assert!(workflow.begin_analysis().is_none());
        assert_eq!(workflow.state(), DetectionState::Analyzing);
    }

    #[test]
    fn test_analyze_after_resolution_is_noop() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.complete(&ticket, Ok(apple_scab()));

        assert!(workflow.begin_analysis().is_none());
        assert_eq!(workflow.state(), DetectionState::Resolved);
        assert_eq!(workflow.result(), Some(&apple_scab()));
    }

    #[test]
    fn test_analyze_after_error_is_noop() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("rose.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        let failure = DigiFarmError::classification("Unable to classify image");
        workflow.complete(&ticket, Err(failure));

        assert!(workflow.begin_analysis().is_none());
        assert_eq!(workflow.state(), DetectionState::Errored);
        assert!(workflow.result().is_none());
        assert_eq!(workflow.error_message(), Some("Unable to classify image"));
    }

    #[test]
    fn test_complete_ok_resolves() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();

        assert!(workflow.complete(&ticket, Ok(apple_scab())));

        assert_eq!(workflow.state(), DetectionState::Resolved);
        assert_eq!(workflow.result().unwrap().crop, "Apple");
        assert!(workflow.error_message().is_none());
    }

    #[test]
    fn test_complete_err_errors() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("rose.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();

        let failure = DigiFarmError::classification("Unable to classify image");
        assert!(workflow.complete(&ticket, Err(failure)));

        assert_eq!(workflow.state(), DetectionState::Errored);
        assert!(workflow.result().is_none());
        assert_eq!(workflow.error_message(), Some("Unable to classify image"));
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let stale = workflow.begin_analysis().unwrap();
        assert!(workflow.cancel_analysis());
        assert_eq!(workflow.state(), DetectionState::Staged);

        let fresh = workflow.begin_analysis().unwrap();
        assert!(!workflow.complete(&stale, Ok(apple_scab())));
        assert_eq!(workflow.state(), DetectionState::Analyzing);
        assert!(workflow.complete(&fresh, Ok(apple_scab())));
    }

    #[test]
    fn test_abandon_only_matches_current_ticket() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let first = workflow.begin_analysis().unwrap();
        workflow.cancel_analysis();
        let second = workflow.begin_analysis().unwrap();

        assert!(!workflow.abandon(&first));
        assert_eq!(workflow.state(), DetectionState::Analyzing);
        assert!(workflow.abandon(&second));
        assert_eq!(workflow.state(), DetectionState::Staged);
        assert!(!workflow.complete(&second, Ok(apple_scab())));
    }

    #[test]
    fn test_cancel_without_analysis() {
        let (mut workflow, _store) = setup();
        assert!(!workflow.cancel_analysis());
        workflow.stage(image("apple.jpg")).unwrap();
        assert!(!workflow.cancel_analysis());
        assert_eq!(workflow.state(), DetectionState::Staged);
    }

    #[test]
    fn test_stage_refused_while_analyzing() {
        let (mut workflow, store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        workflow.begin_analysis().unwrap();

        let err = workflow.stage(image("rose.jpg")).unwrap_err();
        assert!(matches!(err, DigiFarmError::InvalidState(_)));
        assert_eq!(workflow.staged_image().unwrap().name(), "apple.jpg");
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_clear_from_every_state() {
        // Staged
        let (mut workflow, store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        workflow.clear();
        assert_eq!(workflow.state(), DetectionState::Idle);
        assert_eq!(store.live_count(), 0);

        // Resolved
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.complete(&ticket, Ok(apple_scab()));
        workflow.clear();
        assert_eq!(workflow.state(), DetectionState::Idle);
        assert!(workflow.result().is_none());

        // Errored
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.complete(&ticket, Err(DigiFarmError::classification("nope")));
        workflow.clear();
        assert_eq!(workflow.state(), DetectionState::Idle);
        assert!(workflow.error_message().is_none());

        // Analyzing: the in-flight ticket goes stale
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.clear();
        assert!(!workflow.complete(&ticket, Ok(apple_scab())));
        assert_eq!(workflow.state(), DetectionState::Idle);
        assert!(workflow.result().is_none());

        assert_eq!(store.live_count(), 0);
        assert_eq!(store.created_count(), store.revoked_count());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut workflow, store) = setup();
        workflow.clear();
        workflow.stage(image("apple.jpg")).unwrap();
        workflow.clear();
        workflow.clear();
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn test_drop_releases_preview() {
        let (mut workflow, store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        drop(workflow);
        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);
    }

    #[test]
    fn test_snapshot() {
        let (mut workflow, _store) = setup();
        workflow.stage(image("apple.jpg")).unwrap();
        let ticket = workflow.begin_analysis().unwrap();
        workflow.complete(&ticket, Ok(apple_scab()));

        let snapshot = workflow.snapshot();
        assert_eq!(snapshot.state, DetectionState::Resolved);
        assert_eq!(snapshot.file_name.as_deref(), Some("apple.jpg"));
        assert!(snapshot.preview_url.is_some());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "resolved");
        assert_eq!(json["result"]["name"], "Apple Scab");
        assert!(json["errorMessage"].is_null());
    }
}
