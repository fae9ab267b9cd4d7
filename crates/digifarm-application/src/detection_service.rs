//! Drives a [`DetectionWorkflow`] with a real timer.
//!
//! The workflow itself is synchronous. This service owns it behind a mutex,
//! and on `analyze` spawns a one-shot task that sleeps for the configured
//! latency, classifies, and completes the workflow. Each task carries a
//! cancellation token so a later clear, cancel or teardown stops it.

use std::sync::Arc;
use std::time::Duration;

use digifarm_core::detection::{
    DetectionSnapshot, DetectionState, DetectionWorkflow, DiseaseClassifier, DroppedFile,
    PreviewHandle, PreviewStore, RandomSource,
};
use digifarm_core::error::{DigiFarmError, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to a running analysis.
#[derive(Debug)]
pub struct AnalysisHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl AnalysisHandle {
    /// Stops the analysis; the workflow falls back to `Staged`.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the task to finish, whether it completed or was cancelled.
    pub async fn wait(self) -> Result<()> {
        self.task
            .await
            .map_err(|e| DigiFarmError::internal(format!("analysis task failed: {}", e)))
    }
}

/// One visit to the detection screen.
pub struct DetectionService {
    workflow: Arc<Mutex<DetectionWorkflow>>,
    classifier: Arc<dyn DiseaseClassifier>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    delay: Duration,
    /// Cancelled on drop; every analysis token is a child of it.
    root: CancellationToken,
    current: Mutex<Option<CancellationToken>>,
}

impl DetectionService {
    pub fn new(
        previews: Arc<dyn PreviewStore>,
        classifier: Arc<dyn DiseaseClassifier>,
        rng: Box<dyn RandomSource>,
        delay: Duration,
    ) -> Self {
        Self {
            workflow: Arc::new(Mutex::new(DetectionWorkflow::new(previews))),
            classifier,
            rng: Arc::new(Mutex::new(rng)),
            delay,
            root: CancellationToken::new(),
            current: Mutex::new(None),
        }
    }

    /// Stages the first file of a drop.
    ///
    /// # Errors
    ///
    /// Unsupported media, an empty drop, or a drop during analysis. The
    /// workflow is unchanged in each case.
    pub async fn stage(&self, files: Vec<DroppedFile>) -> Result<PreviewHandle> {
        let mut workflow = self.workflow.lock().await;
        let staged = workflow.stage_drop(files).cloned();
        match staged {
            Ok(handle) => {
                tracing::info!(
                    target: "detection",
                    file = workflow.staged_image().map(|i| i.name()).unwrap_or_default(),
                    preview = %handle,
                    "Image staged"
                );
                Ok(handle)
            }
            Err(err) => {
                tracing::warn!(target: "detection", error = %err, "Image rejected");
                Err(err)
            }
        }
    }

    /// Starts the simulated analysis.
    ///
    /// Returns `None` without side effects unless an image is staged and no
    /// analysis is running.
    pub async fn analyze(&self) -> Option<AnalysisHandle> {
        let mut workflow = self.workflow.lock().await;
        let Some(ticket) = workflow.begin_analysis() else {
            tracing::debug!(
                target: "detection",
                state = %workflow.state(),
                "Analyze ignored"
            );
            return None;
        };

        let token = self.root.child_token();
        *self.current.lock().await = Some(token.clone());
        drop(workflow);

        tracing::info!(
            target: "detection",
            file = ticket.file_name(),
            delay_ms = self.delay.as_millis() as u64,
            "Analysis started"
        );

        let task_token = token.clone();
        let workflow = Arc::clone(&self.workflow);
        let classifier = Arc::clone(&self.classifier);
        let rng = Arc::clone(&self.rng);
        let delay = self.delay;

        let task = tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    if workflow.lock().await.abandon(&ticket) {
                        tracing::info!(target: "detection", file = ticket.file_name(), "Analysis cancelled");
                    }
                }
                _ = tokio::time::sleep(delay) => {
                    let outcome = {
                        let mut rng = rng.lock().await;
                        classifier.classify(ticket.file_name(), &mut **rng)
                    };
                    match &outcome {
                        Ok(record) => tracing::info!(
                            target: "detection",
                            file = ticket.file_name(),
                            disease = %record.name,
                            crop = %record.crop,
                            "Analysis finished"
                        ),
                        Err(err) => tracing::warn!(
                            target: "detection",
                            file = ticket.file_name(),
                            error = %err,
                            "Analysis failed"
                        ),
                    }
                    if !workflow.lock().await.complete(&ticket, outcome) {
                        tracing::debug!(target: "detection", "Discarded stale analysis result");
                    }
                }
            }
        });

        Some(AnalysisHandle { token, task })
    }

    /// Starts an analysis and waits for it to settle.
    ///
    /// Returns the snapshot afterwards; when nothing could be started the
    /// snapshot is simply the current state.
    pub async fn analyze_and_wait(&self) -> Result<DetectionSnapshot> {
        if let Some(handle) = self.analyze().await {
            handle.wait().await?;
        }
        Ok(self.snapshot().await)
    }

    /// Stops a running analysis, returning to `Staged`.
    pub async fn cancel(&self) -> bool {
        let mut workflow = self.workflow.lock().await;
        let cancelled = workflow.cancel_analysis();
        if let Some(token) = self.current.lock().await.take() {
            token.cancel();
        }
        cancelled
    }

    /// Drops the image and anything derived from it.
    pub async fn clear(&self) {
        let mut workflow = self.workflow.lock().await;
        workflow.clear();
        if let Some(token) = self.current.lock().await.take() {
            token.cancel();
        }
        tracing::debug!(target: "detection", "Workflow cleared");
    }

    pub async fn state(&self) -> DetectionState {
        self.workflow.lock().await.state()
    }

    pub async fn snapshot(&self) -> DetectionSnapshot {
        self.workflow.lock().await.snapshot()
    }
}

impl Drop for DetectionService {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl std::fmt::Debug for DetectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionService")
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digifarm_core::detection::{InMemoryPreviewStore, KeywordClassifier, SeededRandom};
    use digifarm_core::disease::DiseaseCatalog;

    const DELAY: Duration = Duration::from_millis(2000);

    fn service() -> (DetectionService, Arc<InMemoryPreviewStore>) {
        let store = Arc::new(InMemoryPreviewStore::new());
        let service = DetectionService::new(
            store.clone(),
            Arc::new(KeywordClassifier::new(Arc::new(DiseaseCatalog::builtin()))),
            Box::new(SeededRandom::new(11)),
            DELAY,
        );
        (service, store)
    }

    fn jpeg(name: &str) -> Vec<DroppedFile> {
        vec![DroppedFile::new(name, "image/jpeg", vec![0xFF, 0xD8])]
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_resolves_after_delay() {
        let (service, _store) = service();
        service.stage(jpeg("tomato_leaf.jpg")).await.unwrap();

        let started = tokio::time::Instant::now();
        let handle = service.analyze().await.expect("analysis should start");
        assert_eq!(service.state().await, DetectionState::Analyzing);

        handle.wait().await.unwrap();

        assert!(started.elapsed() >= DELAY);
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.state, DetectionState::Resolved);
        assert_eq!(snapshot.result.unwrap().crop, "Tomato");
    }

    #[tokio::test(start_paused = true)]
    async fn test_still_analyzing_before_delay() {
        let (service, _store) = service();
        service.stage(jpeg("apple.jpg")).await.unwrap();
        let _handle = service.analyze().await.unwrap();

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert_eq!(service.state().await, DetectionState::Analyzing);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(service.state().await, DetectionState::Resolved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_without_image_is_noop() {
        let (service, _store) = service();
        assert!(service.analyze().await.is_none());
        assert_eq!(service.state().await, DetectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_analyze_is_noop() {
        let (service, _store) = service();
        service.stage(jpeg("rose.jpg")).await.unwrap();
        let first = service.analyze().await.unwrap();
        assert!(service.analyze().await.is_none());

        first.wait().await.unwrap();
        assert_eq!(service.state().await, DetectionState::Resolved);
        // Resolved is not Staged either
        assert!(service.analyze().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_to_staged() {
        let (service, _store) = service();
        service.stage(jpeg("grape.jpg")).await.unwrap();
        let handle = service.analyze().await.unwrap();

        assert!(service.cancel().await);
        handle.wait().await.unwrap();

        tokio::time::sleep(DELAY * 2).await;
        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.state, DetectionState::Staged);
        assert!(snapshot.result.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_cancel_returns_to_staged() {
        let (service, _store) = service();
        service.stage(jpeg("grape.jpg")).await.unwrap();
        let handle = service.analyze().await.unwrap();

        handle.cancel();
        handle.wait().await.unwrap();

        assert_eq!(service.state().await, DetectionState::Staged);
        // and it can be analyzed again
        let again = service.analyze().await.unwrap();
        again.wait().await.unwrap();
        assert_eq!(service.state().await, DetectionState::Resolved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_during_analysis_discards_result() {
        let (service, store) = service();
        service.stage(jpeg("apple.jpg")).await.unwrap();
        let handle = service.analyze().await.unwrap();

        service.clear().await;
        handle.wait().await.unwrap();

        let snapshot = service.snapshot().await;
        assert_eq!(snapshot.state, DetectionState::Idle);
        assert!(snapshot.result.is_none());
        assert!(snapshot.preview_url.is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stage_rejected_during_analysis() {
        let (service, _store) = service();
        service.stage(jpeg("apple.jpg")).await.unwrap();
        let _handle = service.analyze().await.unwrap();

        let err = service.stage(jpeg("rose.jpg")).await.unwrap_err();
        assert!(matches!(err, DigiFarmError::InvalidState(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_drop() {
        let (service, _store) = service();
        let err = service
            .stage(vec![DroppedFile::new("leaf.bmp", "image/bmp", vec![])])
            .await
            .unwrap_err();
        assert!(err.is_unsupported_media());
        assert_eq!(service.state().await, DetectionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_preview_and_stops_task() {
        let (service, store) = service();
        service.stage(jpeg("apple.jpg")).await.unwrap();
        let handle = service.analyze().await.unwrap();

        drop(service);
        handle.wait().await.unwrap();

        assert_eq!(store.live_count(), 0);
        assert_eq!(store.revoked_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_and_wait() {
        let (service, _store) = service();
        service.stage(jpeg("unknown.jpg")).await.unwrap();
        let snapshot = service.analyze_and_wait().await.unwrap();
        assert_eq!(snapshot.state, DetectionState::Resolved);
        let catalog = DiseaseCatalog::builtin();
        assert!(catalog.contains(snapshot.result.as_ref().unwrap()));
    }
}
