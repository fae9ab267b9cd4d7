//! Application context: owns the shared session and hands out use cases.

use std::sync::Arc;
use std::time::Duration;

use digifarm_core::auth::SessionManager;
use digifarm_core::config::AppConfig;
use digifarm_core::detection::{
    DiseaseClassifier, KeywordClassifier, PreviewStore, RandomSource, SeededRandom, ThreadRandom,
};
use digifarm_core::disease::DiseaseCatalog;
use digifarm_core::error::Result;
use digifarm_core::marketplace::{ProductCatalog, ProductDetail, QuantitySelector};
use digifarm_core::route::{Navigation, Route, resolve};
use tokio::sync::RwLock;

use crate::detection_service::DetectionService;
use crate::login_usecase::LoginUseCase;
use crate::navigation::Navigator;

/// Wires every component from one [`AppConfig`].
///
/// There is exactly one `SessionManager` per app; it is shared with the
/// login use case and the navigator through the same `Arc`.
pub struct DigiFarmApp {
    sessions: Arc<RwLock<SessionManager>>,
    login: LoginUseCase,
    navigator: Navigator,
    diseases: Arc<DiseaseCatalog>,
    classifier: Arc<dyn DiseaseClassifier>,
    previews: Arc<dyn PreviewStore>,
    products: Arc<ProductCatalog>,
    analysis_delay: Duration,
    seed: Option<u64>,
}

impl DigiFarmApp {
    pub fn new(config: &AppConfig, previews: Arc<dyn PreviewStore>) -> Self {
        let sessions = Arc::new(RwLock::new(SessionManager::new(Arc::new(
            config.credential_store(),
        ))));
        let diseases = Arc::new(DiseaseCatalog::builtin());
        Self {
            login: LoginUseCase::new(sessions.clone(), config.login.delay()),
            navigator: Navigator::new(sessions.clone()),
            sessions,
            classifier: Arc::new(KeywordClassifier::new(diseases.clone())),
            diseases,
            previews,
            products: Arc::new(ProductCatalog::builtin()),
            analysis_delay: config.analysis.delay(),
            seed: None,
        }
    }

    /// Makes disease selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn DiseaseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn sessions(&self) -> Arc<RwLock<SessionManager>> {
        self.sessions.clone()
    }

    pub fn login(&self) -> &LoginUseCase {
        &self.login
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn diseases(&self) -> &DiseaseCatalog {
        &self.diseases
    }

    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    /// Enters the detection screen.
    ///
    /// Each successful call starts a fresh detection session; once handed
    /// out it no longer consults the session manager.
    ///
    /// # Errors
    ///
    /// Returns the redirect the gate imposed when the current session may
    /// not use detection.
    pub async fn open_detection(&self) -> std::result::Result<DetectionService, Navigation> {
        let navigation = self.gate(Route::DiseaseDetection).await?;
        tracing::debug!(target: "detection", route = %navigation.resolved, "Detection opened");
        Ok(DetectionService::new(
            self.previews.clone(),
            self.classifier.clone(),
            self.random_source(),
            self.analysis_delay,
        ))
    }

    /// Opens product `id`'s page with a fresh quantity selector.
    ///
    /// The outer error is the gate's redirect; the inner one is `NotFound`
    /// for ids outside the listing.
    pub async fn open_product(
        &self,
        id: u32,
    ) -> std::result::Result<Result<(ProductDetail, QuantitySelector)>, Navigation> {
        self.gate(Route::ProductDetail(id)).await?;
        Ok(self.products.detail(id).map(|detail| {
            let selector = QuantitySelector::new(detail.available_quantity);
            (detail.clone(), selector)
        }))
    }

    async fn gate(&self, route: Route) -> std::result::Result<Navigation, Navigation> {
        let navigation = {
            let manager = self.sessions.read().await;
            resolve(manager.session(), route)
        };
        if navigation.decision.is_allowed() {
            Ok(navigation)
        } else {
            Err(navigation)
        }
    }

    fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        }
    }
}

impl std::fmt::Debug for DigiFarmApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigiFarmApp")
            .field("analysis_delay", &self.analysis_delay)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
