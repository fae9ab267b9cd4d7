//! Preview resources for staged images.
//!
//! A preview is owned by a [`PreviewStore`] outside the workflow. The
//! workflow holds it through a [`PreviewLease`], which revokes the handle
//! when dropped, so a preview is released exactly once whether the image is
//! replaced, cleared, or the workflow itself goes away.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::image::ImageFile;
use crate::error::Result;

/// Display-only reference to a staged image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewHandle {
    id: Uuid,
    url: String,
}

impl PreviewHandle {
    pub fn new(id: Uuid, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Creates and releases preview handles.
pub trait PreviewStore: Send + Sync {
    fn create(&self, image: &ImageFile) -> Result<PreviewHandle>;

    /// Releases a handle. Called exactly once per created handle.
    fn revoke(&self, handle: &PreviewHandle);
}

/// A live preview that is revoked on drop.
pub struct PreviewLease {
    handle: PreviewHandle,
    store: Arc<dyn PreviewStore>,
}

impl PreviewLease {
    pub fn acquire(store: Arc<dyn PreviewStore>, image: &ImageFile) -> Result<Self> {
        let handle = store.create(image)?;
        Ok(Self { handle, store })
    }

    pub fn handle(&self) -> &PreviewHandle {
        &self.handle
    }
}

impl Drop for PreviewLease {
    fn drop(&mut self) {
        self.store.revoke(&self.handle);
    }
}

impl fmt::Debug for PreviewLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewLease")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

/// Keeps previews as `blob:` style URLs in memory and counts releases.
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    inner: Mutex<PreviewLedger>,
}

#[derive(Debug, Default)]
struct PreviewLedger {
    live: HashSet<Uuid>,
    created: usize,
    revoked: usize,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet revoked.
    pub fn live_count(&self) -> usize {
        self.ledger(|l| l.live.len())
    }

    pub fn created_count(&self) -> usize {
        self.ledger(|l| l.created)
    }

    pub fn revoked_count(&self) -> usize {
        self.ledger(|l| l.revoked)
    }

    pub fn is_live(&self, handle: &PreviewHandle) -> bool {
        self.ledger(|l| l.live.contains(&handle.id()))
    }

    fn ledger<T>(&self, f: impl FnOnce(&mut PreviewLedger) -> T) -> T {
        // A poisoned ledger is still consistent: every update is a single step.
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn create(&self, image: &ImageFile) -> Result<PreviewHandle> {
        let id = Uuid::new_v4();
        let handle = PreviewHandle::new(id, format!("blob:digifarm/{}#{}", id, image.name()));
        self.ledger(|l| {
            l.live.insert(id);
            l.created += 1;
        });
        Ok(handle)
    }

    fn revoke(&self, handle: &PreviewHandle) {
        self.ledger(|l| {
            if l.live.remove(&handle.id()) {
                l.revoked += 1;
            }
        });
    }
}
