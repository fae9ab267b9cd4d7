//! Preview store that materializes staged images on disk.
//!
//! Each preview is written to `{dir}/{uuid}.{ext}` and addressed with a
//! `file://` URL, so a terminal user can open it in an image viewer. The
//! file is removed when the preview is revoked.

use std::path::{Path, PathBuf};

use digifarm_core::detection::{ImageFile, PreviewHandle, PreviewStore};
use digifarm_core::error::Result;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FilePreviewStore {
    dir: PathBuf,
}

impl FilePreviewStore {
    /// Creates the store, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the file backing `handle`, if it is still on disk.
    pub fn file_for(&self, handle: &PreviewHandle) -> Option<PathBuf> {
        let prefix = handle.id().to_string();
        std::fs::read_dir(&self.dir)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .find(|path| path.file_stem().is_some_and(|stem| stem == prefix.as_str()))
    }
}

impl PreviewStore for FilePreviewStore {
    fn create(&self, image: &ImageFile) -> Result<PreviewHandle> {
        let id = Uuid::new_v4();
        let path = self.dir.join(format!("{}.{}", id, image.kind().extension()));
        std::fs::write(&path, image.bytes())?;
        tracing::debug!(
            target: "detection",
            file = image.name(),
            path = %path.display(),
            "Preview written"
        );
        Ok(PreviewHandle::new(id, format!("file://{}", path.display())))
    }

    fn revoke(&self, handle: &PreviewHandle) {
        let Some(path) = self.file_for(handle) else {
            return;
        };
        if let Err(e) = std::fs::remove_file(&path) {
            tracing::warn!(
                target: "detection",
                path = %path.display(),
                error = %e,
                "Failed to remove preview"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digifarm_core::detection::DroppedFile;
    use tempfile::TempDir;

    fn image(name: &str, bytes: &[u8]) -> ImageFile {
        ImageFile::accept(DroppedFile::from_name(name, bytes.to_vec())).unwrap()
    }

    #[test]
    fn test_create_then_revoke() {
        let dir = TempDir::new().unwrap();
        let store = FilePreviewStore::new(dir.path().join("previews")).unwrap();

        let handle = store.create(&image("leaf.png", b"png-bytes")).unwrap();
        let path = store.file_for(&handle).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
        assert!(handle.url().starts_with("file://"));

        store.revoke(&handle);
        assert!(!path.exists());
        assert!(store.file_for(&handle).is_none());

        // Revoking twice is harmless.
        store.revoke(&handle);
    }
}
