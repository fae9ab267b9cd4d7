//! Image intake: turning a file drop into a staged image.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DigiFarmError, Result};

/// The image formats the detector accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Infers the MIME type from a filename extension using the `mime_guess` library.
pub fn infer_mime_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

/// A raw file as delivered by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    pub name: String,
    /// Declared MIME type; empty when the source did not supply one.
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl DroppedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            payload,
        }
    }

    /// Builds a drop whose MIME type is guessed from the file name.
    pub fn from_name(name: impl Into<String>, payload: Vec<u8>) -> Self {
        let name = name.into();
        let mime_type = infer_mime_type(&name);
        Self {
            name,
            mime_type,
            payload,
        }
    }
}

/// An accepted image, owned by the detection workflow while staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ImageFile {
    /// Validates a single dropped file.
    ///
    /// A missing MIME type is inferred from the file name.
    pub fn accept(file: DroppedFile) -> Result<Self> {
        let mime_type = if file.mime_type.trim().is_empty() {
            infer_mime_type(&file.name)
        } else {
            file.mime_type
        };
        let kind = ImageKind::from_mime(&mime_type)
            .ok_or_else(|| DigiFarmError::unsupported_media(&file.name, &mime_type))?;
        Ok(Self {
            name: file.name,
            kind,
            bytes: file.payload,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Accepts the first file of a drop and discards the rest.
pub fn accept_drop(files: Vec<DroppedFile>) -> Result<ImageFile> {
    let first = files
        .into_iter()
        .next()
        .ok_or_else(|| DigiFarmError::validation("No file was dropped"))?;
    ImageFile::accept(first)
}
