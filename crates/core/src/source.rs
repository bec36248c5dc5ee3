//! Image acquisition.
//!
//! This module abstracts "the user selects one image" behind the
//! [`ImageSource`] trait so the pipeline stays independent of any concrete
//! picker. A selection either yields an [`ImageRef`] or a cancellation
//! signal; cancellation is a value, never an error.
//!
//! # Example
//!
//! ```ignore
//! use photolabel_core::source::{ImageSource, PathSource, Selection};
//!
//! let mut source = PathSource::new("photo.jpg");
//! match source.select_image().await? {
//!     Selection::Picked(image) => println!("picked {}", image.display_name()),
//!     Selection::Cancelled => println!("cancelled"),
//! }
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::ImageFormat;

use crate::error::{AppError, Result};

/// Opaque handle to the bytes of a selected image.
///
/// An `ImageRef` is created on a successful selection and replaced wholesale
/// on each new selection; it is never partially mutated. The bytes may live
/// on disk or already in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Image bytes addressed by a filesystem path.
    Path(PathBuf),
    /// Image bytes already held in memory, with a short display name.
    Memory { name: String, bytes: Vec<u8> },
}

impl ImageRef {
    /// Creates a reference to an on-disk image.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Creates a reference to an in-memory image.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Memory {
            name: name.into(),
            bytes,
        }
    }

    /// A short human-readable name for notices and logs.
    pub fn display_name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Memory { name, .. } => name.clone(),
        }
    }

    /// Best-effort MIME type of the referenced bytes.
    ///
    /// Sniffed from the file extension for paths and from magic bytes for
    /// in-memory buffers. `None` when the format is unrecognised; the
    /// annotation provider accepts the bytes either way, so this is
    /// informational only.
    pub fn mime_type(&self) -> Option<&'static str> {
        let format = match self {
            Self::Path(path) => ImageFormat::from_path(path).ok()?,
            Self::Memory { bytes, .. } => image::guess_format(bytes).ok()?,
        };
        Some(format.to_mime_type())
    }
}

/// Outcome of one picker interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The user picked an image.
    Picked(ImageRef),
    /// The user dismissed the picker. Not a failure.
    Cancelled,
}

/// Capability that lets the user select one image.
///
/// Implementations wrap whatever the host provides: a file dialog, a path
/// argument, a share-sheet payload. A failed interaction (e.g. permission
/// denied) is an [`AppError::SelectionFailed`], distinct from the user
/// cancelling.
#[async_trait]
pub trait ImageSource: Send {
    /// Runs one selection interaction.
    async fn select_image(&mut self) -> Result<Selection>;
}

/// [`ImageSource`] over a caller-supplied filesystem path.
///
/// The CLI's stand-in for a host file picker: the "interaction" is a
/// metadata check that the path names a readable regular file.
pub struct PathSource {
    path: PathBuf,
}

impl PathSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ImageSource for PathSource {
    async fn select_image(&mut self) -> Result<Selection> {
        let metadata = tokio::fs::metadata(&self.path).await.map_err(|e| {
            AppError::selection(format!("{}: {}", self.path.display(), e))
        })?;

        if !metadata.is_file() {
            return Err(AppError::selection(format!(
                "{}: not a regular file",
                self.path.display()
            )));
        }

        let image = ImageRef::from_path(&self.path);
        log::debug!(
            "selected {} ({})",
            image.display_name(),
            image.mime_type().unwrap_or("unknown format")
        );

        Ok(Selection::Picked(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_sniffs_path_extension() {
        let image = ImageRef::from_path("holiday/cat.jpg");
        assert_eq!(image.mime_type(), Some("image/jpeg"));
    }

    #[test]
    fn mime_type_sniffs_memory_magic_bytes() {
        // Minimal PNG signature
        let bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let image = ImageRef::from_bytes("pasted", bytes);
        assert_eq!(image.mime_type(), Some("image/png"));
    }

    #[test]
    fn mime_type_is_none_for_unknown_bytes() {
        let image = ImageRef::from_bytes("noise", vec![0x00, 0x01, 0x02, 0x03]);
        assert_eq!(image.mime_type(), None);
    }

    #[tokio::test]
    async fn path_source_fails_for_missing_file() {
        let mut source = PathSource::new("/definitely/not/here.png");
        let err = source.select_image().await.unwrap_err();
        assert!(matches!(err, AppError::SelectionFailed(_)));
    }
}
