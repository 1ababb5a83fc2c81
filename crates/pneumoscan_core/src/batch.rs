//! The batch of images selected for one prediction request.

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// One image chosen by the user. Bytes are read at selection time so that
/// previews render in selection order and encoding never re-reads disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// A selected file could not be read.
#[derive(Debug, Error)]
#[error("cannot read image {path}: {source}")]
pub struct BatchError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The ordered set of images submitted together in one prediction request.
///
/// Replaced wholesale on every selection and cleared explicitly; order is
/// whatever the file picker reported. The batch is an owned value handed
/// from the selection handler to the previewer and the predictor, so there
/// is no shared mutable list for overlapping operations to race on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    images: Vec<SelectedImage>,
}

impl Batch {
    /// Build a batch by reading every path up front, preserving order.
    /// Fails on the first unreadable file.
    pub fn from_paths<I, P>(paths: I) -> Result<Self, BatchError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut images = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let bytes = std::fs::read(path).map_err(|source| BatchError {
                path: path.to_path_buf(),
                source,
            })?;
            images.push(SelectedImage {
                path: path.to_path_buf(),
                bytes,
            });
        }
        Ok(Self { images })
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedImage> {
        self.images.iter()
    }

    /// Standard base64 of every image, in batch order. No data-URL prefix;
    /// the service expects the bare payload.
    pub fn to_base64(&self) -> Vec<String> {
        self.images
            .iter()
            .map(|img| STANDARD.encode(&img.bytes))
            .collect()
    }
}
