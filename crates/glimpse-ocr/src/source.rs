use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glimpse_core::OcrError;
use glimpse_types::NaturalSize;
use image::ImageReader;

/// Encoded image bytes plus the pixel size read from its header.
///
/// Cloning is cheap; all clones share one buffer.
#[derive(Clone)]
pub struct LoadedImage {
    path: PathBuf,
    bytes: Arc<[u8]>,
    natural: NaturalSize,
}

impl LoadedImage {
    /// Read an image file and probe its dimensions
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, OcrError> {
        let path = path.as_ref().to_path_buf();
        let bytes = tokio::fs::read(&path).await?;
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: PathBuf, bytes: Vec<u8>) -> Result<Self, OcrError> {
        let (width, height) = ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| OcrError::ImageLoad(format!("{}: {e}", path.display())))?;

        Ok(Self {
            path,
            bytes: bytes.into(),
            natural: NaturalSize::new(width, height),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn natural(&self) -> NaturalSize {
        self.natural
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        self.bytes.clone()
    }
}

impl std::fmt::Debug for LoadedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedImage")
            .field("path", &self.path)
            .field("len", &self.bytes.len())
            .field("natural", &self.natural)
            .finish()
    }
}
