#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    /// Selection missed the image or fell under the size limits
    #[error("Selection too small")]
    SelectionTooSmall,

    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("{0}")]
    Recognition(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
