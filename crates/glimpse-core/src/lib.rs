pub mod error;
pub mod geometry;
pub mod recognition;
pub mod selection;

pub use error::OcrError;
pub use recognition::{Progress, ProgressSink, RecognitionEngine, Recognized};
pub use selection::SelectionTracker;
