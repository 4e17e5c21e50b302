use std::sync::Arc;

use glimpse_types::AppEvent;
use kanal::AsyncSender;

use crate::coordinator::RecognitionCoordinator;
use crate::state::AppState;

/// Shared dependencies of the event handlers
#[derive(Clone)]
pub struct OcrContext {
    pub state: Arc<AppState>,
    pub coordinator: Arc<RecognitionCoordinator>,
    /// Towards the display loop
    pub event_tx: AsyncSender<AppEvent>,
}

impl OcrContext {
    pub fn new(
        state: Arc<AppState>,
        coordinator: Arc<RecognitionCoordinator>,
        event_tx: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            state,
            coordinator,
            event_tx,
        }
    }

    pub async fn language(&self) -> String {
        self.state.config.read().await.ocr.language.clone()
    }

    /// Best effort send to the display; a closed display is not an error
    pub async fn notify(&self, event: AppEvent) {
        if self.event_tx.send(event).await.is_err() {
            tracing::trace!("display channel closed");
        }
    }
}
