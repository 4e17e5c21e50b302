use std::sync::Arc;

use glimpse_types::AppEvent;
use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::coordinator::RecognitionCoordinator;
use crate::events::event_loop;
use crate::ocr_context::OcrContext;
use crate::state::AppState;
use crate::ui::{DisplayMode, ui_loop};

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    pub ui_to_app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app_to_ui: kanal::bounded_async(256), // progress bursts
            ui_to_app: kanal::bounded_async(64),  // pointer events
        }
    }
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    coordinator: Arc<RecognitionCoordinator>,
    cancel_token: CancellationToken,
}

impl AppController {
    pub async fn new(state: Arc<AppState>) -> Self {
        let channels = ChannelSet::new();
        let empty_placeholder = state.config.read().await.ocr.empty_placeholder.clone();
        let coordinator = Arc::new(RecognitionCoordinator::new(
            state.engine.clone(),
            empty_placeholder,
            channels.app_to_ui.0.clone(),
        ));

        Self {
            channels,
            state,
            coordinator,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Where input events (pointer, commands) go
    pub fn input(&self) -> AsyncSender<AppEvent> {
        self.channels.ui_to_app.0.clone()
    }

    /// Backend to display events, for callers that render themselves
    pub fn display(&self) -> AsyncReceiver<AppEvent> {
        self.channels.app_to_ui.1.clone()
    }

    pub fn coordinator(&self) -> Arc<RecognitionCoordinator> {
        self.coordinator.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Spawn the event loop, plus the terminal display when `display` is set
    pub fn spawn_tasks(&self, display: Option<DisplayMode>) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        let ctx = OcrContext::new(
            self.state.clone(),
            self.coordinator.clone(),
            self.channels.app_to_ui.0.clone(),
        );

        // Event loop
        tasks.spawn(event_loop(
            ctx,
            self.channels.ui_to_app.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Display loop
        if let Some(mode) = display {
            tasks.spawn(ui_loop(
                self.channels.app_to_ui.1.clone(),
                mode,
                self.cancel_token.child_token(),
            ));
        }

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
