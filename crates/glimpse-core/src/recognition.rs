use kanal::{AsyncReceiver, AsyncSender};

use crate::error::OcrError;

/// Text recognition backend
#[async_trait::async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Engine identifier used in logs
    fn name(&self) -> &str;

    /// Recognize text in an encoded image.
    ///
    /// `language` is passed through untouched. Stage changes are reported on
    /// `progress` in the order they happen.
    async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &ProgressSink,
    ) -> Result<Recognized, OcrError>;
}

#[derive(Debug, Clone)]
pub struct Recognized {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    /// Free-form stage label, e.g. "loading image"
    pub stage: String,
    /// Completion in `[0, 1]` when the engine knows it
    pub fraction: Option<f32>,
}

/// Sending half of a job's progress subscription.
///
/// Once the subscriber drops its receiver, reports are silently discarded.
#[derive(Clone)]
pub struct ProgressSink {
    tx: AsyncSender<Progress>,
}

impl ProgressSink {
    pub fn channel() -> (Self, AsyncReceiver<Progress>) {
        let (tx, rx) = kanal::unbounded_async();
        (Self { tx }, rx)
    }

    /// Sink nobody listens to
    pub fn detached() -> Self {
        Self::channel().0
    }

    pub async fn report(&self, stage: impl Into<String>, fraction: Option<f32>) {
        let progress = Progress {
            stage: stage.into(),
            fraction,
        };

        if self.tx.send(progress).await.is_err() {
            tracing::trace!("progress subscriber detached, dropping report");
        }
    }
}
