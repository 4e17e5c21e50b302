use std::borrow::Cow;
use std::sync::Arc;

use glimpse_core::{OcrError, Progress, ProgressSink, RecognitionEngine, Recognized};
use glimpse_ocr::LoadedImage;
use glimpse_types::{AppEvent, IntrinsicRect, JobSnapshot, JobSource, JobStatus};
use kanal::AsyncSender;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// What a recognition job runs on
#[derive(Debug, Clone)]
pub enum RecognitionSource {
    FullImage(LoadedImage),
    Region {
        image: LoadedImage,
        rect: IntrinsicRect,
    },
}

impl RecognitionSource {
    fn kind(&self) -> JobSource {
        match self {
            RecognitionSource::FullImage(_) => JobSource::FullImage,
            RecognitionSource::Region { rect, .. } => JobSource::Region(*rect),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Finished(JobSnapshot),
    /// A newer job took over before this one finished
    Superseded,
}

pub struct JobHandle {
    pub id: Uuid,
    pub generation: u64,
    task: JoinHandle<JobOutcome>,
}

impl JobHandle {
    pub async fn outcome(self) -> anyhow::Result<JobOutcome> {
        Ok(self.task.await?)
    }
}

struct Shared {
    generation: u64,
    job: JobSnapshot,
    /// Subscription of the authoritative job
    cancel: Option<CancellationToken>,
    /// Mirror of `job` for waiters
    watch: watch::Sender<JobSnapshot>,
}

impl Shared {
    /// Called with the lock held so display order matches generation order.
    /// The display hears first: a `settled` waiter may shut it down.
    async fn publish(&self, updates: &AsyncSender<AppEvent>) {
        if updates.send(AppEvent::JobUpdate(self.job.clone())).await.is_err() {
            tracing::trace!("display channel closed, job update dropped");
        }
        self.watch.send_replace(self.job.clone());
    }
}

/// Runs recognition jobs and owns the displayable job state.
///
/// Only the most recently started job may touch that state. Every update is
/// stamped with the job's generation and checked under the lock, and starting
/// a job cancels the previous job's subscription.
pub struct RecognitionCoordinator {
    engine: Arc<dyn RecognitionEngine>,
    empty_placeholder: String,
    shared: Arc<Mutex<Shared>>,
    updates: AsyncSender<AppEvent>,
    settled_rx: watch::Receiver<JobSnapshot>,
}

impl RecognitionCoordinator {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        empty_placeholder: String,
        updates: AsyncSender<AppEvent>,
    ) -> Self {
        let (watch, settled_rx) = watch::channel(JobSnapshot::idle());
        Self {
            engine,
            empty_placeholder,
            shared: Arc::new(Mutex::new(Shared {
                generation: 0,
                job: JobSnapshot::idle(),
                cancel: None,
                watch,
            })),
            updates,
            settled_rx,
        }
    }

    pub async fn snapshot(&self) -> JobSnapshot {
        self.shared.lock().await.job.clone()
    }

    /// Wait until the authoritative job is no longer running. Returns at once
    /// when nothing was ever started. A job superseded meanwhile is not waited
    /// for; its successor is.
    pub async fn settled(&self) -> JobSnapshot {
        let mut rx = self.settled_rx.clone();
        let settled = rx
            .wait_for(|job| job.status != JobStatus::Running)
            .await
            .map(|job| job.clone());

        match settled {
            Ok(job) => job,
            Err(_) => self.snapshot().await,
        }
    }

    /// Start a job, superseding whatever is in flight
    pub async fn start(&self, source: RecognitionSource, language: String) -> JobHandle {
        let token = CancellationToken::new();

        let (id, generation) = {
            let mut shared = self.shared.lock().await;
            if let Some(previous) = shared.cancel.replace(token.clone()) {
                previous.cancel();
            }

            shared.generation += 1;
            shared.job = JobSnapshot {
                id: Uuid::new_v4(),
                generation: shared.generation,
                source: source.kind(),
                language: language.clone(),
                status: JobStatus::Running,
                stage: None,
                progress_percent: 0,
                result_text: None,
                error_message: None,
            };

            shared.publish(&self.updates).await;
            (shared.job.id, shared.generation)
        };

        tracing::info!(
            "job {} (gen {}) started on {:?} [{}] with {}",
            id,
            generation,
            source.kind(),
            language,
            self.engine.name()
        );

        let job = Job {
            engine: self.engine.clone(),
            shared: self.shared.clone(),
            updates: self.updates.clone(),
            empty_placeholder: self.empty_placeholder.clone(),
            generation,
            token,
        };

        JobHandle {
            id,
            generation,
            task: tokio::spawn(job.run(source, language)),
        }
    }
}

/// State a spawned job carries
struct Job {
    engine: Arc<dyn RecognitionEngine>,
    shared: Arc<Mutex<Shared>>,
    updates: AsyncSender<AppEvent>,
    empty_placeholder: String,
    generation: u64,
    token: CancellationToken,
}

impl Job {
    async fn run(self, source: RecognitionSource, language: String) -> JobOutcome {
        let (sink, progress_rx) = ProgressSink::channel();

        let recognition = recognize_source(self.engine.as_ref(), &source, &language, &sink);
        tokio::pin!(recognition);

        let result = loop {
            tokio::select! {
                biased;

                _ = self.token.cancelled() => {
                    tracing::debug!("job gen {} superseded, detaching", self.generation);
                    return JobOutcome::Superseded;
                }
                Ok(progress) = progress_rx.recv() => {
                    if !self.apply_progress(progress).await {
                        return JobOutcome::Superseded;
                    }
                }
                result = &mut recognition => break result,
            }
        };

        // Progress emitted right before completion still lands first
        while let Ok(Some(progress)) = progress_rx.try_recv() {
            if !self.apply_progress(progress).await {
                return JobOutcome::Superseded;
            }
        }

        self.finish(result).await
    }

    async fn apply_progress(&self, progress: Progress) -> bool {
        self.update(|job| {
            if let Some(fraction) = progress.fraction {
                job.progress_percent = to_percent(fraction);
            }
            job.stage = Some(progress.stage);
        })
        .await
        .is_some()
    }

    async fn finish(&self, result: Result<Recognized, OcrError>) -> JobOutcome {
        let placeholder = &self.empty_placeholder;

        let finished = self
            .update(|job| match result {
                Ok(recognized) => {
                    tracing::info!(
                        "job {} done: {} chars",
                        job.id,
                        recognized.text.trim().len()
                    );
                    job.status = JobStatus::Done;
                    job.progress_percent = 100;
                    job.result_text = Some(if recognized.text.trim().is_empty() {
                        placeholder.clone()
                    } else {
                        recognized.text
                    });
                }
                Err(e) => {
                    tracing::error!("job {} failed: {}", job.id, e);
                    job.status = JobStatus::Error;
                    job.result_text = Some(format!("Recognition failed: {e}"));
                    job.error_message = Some(e.to_string());
                }
            })
            .await;

        match finished {
            Some(job) => JobOutcome::Finished(job),
            None => JobOutcome::Superseded,
        }
    }

    /// Mutate and publish the job state if this job is still authoritative
    async fn update(&self, apply: impl FnOnce(&mut JobSnapshot)) -> Option<JobSnapshot> {
        let mut shared = self.shared.lock().await;
        if shared.generation != self.generation {
            tracing::debug!(
                "dropping update from gen {} (current gen {})",
                self.generation,
                shared.generation
            );
            return None;
        }

        apply(&mut shared.job);
        if shared.job.status.is_terminal() {
            shared.cancel = None;
        }

        shared.publish(&self.updates).await;
        Some(shared.job.clone())
    }
}

async fn recognize_source(
    engine: &dyn RecognitionEngine,
    source: &RecognitionSource,
    language: &str,
    progress: &ProgressSink,
) -> Result<Recognized, OcrError> {
    let image: Cow<'_, [u8]> = match source {
        RecognitionSource::FullImage(image) => Cow::Borrowed(image.bytes()),
        RecognitionSource::Region { image, rect } => {
            Cow::Owned(glimpse_ocr::rasterize(image, *rect).await?.png)
        }
    };

    engine.recognize(&image, language, progress).await
}

fn to_percent(fraction: f32) -> u8 {
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}
