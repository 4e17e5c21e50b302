use std::path::PathBuf;

use glimpse_types::{AppEvent, JobSnapshot, JobStatus, NaturalSize, ViewportRect};

#[derive(Clone, Debug)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub natural: NaturalSize,
    pub rendered: ViewportRect,
}

/// Everything the display shows, folded from backend events
#[derive(Clone, Debug)]
pub struct DisplayStatus {
    pub image: Option<ImageInfo>,
    pub overlay: Option<ViewportRect>,
    pub job: JobSnapshot,
    pub finished_count: u64,
    pub error_count: u64,
}

impl DisplayStatus {
    pub fn new() -> Self {
        Self {
            image: None,
            overlay: None,
            job: JobSnapshot::idle(),
            finished_count: 0,
            error_count: 0,
        }
    }

    /// Fold one event in. Snapshots older than the one shown are ignored.
    pub fn apply(&mut self, event: &AppEvent) {
        match event {
            AppEvent::ImageLoaded {
                path,
                natural,
                rendered,
            } => {
                self.image = Some(ImageInfo {
                    path: path.clone(),
                    natural: *natural,
                    rendered: *rendered,
                });
                self.overlay = None;
            }
            AppEvent::SelectionOverlay(overlay) => {
                self.overlay = *overlay;
            }
            AppEvent::SelectionCleared { .. } => {
                self.overlay = None;
            }
            AppEvent::JobUpdate(job) => {
                if job.generation < self.job.generation {
                    return;
                }
                let newly_terminal = job.status.is_terminal()
                    && !(job.generation == self.job.generation && self.job.status.is_terminal());
                if newly_terminal {
                    self.finished_count += 1;
                    if job.status == JobStatus::Error {
                        self.error_count += 1;
                    }
                }
                self.job = job.clone();
            }
            _ => {}
        }
    }

    /// One-line summary, e.g. `recognizing text 50%`
    pub fn status_line(&self) -> String {
        format!("{} {}%", self.job.status_label(), self.job.progress_percent)
    }
}

impl Default for DisplayStatus {
    fn default() -> Self {
        Self::new()
    }
}
