//! Async tests for the coordinator and the pointer-to-recognition pipeline,
//! driven by a scripted engine instead of tesseract.

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use glimpse_core::{OcrError, ProgressSink, RecognitionEngine, Recognized};
use glimpse_types::{AppEvent, JobSnapshot};
use image::{ImageFormat, Rgba, RgbaImage};
use kanal::AsyncReceiver;
use tokio::sync::Notify;
use tokio::time::timeout;

mod coordinator_tests;

/// What the engine does on its next call
pub enum Script {
    Reply {
        text: String,
        stages: Vec<(&'static str, Option<f32>)>,
    },
    Fail(String),
    /// Report one stage, wait for `release`, then reply
    Gated {
        release: Arc<Notify>,
        text: String,
    },
}

impl Script {
    pub fn reply(text: &str) -> Self {
        Script::Reply {
            text: text.to_string(),
            stages: vec![("loading image", Some(0.0)), ("recognizing text", Some(0.5))],
        }
    }
}

#[derive(Default)]
pub struct ScriptedEngine {
    scripts: Mutex<VecDeque<Script>>,
    /// Images received, in call order
    pub received: Mutex<Vec<Vec<u8>>>,
}

impl ScriptedEngine {
    pub fn new(scripts: impl IntoIterator<Item = Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            received: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(
        &self,
        image: &[u8],
        _language: &str,
        progress: &ProgressSink,
    ) -> Result<Recognized, OcrError> {
        self.received.lock().unwrap().push(image.to_vec());
        let script = self.scripts.lock().unwrap().pop_front();

        match script {
            Some(Script::Reply { text, stages }) => {
                for (stage, fraction) in stages {
                    progress.report(stage, fraction).await;
                }
                Ok(Recognized { text })
            }
            Some(Script::Fail(message)) => Err(OcrError::Recognition(message)),
            Some(Script::Gated { release, text }) => {
                progress.report("loading image", Some(0.1)).await;
                release.notified().await;
                progress.report("recognizing text", Some(0.9)).await;
                Ok(Recognized { text })
            }
            None => Err(OcrError::Recognition("no script left".to_string())),
        }
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

/// Write a PNG to a unique temp path
pub fn png_file(width: u32, height: u32) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("glimpse-test-{}.png", uuid::Uuid::new_v4()));
    std::fs::write(&path, png(width, height)).unwrap();
    path
}

/// Collect display events until a terminal snapshot of `generation` arrives
pub async fn wait_for_terminal(
    rx: &AsyncReceiver<AppEvent>,
    generation: u64,
) -> (JobSnapshot, Vec<AppEvent>) {
    let mut seen = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for job to finish")
            .expect("display channel closed");

        if let AppEvent::JobUpdate(job) = &event {
            if job.generation == generation && job.status.is_terminal() {
                let job = job.clone();
                seen.push(event);
                return (job, seen);
            }
        }
        seen.push(event);
    }
}
