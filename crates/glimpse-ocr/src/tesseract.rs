use std::process::Stdio;

use glimpse_core::{OcrError, ProgressSink, RecognitionEngine, Recognized};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Recognition through the `tesseract` command line tool.
///
/// The image is piped on stdin and the text read back from stdout. The child
/// is killed if the recognition future is dropped.
pub struct TesseractEngine {
    binary: String,
    page_seg_mode: Option<u32>,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            page_seg_mode: None,
        }
    }

    pub fn with_page_seg_mode(mut self, psm: Option<u32>) -> Self {
        self.page_seg_mode = psm;
        self
    }

    /// Languages the installed tesseract has trained data for
    pub async fn list_languages(&self) -> Result<Vec<String>, OcrError> {
        let output = Command::new(&self.binary)
            .arg("--list-langs")
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract --list-langs failed: {}",
                stderr.trim()
            )));
        }

        Ok(parse_language_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn spawn_error(&self, e: std::io::Error) -> OcrError {
        OcrError::Recognition(format!(
            "failed to run {} (is tesseract installed?): {e}",
            self.binary
        ))
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

#[async_trait::async_trait]
impl RecognitionEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: &ProgressSink,
    ) -> Result<Recognized, OcrError> {
        progress.report("loading image", Some(0.0)).await;

        let mut command = Command::new(&self.binary);
        command.arg("stdin").arg("stdout").arg("-l").arg(language);
        if let Some(psm) = self.page_seg_mode {
            command.arg("--psm").arg(psm.to_string());
        }
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| OcrError::Recognition("tesseract stdin unavailable".to_string()))?;

        progress.report("recognizing text", Some(0.5)).await;

        // Feed stdin while collecting output so a full pipe can't stall either side
        let feed = async move {
            let result = stdin.write_all(image).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(format!(
                "tesseract failed: {}",
                stderr.trim()
            )));
        }
        if let Err(e) = fed {
            tracing::warn!("tesseract closed stdin early: {}", e);
        }

        progress.report("done", Some(1.0)).await;

        Ok(Recognized {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// `--list-langs` prints a header line followed by one language per line
fn parse_language_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
