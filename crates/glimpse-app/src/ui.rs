use glimpse_types::AppEvent;
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

use crate::status::DisplayStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Keep showing updates until shutdown
    Interactive,
    /// Stop after the first job settles or the request turns out to be a no-op
    OneShot,
}

/// Terminal display: progress goes to the log, recognized text to stdout
pub async fn ui_loop(
    app_to_ui_rx: AsyncReceiver<AppEvent>,
    mode: DisplayMode,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let one_shot = mode == DisplayMode::OneShot;
    let mut status = DisplayStatus::new();
    let mut last_line = String::new();

    loop {
        // Queued events are handled before cancellation is noticed
        let event = tokio::select! {
            biased;

            event = app_to_ui_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
            _ = cancel.cancelled() => break,
        };

        status.apply(&event);

        match &event {
            AppEvent::ImageLoaded {
                path,
                natural,
                rendered,
            } => {
                tracing::info!(
                    "[UI] {} {}x{} in preview box {:.1},{:.1} {:.1}x{:.1}",
                    path.display(),
                    natural.width,
                    natural.height,
                    rendered.left,
                    rendered.top,
                    rendered.width,
                    rendered.height
                );
            }
            AppEvent::ImageLoadFailed(message) => {
                if one_shot {
                    anyhow::bail!("could not load image: {message}");
                }
                tracing::error!("[UI] could not load image: {}", message);
            }
            AppEvent::SelectionOverlay(Some(rect)) => {
                tracing::debug!(
                    "[UI] selection {:.1},{:.1} {:.1}x{:.1}",
                    rect.left,
                    rect.top,
                    rect.width,
                    rect.height
                );
            }
            AppEvent::SelectionCleared { dispatched: false } if one_shot => {
                tracing::info!("[UI] selection does not cover enough of the image, nothing to do");
                return Ok(());
            }
            AppEvent::JobUpdate(job) if job.generation == status.job.generation => {
                let line = status.status_line();
                if line != last_line {
                    tracing::info!("[UI] {}", line);
                    last_line = line;
                }

                if job.status.is_terminal() {
                    if let Some(text) = &job.result_text {
                        println!("{}", text.trim_end());
                    }
                    if one_shot {
                        return Ok(());
                    }
                }
            }
            _ => {}
        }
    }

    tracing::debug!(
        "[UI] closed after {} jobs ({} failed)",
        status.finished_count,
        status.error_count
    );
    Ok(())
}
