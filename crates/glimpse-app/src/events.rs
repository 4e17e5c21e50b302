use glimpse_types::AppEvent;
use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;

use crate::ocr_context::OcrContext;
use crate::session::Session;

pub mod load_image;
pub mod pointer;
pub mod recognize;

use load_image::handle_load_image;
use pointer::{handle_cancel, handle_pointer_down, handle_pointer_move, handle_release};
use recognize::handle_full_image;

/// App's main loop. Owns the session; returns on `Shutdown`, cancellation, or
/// when every input sender is gone.
pub async fn event_loop(
    ctx: OcrContext,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let container = {
        let config = ctx.state.config.read().await;
        glimpse_types::ViewportRect::new(0.0, 0.0, config.ui.preview_width, config.ui.preview_height)
    };
    let mut session = Session::new(container);

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        // Queued events are handled before cancellation is noticed
        let event = tokio::select! {
            biased;

            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
            _ = cancel.cancelled() => break,
        };

        tracing::trace!("[EVENT_LOOP] {:?}", event);
        if !handle_events(&ctx, &mut session, event).await? {
            break;
        }
    }

    session.dispose();
    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

/// Returns `false` when the loop should stop
pub async fn handle_events(
    ctx: &OcrContext,
    session: &mut Session,
    event: AppEvent,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::LoadImage(path) => {
            handle_load_image(ctx, session, path).await?;
        }
        AppEvent::PointerDown(point) => {
            handle_pointer_down(ctx, session, point).await;
        }
        AppEvent::PointerMove(point) => {
            handle_pointer_move(ctx, session, point).await;
        }
        AppEvent::PointerUp(point) | AppEvent::PointerLeave(point) => {
            handle_release(ctx, session, point).await;
        }
        AppEvent::CancelSelection => {
            handle_cancel(ctx, session).await;
        }
        AppEvent::RecognizeFullImage => {
            handle_full_image(ctx, session).await;
        }
        AppEvent::SetLanguage(language) => {
            tracing::info!("OCR language set to '{}'", language);
            ctx.state.config.write().await.ocr.language = language;
        }
        AppEvent::Shutdown => {
            tracing::info!("Shutdown requested");
            return Ok(false);
        }
        AppEvent::ImageLoaded { .. }
        | AppEvent::ImageLoadFailed(_)
        | AppEvent::SelectionOverlay(_)
        | AppEvent::SelectionCleared { .. }
        | AppEvent::JobUpdate(_) => {
            // Display-only events, ignore in backend
        }
    }

    Ok(true)
}
