use glimpse_types::AppEvent;

use crate::coordinator::RecognitionSource;
use crate::ocr_context::OcrContext;
use crate::session::Session;

pub async fn handle_full_image(ctx: &OcrContext, session: &mut Session) {
    let Some(image) = session.image().cloned() else {
        tracing::warn!("no image loaded, nothing to recognize");
        return;
    };

    if session.selection.cancel() {
        tracing::debug!("dropping in-progress drag for whole-image recognition");
        ctx.notify(AppEvent::SelectionOverlay(None)).await;
    }

    let language = ctx.language().await;
    ctx.coordinator
        .start(RecognitionSource::FullImage(image), language)
        .await;
}
