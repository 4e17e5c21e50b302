use glimpse_core::OcrError;
use glimpse_core::geometry::map_selection_with_limits;
use glimpse_types::{AppEvent, Point};

use crate::coordinator::RecognitionSource;
use crate::ocr_context::OcrContext;
use crate::session::Session;

pub async fn handle_pointer_down(ctx: &OcrContext, session: &mut Session, point: Point) {
    let image_loaded = session.has_image();
    if session.selection.pointer_down(point, image_loaded) {
        ctx.notify(AppEvent::SelectionOverlay(session.overlay())).await;
    }
}

pub async fn handle_pointer_move(ctx: &OcrContext, session: &mut Session, point: Point) {
    if session.selection.pointer_move(point).is_some() {
        ctx.notify(AppEvent::SelectionOverlay(session.overlay())).await;
    }
}

/// Pointer released or left the preview: map the drag and, if it covers
/// enough of the image, recognize that region.
pub async fn handle_release(ctx: &OcrContext, session: &mut Session, point: Point) {
    let Some(selection) = session.selection.pointer_up(point) else {
        return;
    };
    ctx.notify(AppEvent::SelectionOverlay(None)).await;

    let Some(image) = session.image().cloned() else {
        ctx.notify(AppEvent::SelectionCleared { dispatched: false }).await;
        return;
    };

    let limits = ctx.state.config.read().await.selection.limits;
    let Some(rect) =
        map_selection_with_limits(&selection, &session.rendered(), image.natural(), &limits)
    else {
        tracing::debug!("{} ({:?}), ignoring", OcrError::SelectionTooSmall, selection);
        ctx.notify(AppEvent::SelectionCleared { dispatched: false }).await;
        return;
    };

    tracing::debug!("selection {:?} -> image region {:?}", selection, rect);

    let language = ctx.language().await;
    ctx.coordinator
        .start(RecognitionSource::Region { image, rect }, language)
        .await;
    ctx.notify(AppEvent::SelectionCleared { dispatched: true }).await;
}

pub async fn handle_cancel(ctx: &OcrContext, session: &mut Session) {
    if session.selection.cancel() {
        ctx.notify(AppEvent::SelectionOverlay(None)).await;
        ctx.notify(AppEvent::SelectionCleared { dispatched: false }).await;
    }
}
