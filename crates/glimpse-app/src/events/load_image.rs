use std::path::PathBuf;

use glimpse_ocr::LoadedImage;
use glimpse_types::AppEvent;

use crate::ocr_context::OcrContext;
use crate::session::Session;

pub async fn handle_load_image(
    ctx: &OcrContext,
    session: &mut Session,
    path: PathBuf,
) -> anyhow::Result<()> {
    match LoadedImage::open(&path).await {
        Ok(image) => {
            let natural = image.natural();
            let rendered = session.replace_image(image);
            tracing::info!(
                "loaded {} ({}x{}), shown at {:.1},{:.1} {:.1}x{:.1}",
                path.display(),
                natural.width,
                natural.height,
                rendered.left,
                rendered.top,
                rendered.width,
                rendered.height
            );

            ctx.notify(AppEvent::SelectionOverlay(None)).await;
            ctx.notify(AppEvent::ImageLoaded {
                path,
                natural,
                rendered,
            })
            .await;
        }
        Err(e) => {
            tracing::warn!("failed to load {}: {}", path.display(), e);
            ctx.notify(AppEvent::ImageLoadFailed(format!("{}: {e}", path.display())))
                .await;
        }
    }

    Ok(())
}
