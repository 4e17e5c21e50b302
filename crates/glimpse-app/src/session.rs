use glimpse_core::SelectionTracker;
use glimpse_core::geometry::fit_contain;
use glimpse_ocr::LoadedImage;
use glimpse_types::ViewportRect;

/// The image currently on display, where it is drawn, and the drag over it.
///
/// Owned by the event loop; nothing else holds the image.
pub struct Session {
    container: ViewportRect,
    image: Option<LoadedImage>,
    rendered: ViewportRect,
    pub selection: SelectionTracker,
}

impl Session {
    /// `container` is the preview pane in viewport space
    pub fn new(container: ViewportRect) -> Self {
        Self {
            container,
            image: None,
            rendered: ViewportRect::default(),
            selection: SelectionTracker::new(),
        }
    }

    /// Show `image`, releasing the previous one
    pub fn replace_image(&mut self, image: LoadedImage) -> ViewportRect {
        self.selection.cancel();
        self.rendered = fit_contain(image.natural(), &self.container);

        if let Some(previous) = self.image.replace(image) {
            tracing::debug!("released {}", previous.path().display());
        }
        self.rendered
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Where the image is drawn inside the container
    pub fn rendered(&self) -> ViewportRect {
        self.rendered
    }

    pub fn overlay(&self) -> Option<ViewportRect> {
        self.selection.overlay(&self.container)
    }

    pub fn dispose(&mut self) {
        self.selection.cancel();
        self.rendered = ViewportRect::default();
        if let Some(image) = self.image.take() {
            tracing::debug!("session closed, released {}", image.path().display());
        }
    }
}
