//! Conversions between viewport space and image pixel space.
//!
//! The preview shows an image scaled to fit its container, so a rectangle the
//! user drags on screen has to be clipped to the image's rendered box and then
//! re-projected through two independent scale factors before it can be used as
//! a crop region.

use glimpse_types::{IntrinsicRect, NaturalSize, SelectionLimits, ViewportRect};

/// Overlap of two viewport rectangles, `None` when they do not touch
pub fn intersect(a: &ViewportRect, b: &ViewportRect) -> Option<ViewportRect> {
    let left = a.left.max(b.left);
    let top = a.top.max(b.top);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());

    if right <= left || bottom <= top {
        return None;
    }

    Some(ViewportRect::new(left, top, right - left, bottom - top))
}

/// Map a selection to image pixels using the default [`SelectionLimits`]
pub fn map_selection_to_intrinsic(
    selection: &ViewportRect,
    image_box: &ViewportRect,
    natural: NaturalSize,
) -> Option<IntrinsicRect> {
    map_selection_with_limits(selection, image_box, natural, &SelectionLimits::default())
}

/// Map a viewport selection onto the image's pixel grid.
///
/// `image_box` is where the image is currently rendered in viewport space.
/// Returns `None` when the selection misses the image, when the on-screen
/// overlap is smaller than `limits.min_display` on either axis, or when the
/// resulting crop is smaller than `limits.min_intrinsic` pixels.
pub fn map_selection_with_limits(
    selection: &ViewportRect,
    image_box: &ViewportRect,
    natural: NaturalSize,
    limits: &SelectionLimits,
) -> Option<IntrinsicRect> {
    if image_box.is_empty() || natural.width == 0 || natural.height == 0 {
        return None;
    }

    let visible = intersect(selection, image_box)?;
    if visible.width < limits.min_display || visible.height < limits.min_display {
        tracing::trace!(
            "selection overlap {:.1}x{:.1} below display minimum",
            visible.width,
            visible.height
        );
        return None;
    }

    let scale_x = natural.width as f64 / image_box.width;
    let scale_y = natural.height as f64 / image_box.height;

    let left = to_pixels((visible.left - image_box.left) * scale_x, natural.width);
    let top = to_pixels((visible.top - image_box.top) * scale_y, natural.height);

    let width = to_pixels(visible.width * scale_x, natural.width).min(natural.width - left);
    let height = to_pixels(visible.height * scale_y, natural.height).min(natural.height - top);

    if width < limits.min_intrinsic || height < limits.min_intrinsic {
        tracing::trace!("selection {}x{} px below intrinsic minimum", width, height);
        return None;
    }

    Some(IntrinsicRect::new(left, top, width, height))
}

/// Floor into `0..=max`
fn to_pixels(value: f64, max: u32) -> u32 {
    value.floor().clamp(0.0, max as f64) as u32
}

/// Rendered box of an image letterboxed into `container` ("contain" fit,
/// centered). Upscales small images the same way a preview pane would.
pub fn fit_contain(natural: NaturalSize, container: &ViewportRect) -> ViewportRect {
    if natural.width == 0 || natural.height == 0 || container.is_empty() {
        return ViewportRect::new(container.left, container.top, 0.0, 0.0);
    }

    let scale = (container.width / natural.width as f64)
        .min(container.height / natural.height as f64);
    let width = natural.width as f64 * scale;
    let height = natural.height as f64 * scale;

    ViewportRect::new(
        container.left + (container.width - width) / 2.0,
        container.top + (container.height - height) / 2.0,
        width,
        height,
    )
}
