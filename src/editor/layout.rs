use crate::geometry::{CropRect, MediaDimensions, MediaPoint, ScreenPoint, ScreenRect};

pub const PREVIEW_MARGIN: f64 = 10.0;
pub const PREVIEW_FOOTER: f64 = 15.0;
const REFERENCE_HEIGHT: f64 = 200.0;
const MAX_PREVIEW_HEIGHT: f64 = 400.0;
const MIN_CANVAS_ASPECT: f64 = 0.5;
const MIN_PREVIEW_HEIGHT: f64 = 150.0;

pub fn preview_height(canvas_width: f64, media: MediaDimensions) -> f64 {
    let canvas_width = canvas_width.max(1.0);
    let media_aspect = media.aspect();
    let canvas_aspect = canvas_width / REFERENCE_HEIGHT;

    let height = if media_aspect > canvas_aspect {
        canvas_width / media_aspect
    } else {
        let cap = MAX_PREVIEW_HEIGHT.min(canvas_width / MIN_CANVAS_ASPECT);
        (canvas_width / media_aspect).min(cap)
    };
    height.max(MIN_PREVIEW_HEIGHT)
}

pub fn compute_preview_size(widget_width: f64, media: MediaDimensions) -> f64 {
    preview_height(widget_width - PREVIEW_MARGIN * 2.0, media) + PREVIEW_FOOTER
}

/// Mapping from media space to node-local display space for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutFrame {
    pub canvas: ScreenRect,
    pub media_rect: ScreenRect,
    pub scale: f64,
    pub media: MediaDimensions,
}

impl LayoutFrame {
    pub fn derive(widget_width: f64, top: f64, media: MediaDimensions) -> Self {
        let canvas_width = (widget_width - PREVIEW_MARGIN * 2.0).max(1.0);
        let canvas_height = preview_height(canvas_width, media);
        let scale = (canvas_width / media.width_f64()).min(canvas_height / media.height_f64());
        let scaled_width = media.width_f64() * scale;
        let scaled_height = media.height_f64() * scale;
        let offset_x = PREVIEW_MARGIN + (canvas_width - scaled_width) / 2.0;
        let offset_y = top + (canvas_height - scaled_height) / 2.0;

        Self {
            canvas: ScreenRect::new(PREVIEW_MARGIN, top, canvas_width, canvas_height),
            media_rect: ScreenRect::new(offset_x, offset_y, scaled_width, scaled_height),
            scale,
            media,
        }
    }

    pub fn consumed_height(&self) -> f64 {
        self.canvas.height + PREVIEW_FOOTER
    }

    pub fn media_to_screen(&self, point: MediaPoint) -> ScreenPoint {
        ScreenPoint::new(
            self.media_rect.x + point.x * self.scale,
            self.media_rect.y + point.y * self.scale,
        )
    }

    /// Exact inverse of [`Self::media_to_screen`]; may land outside the media.
    pub fn screen_to_media_unclamped(&self, point: ScreenPoint) -> MediaPoint {
        MediaPoint::new(
            (point.x - self.media_rect.x) / self.scale,
            (point.y - self.media_rect.y) / self.scale,
        )
    }

    pub fn screen_to_media(&self, point: ScreenPoint) -> MediaPoint {
        let unclamped = self.screen_to_media_unclamped(point);
        MediaPoint::new(
            unclamped.x.clamp(0.0, self.media.width_f64()),
            unclamped.y.clamp(0.0, self.media.height_f64()),
        )
    }

    pub fn crop_to_screen(&self, rect: CropRect) -> ScreenRect {
        let origin = self.media_to_screen(MediaPoint::new(f64::from(rect.x), f64::from(rect.y)));
        ScreenRect::new(
            origin.x,
            origin.y,
            f64::from(rect.width) * self.scale,
            f64::from(rect.height) * self.scale,
        )
    }

    pub fn screen_distance_to_media(&self, distance: f64) -> f64 {
        distance / self.scale
    }
}
