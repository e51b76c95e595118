use std::sync::Arc;

use gtk4::cairo::{Context, FontSlant, FontWeight, Format, ImageSurface, Operator};
use image::RgbaImage;

use super::{Painter, TextAlign, TextStyle};
use crate::geometry::{RgbaColor, ScreenPoint, ScreenRect};

const FONT_FACE: &str = "Sans";

/// Converted surface of the last frame painted, reused while the same frame is shown.
#[derive(Debug, Default)]
pub struct FrameSurfaceCache {
    entry: Option<(Arc<RgbaImage>, ImageSurface)>,
}

impl FrameSurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holds(&self, frame: &Arc<RgbaImage>) -> bool {
        matches!(&self.entry, Some((cached, _)) if Arc::ptr_eq(cached, frame))
    }

    pub fn surface_for(&mut self, frame: &Arc<RgbaImage>) -> Option<&ImageSurface> {
        if !self.holds(frame) {
            self.entry =
                rgba_image_to_cairo_surface(frame).map(|surface| (Arc::clone(frame), surface));
        }
        self.entry.as_ref().map(|(_, surface)| surface)
    }
}

pub struct CairoPainter<'a> {
    context: &'a Context,
    surfaces: &'a mut FrameSurfaceCache,
}

impl<'a> CairoPainter<'a> {
    pub fn new(context: &'a Context, surfaces: &'a mut FrameSurfaceCache) -> Self {
        Self { context, surfaces }
    }

    fn set_source(&self, color: RgbaColor) {
        let (red, green, blue, alpha) = color.to_cairo_rgba();
        self.context.set_source_rgba(red, green, blue, alpha);
    }
}

impl Painter for CairoPainter<'_> {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        self.set_source(color);
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        let _ = self.context.fill();
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: RgbaColor, line_width: f64) {
        self.set_source(color);
        self.context.set_line_width(line_width);
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        let _ = self.context.stroke();
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: RgbaColor, line_width: f64) {
        self.set_source(color);
        self.context.set_line_width(line_width);
        self.context.move_to(from.x, from.y);
        self.context.line_to(to.x, to.y);
        let _ = self.context.stroke();
    }

    fn mask_outside(&mut self, area: ScreenRect, hole: ScreenRect, color: RgbaColor) {
        // The hole is cleared inside a group so the media underneath stays visible.
        self.context.push_group();
        self.set_source(color);
        self.context.rectangle(area.x, area.y, area.width, area.height);
        let _ = self.context.fill();
        self.context.set_operator(Operator::Clear);
        self.context.rectangle(hole.x, hole.y, hole.width, hole.height);
        let _ = self.context.fill();
        self.context.set_operator(Operator::Over);
        if self.context.pop_group_to_source().is_ok() {
            let _ = self.context.paint();
        }
    }

    fn text(&mut self, text: &str, at: ScreenPoint, style: TextStyle) {
        self.set_source(style.color);
        self.context.select_font_face(FONT_FACE, FontSlant::Normal, FontWeight::Normal);
        self.context.set_font_size(style.size);
        let x = match style.align {
            TextAlign::Left => at.x,
            TextAlign::Center => {
                let advance = self
                    .context
                    .text_extents(text)
                    .map(|extents| extents.x_advance())
                    .unwrap_or(0.0);
                at.x - advance / 2.0
            }
        };
        self.context.move_to(x, at.y);
        let _ = self.context.show_text(text);
    }

    fn image(&mut self, frame: &Arc<RgbaImage>, dest: ScreenRect) {
        if frame.width() == 0 || frame.height() == 0 {
            return;
        }
        let context = self.context;
        let Some(surface) = self.surfaces.surface_for(frame) else {
            tracing::warn!(
                width = frame.width(),
                height = frame.height(),
                "failed to convert preview frame to cairo surface"
            );
            return;
        };
        context.save().ok();
        context.translate(dest.x, dest.y);
        context.scale(
            dest.width / f64::from(frame.width()),
            dest.height / f64::from(frame.height()),
        );
        if context.set_source_surface(surface, 0.0, 0.0).is_ok() {
            let _ = context.paint();
        }
        context.restore().ok();
    }
}

/// Converts straight-alpha RGBA pixels into a premultiplied ARGB32 cairo surface.
pub fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = ImageSurface::create(Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;

    {
        let mut data = surface.data().ok()?;
        let image_width = usize::try_from(image.width()).ok()?;
        let image_height = usize::try_from(image.height()).ok()?;
        let src_row_len = image_width.checked_mul(4)?;
        let src = image.as_raw();

        for row in 0..image_height {
            let src_row_offset = row.checked_mul(src_row_len)?;
            let src_row = src.get(src_row_offset..src_row_offset.checked_add(src_row_len)?)?;
            let dst_row_offset = row.checked_mul(stride)?;
            let dst_row =
                data.get_mut(dst_row_offset..dst_row_offset.checked_add(src_row_len)?)?;

            for (src_pixel, dst_pixel) in src_row.chunks_exact(4).zip(dst_row.chunks_exact_mut(4)) {
                dst_pixel.copy_from_slice(&premultiplied_bgra(src_pixel));
            }
        }
    }

    surface.flush();
    Some(surface)
}

fn premultiplied_bgra(rgba: &[u8]) -> [u8; 4] {
    let [r, g, b, a] = [rgba[0], rgba[1], rgba[2], rgba[3]];
    match a {
        0 => [0, 0, 0, 0],
        255 => [b, g, r, 255],
        _ => {
            let alpha = u16::from(a);
            let premultiply = |channel: u8| ((u16::from(channel) * alpha + 127) / 255) as u8;
            [premultiply(b), premultiply(g), premultiply(r), a]
        }
    }
}
