mod cairo;
mod recording;

pub use cairo::{rgba_image_to_cairo_surface, CairoPainter, FrameSurfaceCache};
pub use recording::{DrawOp, RecordingPainter};

use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::{RgbaColor, ScreenPoint, ScreenRect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub color: RgbaColor,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn new(size: f64, color: RgbaColor, align: TextAlign) -> Self {
        Self { size, color, align }
    }
}

pub trait Painter {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor);
    fn stroke_rect(&mut self, rect: ScreenRect, color: RgbaColor, line_width: f64);
    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: RgbaColor, line_width: f64);
    /// Fills `area` with `color` except for `hole`, which stays untouched.
    fn mask_outside(&mut self, area: ScreenRect, hole: ScreenRect, color: RgbaColor);
    /// Draws `text` with its baseline at `at.y`.
    fn text(&mut self, text: &str, at: ScreenPoint, style: TextStyle);
    fn image(&mut self, frame: &Arc<RgbaImage>, dest: ScreenRect);
}

pub mod palette {
    use crate::geometry::RgbaColor;

    pub const BUTTON_ACTIVE: RgbaColor = RgbaColor::opaque(0x4C, 0xAF, 0x50);
    pub const BUTTON_IDLE: RgbaColor = RgbaColor::opaque(0x66, 0x66, 0x66);
    pub const BUTTON_BORDER: RgbaColor = RgbaColor::opaque(0x99, 0x99, 0x99);
    pub const TEXT: RgbaColor = RgbaColor::opaque(0xFF, 0xFF, 0xFF);

    pub const CANVAS_BACKGROUND: RgbaColor = RgbaColor::opaque(0x22, 0x22, 0x22);
    pub const CANVAS_BORDER: RgbaColor = RgbaColor::opaque(0x55, 0x55, 0x55);
    pub const PLACEHOLDER_FILL: RgbaColor = RgbaColor::opaque(0x33, 0x33, 0x33);
    pub const PLACEHOLDER_GRID: RgbaColor = RgbaColor::opaque(0x66, 0x66, 0x66);
    pub const PLACEHOLDER_TEXT: RgbaColor = RgbaColor::opaque(0x88, 0x88, 0x88);
    pub const LOADING_FILL: RgbaColor = RgbaColor::opaque(0x44, 0x44, 0x44);

    pub const OUTSIDE_MASK: RgbaColor = RgbaColor::new(0x00, 0x00, 0x00, 0x99);
    pub const CROP_OUTLINE: RgbaColor = RgbaColor::opaque(0xFF, 0x44, 0x44);
}
