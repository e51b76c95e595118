use std::sync::Arc;

use image::RgbaImage;

use super::{Painter, TextStyle};
use crate::geometry::{RgbaColor, ScreenPoint, ScreenRect};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: ScreenRect,
        color: RgbaColor,
    },
    StrokeRect {
        rect: ScreenRect,
        color: RgbaColor,
        line_width: f64,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: RgbaColor,
    },
    MaskOutside {
        area: ScreenRect,
        hole: ScreenRect,
        color: RgbaColor,
    },
    Text {
        text: String,
        at: ScreenPoint,
        style: TextStyle,
    },
    Image {
        width: u32,
        height: u32,
        dest: ScreenRect,
    },
}

#[derive(Debug, Default)]
pub struct RecordingPainter {
    ops: Vec<DrawOp>,
}

impl RecordingPainter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: ScreenRect, color: RgbaColor) {
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: ScreenRect, color: RgbaColor, line_width: f64) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: RgbaColor, _line_width: f64) {
        self.ops.push(DrawOp::Line { from, to, color });
    }

    fn mask_outside(&mut self, area: ScreenRect, hole: ScreenRect, color: RgbaColor) {
        self.ops.push(DrawOp::MaskOutside { area, hole, color });
    }

    fn text(&mut self, text: &str, at: ScreenPoint, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style,
        });
    }

    fn image(&mut self, frame: &Arc<RgbaImage>, dest: ScreenRect) {
        self.ops.push(DrawOp::Image {
            width: frame.width(),
            height: frame.height(),
            dest,
        });
    }
}
