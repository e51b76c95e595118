use std::sync::Arc;

use image::RgbaImage;

use crate::geometry::{CropEdges, CropRect, MediaDimensions, MediaPoint, ScreenPoint, ScreenRect};
use crate::host::NodeHost;
use crate::params;
use crate::render::{palette, Painter, TextAlign, TextStyle};
use crate::state::{CornerHandle, DragAnchor, DragGrip, InteractionMachine, InteractionState};

use super::drag::{resize_from_handle, translate_from_anchor};
use super::layout::{compute_preview_size, LayoutFrame};

const HANDLE_SIZE: f64 = 8.0;
/// Radius, in display pixels, within which a press grabs a corner handle.
const HANDLE_HIT_RADIUS: f64 = 10.0;
const OUTLINE_WIDTH: f64 = 2.0;
const INFO_FONT_SIZE: f64 = 12.0;
const PLACEHOLDER_FONT_SIZE: f64 = 14.0;
const PLACEHOLDER_GRID_STEP: f64 = 50.0;
const MIN_GRID_SPACING: f64 = 4.0;
const PLACEHOLDER_HINT: &str = "Put a video in this folder to see a preview";
const LOADING_TEXT: &str = "Loading preview...";

#[derive(Debug, Clone, Copy)]
pub enum PreviewSource<'a> {
    Placeholder { folder: &'a str },
    Loading,
    Frame(&'a Arc<RgbaImage>),
}

#[derive(Debug, Default)]
pub struct CropPreview {
    machine: InteractionMachine,
    layout: Option<LayoutFrame>,
}

impl CropPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_size(&self, width: f64, media: MediaDimensions) -> f64 {
        compute_preview_size(width, media)
    }

    /// Layout of the most recent render; pointer events are resolved against it.
    pub fn layout(&self) -> Option<&LayoutFrame> {
        self.layout.as_ref()
    }

    pub fn interaction(&self) -> InteractionState {
        self.machine.state()
    }

    pub fn machine(&self) -> &InteractionMachine {
        &self.machine
    }

    pub fn owns(&self, position: ScreenPoint) -> bool {
        self.layout
            .is_some_and(|layout| layout.canvas.contains(position))
    }

    /// Drops the cached layout and any drag, e.g. after the media dimensions change.
    pub fn invalidate_layout(&mut self) {
        self.cancel_drag();
        self.layout = None;
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.machine.cancel()
    }

    pub fn render(
        &mut self,
        painter: &mut dyn Painter,
        host: &dyn NodeHost,
        media: MediaDimensions,
        source: PreviewSource<'_>,
        width: f64,
        top: f64,
    ) -> f64 {
        let layout = LayoutFrame::derive(width, top, media);
        painter.fill_rect(layout.canvas, palette::CANVAS_BACKGROUND);
        painter.stroke_rect(layout.canvas, palette::CANVAS_BORDER, 1.0);

        match source {
            PreviewSource::Frame(frame) => painter.image(frame, layout.media_rect),
            PreviewSource::Loading => draw_loading(painter, &layout),
            PreviewSource::Placeholder { folder } => draw_placeholder(painter, &layout, folder),
        }

        let rect = params::read_crop_rect(host, media);
        let crop = layout.crop_to_screen(rect);
        painter.mask_outside(layout.media_rect, crop, palette::OUTSIDE_MASK);
        painter.stroke_rect(crop, palette::CROP_OUTLINE, OUTLINE_WIDTH);
        let edges = rect.edges();
        for handle in CornerHandle::ALL {
            let corner = layout.media_to_screen(handle.corner_of(&edges));
            painter.fill_rect(
                ScreenRect::new(
                    corner.x - HANDLE_SIZE / 2.0,
                    corner.y - HANDLE_SIZE / 2.0,
                    HANDLE_SIZE,
                    HANDLE_SIZE,
                ),
                palette::CROP_OUTLINE,
            );
        }

        painter.text(
            &info_text(media, rect),
            ScreenPoint::new(layout.canvas.x + 5.0, top + layout.canvas.height - 8.0),
            TextStyle::new(INFO_FONT_SIZE, palette::TEXT, TextAlign::Left),
        );

        self.layout = Some(layout);
        layout.consumed_height()
    }

    pub fn handle_pointer_down(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool {
        let Some(layout) = self.layout else {
            tracing::debug!("pointer down before first preview render");
            return false;
        };
        if self.machine.is_dragging() {
            tracing::warn!(state = %self.machine, "pointer down during active drag; releasing it");
            self.machine.release();
        }
        if !layout.canvas.contains(position) || !layout.media_rect.contains(position) {
            return false;
        }

        let rect = params::read_crop_rect(&*host, layout.media);
        let edges = rect.edges();
        let pointer = layout.screen_to_media(position);
        let hit_radius = layout.screen_distance_to_media(HANDLE_HIT_RADIUS);
        let anchor = DragAnchor {
            origin: pointer,
            start: edges,
        };

        let started = match hit_handle(&edges, pointer, hit_radius) {
            Some(handle) => self.machine.begin_resize(handle, anchor),
            None if contains_point(&edges, pointer) => self.machine.begin_move(anchor),
            None => return false,
        };
        match started {
            Ok(phase) => {
                tracing::debug!(?phase, ?rect, "crop drag started");
                true
            }
            Err(err) => {
                tracing::warn!(%err, "failed to start crop drag");
                false
            }
        }
    }

    pub fn handle_pointer_move(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool {
        let Some(layout) = self.layout else {
            return false;
        };
        let drag = match self.machine.drag() {
            Ok(drag) => drag,
            Err(_) => return false,
        };

        let pointer = layout.screen_to_media_unclamped(position);
        match drag.grip {
            DragGrip::Corner(handle) => {
                let rect = resize_from_handle(handle, &drag.anchor, pointer, layout.media);
                params::write_crop_rect(host, rect);
            }
            DragGrip::Body => {
                let rect = translate_from_anchor(&drag.anchor, pointer, layout.media);
                params::write_position(host, rect.x, rect.y);
            }
        }
        host.request_redraw();
        true
    }

    pub fn handle_pointer_up(&mut self) -> bool {
        self.machine.release()
    }

    pub fn handle_pointer_cancel(&mut self) -> bool {
        self.machine.cancel()
    }
}

pub fn info_text(media: MediaDimensions, rect: CropRect) -> String {
    format!(
        "Video: {}×{} | Crop: {}×{} | Position: ({}, {})",
        media.width, media.height, rect.width, rect.height, rect.x, rect.y
    )
}

fn hit_handle(
    edges: &CropEdges,
    pointer: MediaPoint,
    radius: f64,
) -> Option<CornerHandle> {
    CornerHandle::ALL
        .into_iter()
        .find(|handle| handle.corner_of(edges).distance_squared(pointer) <= radius * radius)
}

fn contains_point(edges: &CropEdges, pointer: MediaPoint) -> bool {
    pointer.x >= edges.x1 && pointer.x <= edges.x2 && pointer.y >= edges.y1 && pointer.y <= edges.y2
}

fn draw_loading(painter: &mut dyn Painter, layout: &LayoutFrame) {
    painter.fill_rect(layout.media_rect, palette::LOADING_FILL);
    painter.text(
        LOADING_TEXT,
        layout.media_rect.center(),
        TextStyle::new(PLACEHOLDER_FONT_SIZE, palette::TEXT, TextAlign::Center),
    );
}

fn draw_placeholder(painter: &mut dyn Painter, layout: &LayoutFrame, folder: &str) {
    let area = layout.media_rect;
    painter.fill_rect(area, palette::PLACEHOLDER_FILL);

    let step = PLACEHOLDER_GRID_STEP * layout.scale;
    if step >= MIN_GRID_SPACING {
        let mut x = 0.0;
        while x <= area.width {
            painter.line(
                ScreenPoint::new(area.x + x, area.y),
                ScreenPoint::new(area.x + x, area.bottom()),
                palette::PLACEHOLDER_GRID,
                0.5,
            );
            x += step;
        }
        let mut y = 0.0;
        while y <= area.height {
            painter.line(
                ScreenPoint::new(area.x, area.y + y),
                ScreenPoint::new(area.right(), area.y + y),
                palette::PLACEHOLDER_GRID,
                0.5,
            );
            y += step;
        }
    }

    let center = area.center();
    let style = TextStyle::new(
        PLACEHOLDER_FONT_SIZE,
        palette::PLACEHOLDER_TEXT,
        TextAlign::Center,
    );
    painter.text(
        &format!("Preview: \"{folder}\" folder"),
        ScreenPoint::new(center.x, center.y - 10.0),
        style,
    );
    painter.text(
        PLACEHOLDER_HINT,
        ScreenPoint::new(center.x, center.y + 10.0),
        style,
    );
}
