use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::glib;
use gtk4::prelude::*;
use gtk4::DrawingArea;

use super::EditorRuntime;
use crate::editor::CropEditor;
use crate::geometry::ScreenPoint;
use crate::host::{InMemoryNode, NodeHost};
use crate::params::{ParamName, ParamValue};
use crate::render::{CairoPainter, FrameSurfaceCache};

const MIN_CANVAS_WIDTH: i32 = 200;

/// Parameter store whose redraw requests repaint a drawing area.
pub struct CanvasNode {
    params: InMemoryNode,
    area: glib::WeakRef<DrawingArea>,
}

impl CanvasNode {
    pub fn new(params: InMemoryNode, area: &DrawingArea) -> Self {
        Self {
            params,
            area: area.downgrade(),
        }
    }

    pub fn params(&self) -> &InMemoryNode {
        &self.params
    }
}

impl NodeHost for CanvasNode {
    fn param(&self, name: ParamName) -> Option<ParamValue> {
        self.params.param(name)
    }

    fn set_param(&mut self, name: ParamName, value: ParamValue) {
        self.params.set_param(name, value);
    }

    fn request_redraw(&mut self) {
        self.params.request_redraw();
        if let Some(area) = self.area.upgrade() {
            area.queue_draw();
        }
    }
}

/// Draws the runtime's editor into `area` and routes primary-button drags to it.
pub fn attach_canvas<H: NodeHost + 'static>(runtime: &EditorRuntime<H>, area: &DrawingArea) {
    let initial_width = f64::from(area.width().max(MIN_CANVAS_WIDTH));
    let initial_height = runtime.with_editor(|editor, _| editor.compute_size(initial_width));
    area.set_content_height(initial_height.ceil() as i32);

    let draw_runtime = runtime.clone();
    let surfaces = RefCell::new(FrameSurfaceCache::new());
    area.set_draw_func(move |area, context, width, _height| {
        let mut surfaces = surfaces.borrow_mut();
        let mut painter = CairoPainter::new(context, &mut surfaces);
        let consumed = draw_runtime
            .with_editor(|editor, host| editor.draw(&mut painter, &*host, f64::from(width)));
        let wanted_height = consumed.ceil() as i32;
        if wanted_height != area.content_height() {
            let area = area.downgrade();
            glib::idle_add_local_once(move || {
                if let Some(area) = area.upgrade() {
                    area.set_content_height(wanted_height);
                }
            });
        }
    });

    let gesture = gtk4::GestureDrag::new();
    gesture.set_button(gtk4::gdk::BUTTON_PRIMARY);
    let drag_start = Rc::new(Cell::new((0.0, 0.0)));

    let begin_runtime = runtime.clone();
    let begin_start = drag_start.clone();
    gesture.connect_drag_begin(move |gesture, start_x, start_y| {
        begin_start.set((start_x, start_y));
        let handled = begin_runtime.with_editor(|editor, host| {
            editor.on_pointer_down(host, ScreenPoint::new(start_x, start_y))
        });
        gesture.set_state(if handled {
            gtk4::EventSequenceState::Claimed
        } else {
            gtk4::EventSequenceState::Denied
        });
    });

    let update_runtime = runtime.clone();
    let update_start = drag_start.clone();
    gesture.connect_drag_update(move |_, offset_x, offset_y| {
        let (start_x, start_y) = update_start.get();
        update_runtime.with_editor(|editor, host| {
            editor.on_pointer_move(host, ScreenPoint::new(start_x + offset_x, start_y + offset_y))
        });
    });

    let end_runtime = runtime.clone();
    let end_start = drag_start;
    gesture.connect_drag_end(move |_, offset_x, offset_y| {
        let (start_x, start_y) = end_start.get();
        end_runtime.with_editor(|editor, host| {
            editor.on_pointer_up(host, ScreenPoint::new(start_x + offset_x, start_y + offset_y))
        });
    });

    let cancel_runtime = runtime.clone();
    gesture.connect_cancel(move |_, _| {
        cancel_runtime.with_editor(|editor, host| editor.on_pointer_cancel(host));
    });

    area.add_controller(gesture);
    tracing::debug!("crop editor attached to drawing area");
}
