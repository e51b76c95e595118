//! The crop editor attached to a video-crop node: ratio buttons above an interactive preview.
//!
//! The editor is headless. It mutates node parameters through [`NodeHost`] and queues
//! [`EditorEffect`]s (timers, asset requests) for a runtime to execute; completions come back
//! through the `on_*` methods.

pub mod drag;
pub mod layout;
pub mod presets;
pub mod preview;
pub mod ratio_selector;

use std::collections::HashMap;
use std::time::Duration;

pub use layout::LayoutFrame;
pub use presets::AspectRatioPreset;
pub use preview::{CropPreview, PreviewSource};
pub use ratio_selector::{RatioSelector, SELECTOR_HEIGHT};

use crate::asset::{
    AssetKind, AssetResult, GenerationResult, LoadMode, LoadOutcome, LoadTicket, PreviewAsset,
    PreviewLoader,
};
use crate::config::EditorConfig;
use crate::geometry::{MediaDimensions, ScreenPoint};
use crate::host::NodeHost;
use crate::params::{self, ParamName, DEFAULT_INPUT_FOLDER};
use crate::render::Painter;
use crate::state::InteractionState;

const INITIAL_LOAD_DELAY: Duration = Duration::from_millis(100);
const FOLDER_RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_FOLDER_RETRIES: u32 = 3;

pub trait CropEditor {
    fn on_create(&mut self, host: &mut dyn NodeHost);
    /// Returns whether the press was consumed.
    fn on_pointer_down(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool;
    fn on_pointer_move(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool;
    /// Always leaves the editor idle. Returns whether a drag ended.
    fn on_pointer_up(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool;
    fn on_pointer_cancel(&mut self, host: &mut dyn NodeHost) -> bool;
    fn on_removed(&mut self, host: &mut dyn NodeHost);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEffect {
    ScheduleTimer { timer: TimerId, delay: Duration },
    CancelTimer(TimerId),
    ResolveAsset { ticket: LoadTicket, folder: String },
    GeneratePreview { folder: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingLoad {
    mode: LoadMode,
    attempt: u32,
}

#[derive(Debug)]
pub struct VideoCropEditor {
    folder_debounce: Duration,
    recheck_delay: Duration,
    selector: RatioSelector,
    preview: CropPreview,
    loader: PreviewLoader,
    timers: HashMap<TimerId, PendingLoad>,
    next_timer_id: u64,
    effects: Vec<EditorEffect>,
    removed: bool,
}

impl Default for VideoCropEditor {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl VideoCropEditor {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            folder_debounce: config.folder_debounce(),
            recheck_delay: config.recheck_delay(),
            selector: RatioSelector::new(),
            preview: CropPreview::new(),
            loader: PreviewLoader::new(),
            timers: HashMap::new(),
            next_timer_id: 0,
            effects: Vec::new(),
            removed: false,
        }
    }

    pub fn media(&self) -> MediaDimensions {
        self.loader.dimensions()
    }

    pub fn asset(&self) -> Option<&PreviewAsset> {
        self.loader.asset()
    }

    pub fn interaction(&self) -> InteractionState {
        self.preview.interaction()
    }

    pub fn preview(&self) -> &CropPreview {
        &self.preview
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn take_effects(&mut self) -> Vec<EditorEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn compute_size(&self, width: f64) -> f64 {
        self.selector.compute_size(width) + self.preview.compute_size(width, self.media())
    }

    /// Renders both widgets from the top of the node. Returns the consumed height.
    pub fn draw(&mut self, painter: &mut dyn Painter, host: &dyn NodeHost, width: f64) -> f64 {
        let selector_height = self.selector.render(painter, host, width, 0.0);
        let media = self.media();
        let folder = params::read_input_folder(host);
        let source = match self.loader.asset() {
            Some(PreviewAsset {
                frame: Some(frame), ..
            }) => PreviewSource::Frame(frame),
            // Video assets are never decoded here.
            Some(PreviewAsset {
                kind: AssetKind::Video,
                ..
            }) => PreviewSource::Loading,
            _ if self.loader.is_loading() => PreviewSource::Loading,
            _ => PreviewSource::Placeholder {
                folder: folder.as_deref().unwrap_or(DEFAULT_INPUT_FOLDER),
            },
        };
        let preview_height =
            self.preview
                .render(painter, host, media, source, width, selector_height);
        selector_height + preview_height
    }

    pub fn on_param_changed(&mut self, host: &mut dyn NodeHost, name: ParamName) {
        match name {
            ParamName::InputFolder => {}
            ParamName::AspectRatio => {
                self.apply_aspect_label(host);
                return;
            }
            _ => {
                host.request_redraw();
                return;
            }
        }

        tracing::debug!(folder = ?params::read_input_folder(host), "input folder changed");
        self.reset_preview(host);
        self.cancel_all_timers();
        self.schedule_load(
            PendingLoad {
                mode: LoadMode::UserTriggered,
                attempt: 0,
            },
            self.folder_debounce,
        );
    }

    /// Re-derives the crop rectangle from a label the host wrote into `aspect_ratio`.
    fn apply_aspect_label(&mut self, host: &mut dyn NodeHost) {
        let Some(label) = params::read_aspect_label(host) else {
            host.request_redraw();
            return;
        };
        self.preview.cancel_drag();
        let rect = presets::rect_for_label(&label, self.media(), 0.0, 0.0);
        tracing::debug!(label = %label, ?rect, "aspect ratio changed by host");
        params::write_crop_rect(host, rect);
        host.request_redraw();
    }

    pub fn set_input_folder(&mut self, host: &mut dyn NodeHost, folder: &str) {
        host.set_param(ParamName::InputFolder, folder.into());
        self.on_param_changed(host, ParamName::InputFolder);
    }

    /// Returns whether the timer was still pending.
    pub fn on_timer_elapsed(&mut self, host: &mut dyn NodeHost, timer: TimerId) -> bool {
        let Some(pending) = self.timers.remove(&timer) else {
            tracing::debug!(?timer, "ignoring cancelled timer");
            return false;
        };
        self.start_load(host, pending);
        true
    }

    pub fn on_asset_resolved(
        &mut self,
        host: &mut dyn NodeHost,
        ticket: LoadTicket,
        result: AssetResult<PreviewAsset>,
    ) {
        let before = self.media();
        match self.loader.complete(ticket, result) {
            LoadOutcome::Stale => {}
            LoadOutcome::Loaded { dimensions } => {
                if dimensions != before {
                    self.preview.invalidate_layout();
                }
                host.request_redraw();
            }
            LoadOutcome::Failed { generate } => {
                if let Some(folder) = generate {
                    self.effects.push(EditorEffect::GeneratePreview { folder });
                }
                host.request_redraw();
            }
        }
    }

    pub fn on_preview_generated(&mut self, folder: &str, result: GenerationResult<()>) {
        if self.removed {
            return;
        }
        match result {
            Ok(()) => {
                tracing::info!(folder, delay = ?self.recheck_delay, "preview generation queued");
                self.schedule_load(
                    PendingLoad {
                        mode: LoadMode::Recheck,
                        attempt: 0,
                    },
                    self.recheck_delay,
                );
            }
            Err(err) => {
                tracing::warn!(folder, %err, "preview generation failed");
            }
        }
    }

    fn start_load(&mut self, host: &mut dyn NodeHost, pending: PendingLoad) {
        match params::read_input_folder(host) {
            Some(folder) => {
                let ticket = self.loader.begin(folder.clone(), pending.mode);
                self.effects
                    .push(EditorEffect::ResolveAsset { ticket, folder });
                host.request_redraw();
            }
            None if pending.attempt < MAX_FOLDER_RETRIES => {
                tracing::debug!(
                    attempt = pending.attempt + 1,
                    "input_folder parameter not available yet; retrying"
                );
                self.schedule_load(
                    PendingLoad {
                        attempt: pending.attempt + 1,
                        ..pending
                    },
                    FOLDER_RETRY_DELAY,
                );
            }
            None => {
                tracing::warn!(
                    attempts = pending.attempt,
                    "input_folder parameter missing; preview load abandoned"
                );
            }
        }
    }

    fn reset_preview(&mut self, host: &mut dyn NodeHost) {
        let before = self.media();
        self.loader.clear();
        if self.media() != before {
            self.preview.invalidate_layout();
        }
        host.request_redraw();
    }

    fn schedule_load(&mut self, pending: PendingLoad, delay: Duration) {
        self.next_timer_id += 1;
        let timer = TimerId(self.next_timer_id);
        self.timers.insert(timer, pending);
        self.effects
            .push(EditorEffect::ScheduleTimer { timer, delay });
    }

    fn cancel_all_timers(&mut self) {
        let mut pending = self.timers.drain().map(|(timer, _)| timer).collect::<Vec<_>>();
        pending.sort_by_key(|timer| timer.0);
        self.effects
            .extend(pending.into_iter().map(EditorEffect::CancelTimer));
    }
}

impl CropEditor for VideoCropEditor {
    fn on_create(&mut self, host: &mut dyn NodeHost) {
        tracing::debug!("crop editor created");
        self.removed = false;
        self.schedule_load(
            PendingLoad {
                mode: LoadMode::Silent,
                attempt: 0,
            },
            INITIAL_LOAD_DELAY,
        );
        host.request_redraw();
    }

    fn on_pointer_down(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool {
        if self.selector.owns(position) {
            let media = self.media();
            let Some(preset) = self.selector.button_at(position) else {
                return false;
            };
            if self.preview.cancel_drag() {
                tracing::debug!("preset applied during drag; drag cancelled");
            }
            ratio_selector::apply_preset(host, preset, media);
            return true;
        }
        self.preview.handle_pointer_down(host, position)
    }

    fn on_pointer_move(&mut self, host: &mut dyn NodeHost, position: ScreenPoint) -> bool {
        self.preview.handle_pointer_move(host, position)
    }

    fn on_pointer_up(&mut self, _host: &mut dyn NodeHost, _position: ScreenPoint) -> bool {
        self.preview.handle_pointer_up()
    }

    fn on_pointer_cancel(&mut self, _host: &mut dyn NodeHost) -> bool {
        self.preview.handle_pointer_cancel()
    }

    fn on_removed(&mut self, _host: &mut dyn NodeHost) {
        tracing::debug!(pending_timers = self.timers.len(), "crop editor removed");
        self.cancel_all_timers();
        self.preview.cancel_drag();
        self.loader.clear();
        self.removed = true;
    }
}
