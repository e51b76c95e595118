use crate::geometry::{CropRect, MediaDimensions, ScreenPoint, ScreenRect};
use crate::host::NodeHost;
use crate::params::{self, ParamName};
use crate::render::{palette, Painter, TextAlign, TextStyle};

use super::presets::AspectRatioPreset;

const SELECTOR_MARGIN: f64 = 10.0;
const BUTTON_HEIGHT: f64 = 30.0;
const BUTTON_GAP: f64 = 5.0;
const LABEL_FONT_SIZE: f64 = 12.0;
/// Height consumed by the button row, spacing included.
pub const SELECTOR_HEIGHT: f64 = BUTTON_HEIGHT + 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioButton {
    pub preset: AspectRatioPreset,
    pub rect: ScreenRect,
}

pub fn button_layout(width: f64, top: f64) -> Vec<RatioButton> {
    let count = AspectRatioPreset::SELECTOR.len() as f64;
    let button_width =
        ((width - SELECTOR_MARGIN * 2.0 - (count - 1.0) * BUTTON_GAP) / count).max(0.0);
    AspectRatioPreset::SELECTOR
        .iter()
        .enumerate()
        .map(|(index, preset)| RatioButton {
            preset: *preset,
            rect: ScreenRect::new(
                SELECTOR_MARGIN + index as f64 * (button_width + BUTTON_GAP),
                top,
                button_width,
                BUTTON_HEIGHT,
            ),
        })
        .collect()
}

/// Writes the preset's centered rectangle, widened to the minimum crop size, and its label.
pub fn apply_preset(
    host: &mut dyn NodeHost,
    preset: AspectRatioPreset,
    media: MediaDimensions,
) -> CropRect {
    let rect = preset.fit_centered(media).normalized_within(media);
    tracing::info!(
        preset = preset.label(),
        media_width = media.width,
        media_height = media.height,
        ?rect,
        "apply aspect ratio preset"
    );
    params::write_crop_rect(host, rect);
    host.set_param(ParamName::AspectRatio, preset.label().into());
    host.request_redraw();
    rect
}

#[derive(Debug, Default)]
pub struct RatioSelector {
    placement: Option<(f64, f64)>,
}

impl RatioSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute_size(&self, _width: f64) -> f64 {
        SELECTOR_HEIGHT
    }

    pub fn render(
        &mut self,
        painter: &mut dyn Painter,
        host: &dyn NodeHost,
        width: f64,
        top: f64,
    ) -> f64 {
        self.placement = Some((width, top));
        let active_label = params::read_aspect_label(host);
        let label_style = TextStyle::new(LABEL_FONT_SIZE, palette::TEXT, TextAlign::Center);

        for button in button_layout(width, top) {
            let is_active = active_label.as_deref() == Some(button.preset.label());
            let fill = if is_active {
                palette::BUTTON_ACTIVE
            } else {
                palette::BUTTON_IDLE
            };
            painter.fill_rect(button.rect, fill);
            painter.stroke_rect(button.rect, palette::BUTTON_BORDER, 1.0);
            painter.text(
                button.preset.label(),
                ScreenPoint::new(
                    button.rect.x + button.rect.width / 2.0,
                    button.rect.y + BUTTON_HEIGHT / 2.0 + 4.0,
                ),
                label_style,
            );
        }
        SELECTOR_HEIGHT
    }

    /// Whether `position` falls in the band this selector occupied at its last render.
    pub fn owns(&self, position: ScreenPoint) -> bool {
        self.placement
            .is_some_and(|(_, top)| position.y >= top && position.y <= top + SELECTOR_HEIGHT)
    }

    pub fn button_at(&self, position: ScreenPoint) -> Option<AspectRatioPreset> {
        let (width, top) = self.placement?;
        button_layout(width, top)
            .into_iter()
            .find(|button| button.rect.contains(position))
            .map(|button| button.preset)
    }

    pub fn handle_pointer_down(
        &self,
        host: &mut dyn NodeHost,
        media: MediaDimensions,
        position: ScreenPoint,
    ) -> bool {
        match self.button_at(position) {
            Some(preset) => {
                apply_preset(host, preset, media);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryNode;
    use crate::params::ParamValue;
    use crate::render::{DrawOp, RecordingPainter};

    fn rendered_selector(node: &InMemoryNode) -> (RatioSelector, RecordingPainter) {
        let mut selector = RatioSelector::new();
        let mut painter = RecordingPainter::new();
        let consumed = selector.render(&mut painter, node, 420.0, 20.0);
        assert_eq!(consumed, SELECTOR_HEIGHT);
        (selector, painter)
    }

    #[test]
    fn buttons_share_width_evenly_between_margins() {
        let buttons = button_layout(420.0, 0.0);
        assert_eq!(buttons.len(), 4);
        assert_eq!(buttons[0].rect.x, 10.0);
        assert_eq!(buttons[0].rect.width, 96.25);
        assert_eq!(buttons[3].rect.right(), 410.0);
    }

    #[test]
    fn render_highlights_active_preset() {
        let node = InMemoryNode::new().with_param(ParamName::AspectRatio, "1:1");
        let (_, painter) = rendered_selector(&node);
        let fills = painter
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillRect { color, .. } => Some(*color),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(
            fills,
            vec![
                palette::BUTTON_IDLE,
                palette::BUTTON_IDLE,
                palette::BUTTON_ACTIVE,
                palette::BUTTON_IDLE,
            ]
        );
        assert_eq!(
            painter.texts().collect::<Vec<_>>(),
            vec!["16:9", "9:16", "1:1", "4:3"]
        );
    }

    #[test]
    fn clicking_square_button_writes_centered_square() {
        let mut node = InMemoryNode::new();
        let (selector, _) = rendered_selector(&node);
        let square = button_layout(420.0, 20.0)[2].rect.center();

        assert!(selector.handle_pointer_down(&mut node, MediaDimensions::new(1920, 1080), square));
        assert_eq!(node.param(ParamName::PosX), Some(ParamValue::Int(420)));
        assert_eq!(node.param(ParamName::PosY), Some(ParamValue::Int(0)));
        assert_eq!(node.param(ParamName::CropWidth), Some(ParamValue::Int(1080)));
        assert_eq!(node.param(ParamName::CropHeight), Some(ParamValue::Int(1080)));
        assert_eq!(
            node.param(ParamName::AspectRatio),
            Some(ParamValue::Text("1:1".to_string()))
        );
        assert_eq!(node.redraw_requests(), 1);
    }

    #[test]
    fn preset_on_narrow_media_writes_minimum_height() {
        let mut node = InMemoryNode::new();
        let media = MediaDimensions::new(60, 1000);
        let rect = apply_preset(&mut node, AspectRatioPreset::Ratio16x9, media);

        assert_eq!(rect, CropRect::new(0, 483, 60, 50));
        assert_eq!(node.param(ParamName::CropWidth), Some(ParamValue::Int(60)));
        assert_eq!(node.param(ParamName::CropHeight), Some(ParamValue::Int(50)));
        assert_eq!(node.param(ParamName::PosY), Some(ParamValue::Int(483)));
    }

    #[test]
    fn clicks_in_gaps_or_below_buttons_are_not_consumed() {
        let mut node = InMemoryNode::new();
        let (selector, _) = rendered_selector(&node);
        let media = MediaDimensions::default();

        let gap = ScreenPoint::new(10.0 + 96.25 + 2.5, 35.0);
        assert!(!selector.handle_pointer_down(&mut node, media, gap));
        let below = ScreenPoint::new(50.0, 20.0 + BUTTON_HEIGHT + 5.0);
        assert!(selector.owns(below));
        assert!(!selector.handle_pointer_down(&mut node, media, below));
        assert_eq!(node.param(ParamName::PosX), None);
    }

    #[test]
    fn selector_ignores_clicks_before_first_render() {
        let mut node = InMemoryNode::new();
        let selector = RatioSelector::new();
        assert!(!selector.owns(ScreenPoint::new(50.0, 10.0)));
        assert!(!selector.handle_pointer_down(
            &mut node,
            MediaDimensions::default(),
            ScreenPoint::new(50.0, 10.0)
        ));
    }
}
