use serde::{Deserialize, Serialize};

use crate::geometry::{CropRect, MediaDimensions};
use crate::host::NodeHost;

pub const DEFAULT_INPUT_FOLDER: &str = "input";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParamName {
    PosX,
    PosY,
    CropWidth,
    CropHeight,
    AspectRatio,
    InputFolder,
}

impl ParamName {
    pub const ALL: [ParamName; 6] = [
        Self::PosX,
        Self::PosY,
        Self::CropWidth,
        Self::CropHeight,
        Self::AspectRatio,
        Self::InputFolder,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PosX => "pos_x",
            Self::PosY => "pos_y",
            Self::CropWidth => "crop_width",
            Self::CropHeight => "crop_height",
            Self::AspectRatio => "aspect_ratio",
            Self::InputFolder => "input_folder",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.as_str() == name)
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

impl ParamValue {
    /// Numeric view; text values holding an integer are accepted.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Int(_) => None,
        }
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

fn read_i32(host: &dyn NodeHost, name: ParamName) -> Option<i32> {
    host.param(name)
        .and_then(|value| value.as_int())
        .map(|value| value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

pub fn read_crop_rect(host: &dyn NodeHost, media: MediaDimensions) -> CropRect {
    let default_width = (media.width_f64() * 0.8).min(1920.0) as i32;
    let default_height = (media.height_f64() * 0.8).min(1080.0) as i32;
    CropRect::new(
        read_i32(host, ParamName::PosX).unwrap_or(0),
        read_i32(host, ParamName::PosY).unwrap_or(0),
        read_i32(host, ParamName::CropWidth).unwrap_or(default_width),
        read_i32(host, ParamName::CropHeight).unwrap_or(default_height),
    )
    .normalized_within(media)
}

pub fn write_crop_rect(host: &mut dyn NodeHost, rect: CropRect) {
    write_position(host, rect.x, rect.y);
    host.set_param(ParamName::CropWidth, rect.width.into());
    host.set_param(ParamName::CropHeight, rect.height.into());
}

pub fn write_position(host: &mut dyn NodeHost, x: i32, y: i32) {
    host.set_param(ParamName::PosX, x.into());
    host.set_param(ParamName::PosY, y.into());
}

pub fn read_aspect_label(host: &dyn NodeHost) -> Option<String> {
    host.param(ParamName::AspectRatio)
        .and_then(|value| value.as_text().map(str::to_string))
}

/// Returns `None` when the node has no folder parameter; an empty value means the default folder.
pub fn read_input_folder(host: &dyn NodeHost) -> Option<String> {
    let value = host.param(ParamName::InputFolder)?;
    let folder = value
        .as_text()
        .map(str::trim)
        .filter(|folder| !folder.is_empty())
        .unwrap_or(DEFAULT_INPUT_FOLDER);
    Some(folder.to_string())
}
