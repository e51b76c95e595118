mod generation;
mod http;
mod loader;

pub use generation::{
    GenerationError, GenerationResult, PreviewGenerator, PreviewJob, PREVIEW_CROP_HEIGHT,
    PREVIEW_CROP_WIDTH,
};
pub use http::ComfyClient;
pub use loader::{LoadMode, LoadOutcome, LoadTicket, PreviewLoader};

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::geometry::MediaDimensions;

const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn from_reference(asset_ref: &str) -> Self {
        let lowered = asset_ref.to_ascii_lowercase();
        if IMAGE_EXTENSIONS
            .iter()
            .any(|extension| lowered.contains(extension))
        {
            Self::Image
        } else {
            Self::Video
        }
    }
}

#[derive(Debug, Clone)]
pub struct PreviewAsset {
    pub asset_ref: String,
    pub kind: AssetKind,
    pub dimensions: MediaDimensions,
    /// Decoded frame, possibly downscaled. `None` until a frame is available.
    pub frame: Option<Arc<RgbaImage>>,
}

impl PreviewAsset {
    pub fn new(asset_ref: impl Into<String>, dimensions: MediaDimensions) -> Self {
        let asset_ref = asset_ref.into();
        Self {
            kind: AssetKind::from_reference(&asset_ref),
            asset_ref,
            dimensions,
            frame: None,
        }
    }

    pub fn with_frame(mut self, frame: RgbaImage) -> Self {
        self.frame = Some(Arc::new(frame));
        self
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("preview request failed: {0}")]
    Transport(String),
    #[error("preview request returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read preview body: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode preview image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("preview image {asset_ref} has no pixels")]
    EmptyImage { asset_ref: String },
}

pub type AssetResult<T> = std::result::Result<T, AssetError>;

pub trait AssetResolver: Send + Sync {
    fn resolve(&self, folder: &str) -> AssetResult<PreviewAsset>;
}

/// File name the backend node writes its preview frame to.
pub fn preview_file_name(folder: &str) -> String {
    format!("video_preview_{folder}.jpg")
}

pub fn preview_asset_ref(folder: &str) -> String {
    format!("/view?filename={}&type=output", preview_file_name(folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_kind_detects_images_by_extension() {
        assert_eq!(
            AssetKind::from_reference("/view?filename=video_preview_input.jpg&type=output"),
            AssetKind::Image
        );
        assert_eq!(AssetKind::from_reference("clip.PNG"), AssetKind::Image);
        assert_eq!(AssetKind::from_reference("clip.mp4"), AssetKind::Video);
    }

    #[test]
    fn preview_asset_ref_uses_output_view_endpoint() {
        assert_eq!(
            preview_asset_ref("clips"),
            "/view?filename=video_preview_clips.jpg&type=output"
        );
    }
}
