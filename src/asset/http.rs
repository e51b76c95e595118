use std::io::Read;
use std::time::Duration;

use image::GenericImageView;

use super::generation::{GenerationError, GenerationResult, PreviewGenerator, PreviewJob};
use super::{
    preview_asset_ref, preview_file_name, AssetError, AssetResolver, AssetResult, PreviewAsset,
};
use crate::config::EditorConfig;
use crate::geometry::MediaDimensions;

const MAX_PREVIEW_BYTES: u64 = 64 * 1024 * 1024;
const MAX_FRAME_EDGE: u32 = 1280;

#[derive(Debug, Clone)]
pub struct ComfyClient {
    agent: ureq::Agent,
    server_url: String,
    node_class: String,
    output_folder_name: String,
    custom_ratio_label: String,
    client_id: String,
}

impl ComfyClient {
    pub fn from_config(config: &EditorConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build();
        Self {
            agent,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            node_class: config.node_class.clone(),
            output_folder_name: config.preview_output_folder.clone(),
            custom_ratio_label: config.custom_ratio_label.clone(),
            client_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    fn preview_job(&self, folder: &str) -> PreviewJob {
        PreviewJob {
            node_class: self.node_class.clone(),
            input_folder: folder.to_string(),
            output_folder_name: self.output_folder_name.clone(),
            aspect_ratio: self.custom_ratio_label.clone(),
        }
    }
}

impl AssetResolver for ComfyClient {
    fn resolve(&self, folder: &str) -> AssetResult<PreviewAsset> {
        let asset_ref = preview_asset_ref(folder);
        tracing::debug!(folder, asset_ref = %asset_ref, "fetch preview frame");

        let response = self
            .agent
            .get(&self.endpoint("/view"))
            .query("filename", &preview_file_name(folder))
            .query("type", "output")
            .call();
        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(AssetError::Status { status, body });
            }
            Err(err) => return Err(AssetError::Transport(err.to_string())),
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_PREVIEW_BYTES)
            .read_to_end(&mut bytes)?;
        let asset = decode_preview(&bytes, asset_ref)?;
        tracing::info!(
            folder,
            width = asset.dimensions.width,
            height = asset.dimensions.height,
            "preview frame loaded"
        );
        Ok(asset)
    }
}

/// Decodes a `/view` body. The frame is downscaled to [`MAX_FRAME_EDGE`]; the dimensions are not.
fn decode_preview(bytes: &[u8], asset_ref: String) -> AssetResult<PreviewAsset> {
    if bytes.is_empty() {
        return Err(AssetError::EmptyImage { asset_ref });
    }
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage { asset_ref });
    }

    let frame = if width > MAX_FRAME_EDGE || height > MAX_FRAME_EDGE {
        decoded.thumbnail(MAX_FRAME_EDGE, MAX_FRAME_EDGE).to_rgba8()
    } else {
        decoded.to_rgba8()
    };
    Ok(PreviewAsset::new(asset_ref, MediaDimensions::new(width, height)).with_frame(frame))
}

impl PreviewGenerator for ComfyClient {
    fn request_preview(&self, folder: &str) -> GenerationResult<()> {
        let body = self.preview_job(folder).to_request_body(&self.client_id)?;
        tracing::info!(folder, node_class = %self.node_class, "request preview generation");

        let response = self
            .agent
            .post(&self.endpoint("/prompt"))
            .set("Content-Type", "application/json")
            .send_string(&body);
        match response {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Err(GenerationError::Status { status, body })
            }
            Err(err) => Err(GenerationError::Transport(err.to_string())),
        }
    }
}
