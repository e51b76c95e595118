use serde::Serialize;
use thiserror::Error;

/// Crop size submitted with preview-generation jobs; the backend only needs a frame.
pub const PREVIEW_CROP_WIDTH: i32 = 1920;
pub const PREVIEW_CROP_HEIGHT: i32 = 1080;
const PREVIEW_NODE_ID: &str = "1";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("preview generation request failed: {0}")]
    Transport(String),
    #[error("preview generation returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to encode preview generation request: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// Asks the backend to produce a preview frame for a folder.
///
/// Success means the job was accepted, not that the frame exists yet.
pub trait PreviewGenerator: Send + Sync {
    fn request_preview(&self, folder: &str) -> GenerationResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewJob {
    pub node_class: String,
    pub input_folder: String,
    pub output_folder_name: String,
    pub aspect_ratio: String,
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: std::collections::BTreeMap<&'static str, PromptNode<'a>>,
    client_id: &'a str,
}

#[derive(Serialize)]
struct PromptNode<'a> {
    inputs: PreviewInputs<'a>,
    class_type: &'a str,
}

#[derive(Serialize)]
struct PreviewInputs<'a> {
    input_folder: &'a str,
    output_folder_name: &'a str,
    aspect_ratio: &'a str,
    pos_x: i32,
    pos_y: i32,
    crop_width: i32,
    crop_height: i32,
}

impl PreviewJob {
    pub fn to_request_body(&self, client_id: &str) -> GenerationResult<String> {
        let node = PromptNode {
            inputs: PreviewInputs {
                input_folder: &self.input_folder,
                output_folder_name: &self.output_folder_name,
                aspect_ratio: &self.aspect_ratio,
                pos_x: 0,
                pos_y: 0,
                crop_width: PREVIEW_CROP_WIDTH,
                crop_height: PREVIEW_CROP_HEIGHT,
            },
            class_type: &self.node_class,
        };
        let request = PromptRequest {
            prompt: std::collections::BTreeMap::from([(PREVIEW_NODE_ID, node)]),
            client_id,
        };
        Ok(serde_json::to_string(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_wraps_single_preview_node() {
        let job = PreviewJob {
            node_class: "EnhancedVideoCropNode".to_string(),
            input_folder: "clips".to_string(),
            output_folder_name: "auto_preview".to_string(),
            aspect_ratio: "custom".to_string(),
        };
        let body = job
            .to_request_body("client-1")
            .expect("request should encode");
        let value: serde_json::Value = serde_json::from_str(&body).expect("body should be json");

        assert_eq!(value["client_id"], "client-1");
        let node = &value["prompt"]["1"];
        assert_eq!(node["class_type"], "EnhancedVideoCropNode");
        assert_eq!(node["inputs"]["input_folder"], "clips");
        assert_eq!(node["inputs"]["output_folder_name"], "auto_preview");
        assert_eq!(node["inputs"]["aspect_ratio"], "custom");
        assert_eq!(node["inputs"]["pos_x"], 0);
        assert_eq!(node["inputs"]["crop_width"], 1920);
        assert_eq!(node["inputs"]["crop_height"], 1080);
    }
}
