pub mod asset;
mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod params;
pub mod render;
pub mod runtime;
pub mod state;

pub use config::{load_editor_config, EditorConfig};
pub use editor::{CropEditor, EditorEffect, TimerId, VideoCropEditor};
pub use error::{EditorError, EditorResult};
pub use host::{InMemoryNode, NodeHost};
