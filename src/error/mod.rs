use crate::asset::{AssetError, GenerationError};
use crate::state::StateError;
use thiserror::Error;

pub type EditorResult<T> = std::result::Result<T, EditorError>;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to initialize GTK: {0}")]
    Gtk(#[from] gtk4::glib::BoolError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{InteractionEvent, InteractionPhase};

    #[test]
    fn component_errors_convert_into_editor_error() {
        let state: EditorError = StateError::InvalidStateTransition {
            from: InteractionPhase::Idle,
            event: InteractionEvent::Drag,
        }
        .into();
        assert!(matches!(state, EditorError::State(_)));

        let asset: EditorError = AssetError::Status {
            status: 404,
            body: "not found".to_string(),
        }
        .into();
        assert_eq!(
            asset.to_string(),
            "preview request returned HTTP 404: not found"
        );
    }
}
