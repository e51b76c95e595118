use super::event::InteractionEvent;
use super::model::InteractionPhase;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid interaction transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: InteractionPhase,
        event: InteractionEvent,
    },
}
