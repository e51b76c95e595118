use super::model::{CornerHandle, InteractionPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    BeginMove,
    BeginResize(CornerHandle),
    Drag,
    Release,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<InteractionPhase>,
    pub event: InteractionEvent,
    pub to: InteractionPhase,
}

impl StateTransition {
    pub const fn new(
        from: Option<InteractionPhase>,
        event: InteractionEvent,
        to: InteractionPhase,
    ) -> Self {
        Self { from, event, to }
    }
}
