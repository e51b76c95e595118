use std::collections::VecDeque;

use super::error::{StateError, StateResult};
use super::event::{InteractionEvent, StateTransition};
use super::model::{ActiveDrag, CornerHandle, DragAnchor, InteractionPhase, InteractionState};

const TRANSITION_HISTORY_LIMIT: usize = 32;

/// Drag/resize state machine for the crop preview.
///
/// Pointer-up and cancel are accepted from every state, so a release can never leave a
/// drag stuck. Drag updates are validated but not recorded in the history.
#[derive(Debug)]
pub struct InteractionMachine {
    state: InteractionState,
    transition_history: VecDeque<StateTransition>,
}

impl InteractionMachine {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            transition_history: VecDeque::with_capacity(TRANSITION_HISTORY_LIMIT),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn phase(&self) -> InteractionPhase {
        self.state.phase()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn can_transition(&self, event: InteractionEvent) -> bool {
        self.next_phase(event).is_some()
    }

    pub fn next_phase(&self, event: InteractionEvent) -> Option<InteractionPhase> {
        use InteractionEvent::*;
        match (self.phase(), event) {
            (InteractionPhase::Idle, BeginMove) => Some(InteractionPhase::Moving),
            (InteractionPhase::Idle, BeginResize(handle)) => {
                Some(InteractionPhase::Resizing(handle))
            }
            (phase @ (InteractionPhase::Moving | InteractionPhase::Resizing(_)), Drag) => {
                Some(phase)
            }
            (_, Release | Cancel) => Some(InteractionPhase::Idle),
            _ => None,
        }
    }

    pub fn begin_move(&mut self, anchor: DragAnchor) -> StateResult<InteractionPhase> {
        self.apply(
            InteractionEvent::BeginMove,
            InteractionState::DraggingMove { anchor },
        )
    }

    pub fn begin_resize(
        &mut self,
        handle: CornerHandle,
        anchor: DragAnchor,
    ) -> StateResult<InteractionPhase> {
        self.apply(
            InteractionEvent::BeginResize(handle),
            InteractionState::DraggingResize { handle, anchor },
        )
    }

    pub fn drag(&self) -> StateResult<ActiveDrag> {
        let from = self.phase();
        let event = InteractionEvent::Drag;
        self.next_phase(event)
            .and_then(|_| self.state.active_drag())
            .ok_or(StateError::InvalidStateTransition { from, event })
    }

    pub fn release(&mut self) -> bool {
        self.force_idle(InteractionEvent::Release)
    }

    pub fn cancel(&mut self) -> bool {
        self.force_idle(InteractionEvent::Cancel)
    }

    fn force_idle(&mut self, event: InteractionEvent) -> bool {
        let was_dragging = self.is_dragging();
        let from = self.phase();
        self.state = InteractionState::Idle;
        self.record(StateTransition::new(
            Some(from),
            event,
            InteractionPhase::Idle,
        ));
        if was_dragging {
            tracing::debug!(from = ?from, event = ?event, "drag ended");
        }
        was_dragging
    }

    fn apply(
        &mut self,
        event: InteractionEvent,
        next_state: InteractionState,
    ) -> StateResult<InteractionPhase> {
        tracing::debug!(from = ?self.phase(), event = ?event, "request interaction transition");
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase();
            tracing::warn!(from = ?from, event = ?event, "invalid interaction transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;
        debug_assert_eq!(next, next_state.phase());

        let record = StateTransition::new(Some(self.phase()), event, next);
        self.state = next_state;
        self.record(record);
        Ok(next)
    }

    fn record(&mut self, transition: StateTransition) {
        if self.transition_history.len() == TRANSITION_HISTORY_LIMIT {
            self.transition_history.pop_front();
        }
        self.transition_history.push_back(transition);
    }

    pub fn history(&self) -> impl Iterator<Item = &StateTransition> {
        self.transition_history.iter()
    }
}

impl Default for InteractionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InteractionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionPhase::{:?}", self.phase())
    }
}
