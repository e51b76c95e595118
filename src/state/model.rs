use crate::geometry::{CropEdges, MediaPoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl CornerHandle {
    /// Hit-test order: earlier handles win when hit zones overlap on small rectangles.
    pub const ALL: [CornerHandle; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub const fn moves_left_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    pub const fn moves_top_edge(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    pub fn corner_of(self, edges: &CropEdges) -> MediaPoint {
        let x = if self.moves_left_edge() {
            edges.x1
        } else {
            edges.x2
        };
        let y = if self.moves_top_edge() {
            edges.y1
        } else {
            edges.y2
        };
        MediaPoint::new(x, y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionPhase {
    #[default]
    Idle,
    Moving,
    Resizing(CornerHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragAnchor {
    pub origin: MediaPoint,
    pub start: CropEdges,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragGrip {
    Body,
    Corner(CornerHandle),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub grip: DragGrip,
    pub anchor: DragAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    DraggingMove {
        anchor: DragAnchor,
    },
    DraggingResize {
        handle: CornerHandle,
        anchor: DragAnchor,
    },
}

impl InteractionState {
    pub const fn phase(&self) -> InteractionPhase {
        match self {
            Self::Idle => InteractionPhase::Idle,
            Self::DraggingMove { .. } => InteractionPhase::Moving,
            Self::DraggingResize { handle, .. } => InteractionPhase::Resizing(*handle),
        }
    }

    pub const fn is_dragging(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    pub const fn active_drag(&self) -> Option<ActiveDrag> {
        match *self {
            Self::Idle => None,
            Self::DraggingMove { anchor } => Some(ActiveDrag {
                grip: DragGrip::Body,
                anchor,
            }),
            Self::DraggingResize { handle, anchor } => Some(ActiveDrag {
                grip: DragGrip::Corner(handle),
                anchor,
            }),
        }
    }
}
