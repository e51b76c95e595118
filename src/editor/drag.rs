use crate::geometry::{CropEdges, CropRect, MediaDimensions, MediaPoint};
use crate::state::{CornerHandle, DragAnchor};

/// Applies a corner drag to the rectangle captured at drag start.
///
/// The moving edges follow the pointer delta but never come closer than the minimum size to
/// the opposite edge, then every edge is clamped into the media.
pub fn resize_from_handle(
    handle: CornerHandle,
    anchor: &DragAnchor,
    current: MediaPoint,
    media: MediaDimensions,
) -> CropRect {
    let (min_width, min_height) = media.min_crop_size();
    let min_width = f64::from(min_width);
    let min_height = f64::from(min_height);
    let media_width = media.width_f64();
    let media_height = media.height_f64();
    let delta_x = current.x - anchor.origin.x;
    let delta_y = current.y - anchor.origin.y;

    let mut edges = anchor.start;
    if handle.moves_left_edge() {
        edges.x1 = (edges.x1 + delta_x).min(edges.x2 - min_width);
    } else {
        edges.x2 = (edges.x2 + delta_x).max(edges.x1 + min_width);
    }
    if handle.moves_top_edge() {
        edges.y1 = (edges.y1 + delta_y).min(edges.y2 - min_height);
    } else {
        edges.y2 = (edges.y2 + delta_y).max(edges.y1 + min_height);
    }

    edges.x1 = edges.x1.clamp(0.0, media_width - min_width);
    edges.y1 = edges.y1.clamp(0.0, media_height - min_height);
    edges.x2 = edges.x2.clamp(min_width, media_width);
    edges.y2 = edges.y2.clamp(min_height, media_height);

    edges.to_rect().normalized_within(media)
}

pub fn translate_from_anchor(
    anchor: &DragAnchor,
    current: MediaPoint,
    media: MediaDimensions,
) -> CropRect {
    let media_width = media.width_f64();
    let media_height = media.height_f64();
    let width = anchor.start.width().min(media_width);
    let height = anchor.start.height().min(media_height);
    let x1 = (anchor.start.x1 + current.x - anchor.origin.x).clamp(0.0, media_width - width);
    let y1 = (anchor.start.y1 + current.y - anchor.origin.y).clamp(0.0, media_height - height);

    CropEdges {
        x1,
        y1,
        x2: x1 + width,
        y2: y1 + height,
    }
    .to_rect()
    .normalized_within(media)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_HD: MediaDimensions = MediaDimensions::new(1920, 1080);

    fn anchor_at(origin: (f64, f64), rect: CropRect) -> DragAnchor {
        DragAnchor {
            origin: MediaPoint::new(origin.0, origin.1),
            start: rect.edges(),
        }
    }

    #[test]
    fn bottom_right_drag_grows_rectangle() {
        let anchor = anchor_at((960.0, 540.0), CropRect::new(0, 0, 500, 500));
        let rect = resize_from_handle(
            CornerHandle::BottomRight,
            &anchor,
            MediaPoint::new(1060.0, 640.0),
            FULL_HD,
        );
        assert_eq!(rect, CropRect::new(0, 0, 600, 600));
    }

    #[test]
    fn top_left_drag_past_opposite_corner_stops_at_minimum() {
        let anchor = anchor_at((100.0, 100.0), CropRect::new(100, 100, 300, 200));
        let rect = resize_from_handle(
            CornerHandle::TopLeft,
            &anchor,
            MediaPoint::new(900.0, 700.0),
            FULL_HD,
        );
        assert_eq!(rect, CropRect::new(350, 250, 50, 50));
    }

    #[test]
    fn top_right_drag_moves_right_and_top_edges_only() {
        let anchor = anchor_at((400.0, 100.0), CropRect::new(100, 100, 300, 300));
        let rect = resize_from_handle(
            CornerHandle::TopRight,
            &anchor,
            MediaPoint::new(450.0, 60.0),
            FULL_HD,
        );
        assert_eq!(rect, CropRect::new(100, 60, 350, 340));
    }

    #[test]
    fn bottom_left_drag_outside_media_clamps_to_bounds() {
        let anchor = anchor_at((100.0, 400.0), CropRect::new(100, 100, 300, 300));
        let rect = resize_from_handle(
            CornerHandle::BottomLeft,
            &anchor,
            MediaPoint::new(-500.0, 5000.0),
            FULL_HD,
        );
        assert_eq!(rect, CropRect::new(0, 100, 400, 980));
    }

    #[test]
    fn resize_sequences_keep_minimum_size_and_containment() {
        let deltas = [
            (-3000.0, -3000.0),
            (3000.0, 3000.0),
            (-10.0, 25.0),
            (480.0, -975.0),
            (0.4, 0.6),
            (-1919.0, 1079.0),
        ];
        for handle in CornerHandle::ALL {
            let mut rect = CropRect::new(700, 300, 500, 400);
            for (dx, dy) in deltas {
                let start = CornerHandle::corner_of(handle, &rect.edges());
                let anchor = DragAnchor {
                    origin: start,
                    start: rect.edges(),
                };
                rect = resize_from_handle(
                    handle,
                    &anchor,
                    MediaPoint::new(start.x + dx, start.y + dy),
                    FULL_HD,
                );
                assert!(rect.fits_within(FULL_HD), "{handle:?} produced {rect:?}");
                assert!(rect.width >= 50 && rect.height >= 50);
            }
        }
    }

    #[test]
    fn move_keeps_size_and_clamps_to_media() {
        let anchor = anchor_at((600.0, 400.0), CropRect::new(500, 300, 400, 300));
        let rect = translate_from_anchor(&anchor, MediaPoint::new(5000.0, -200.0), FULL_HD);
        assert_eq!(rect, CropRect::new(1520, 0, 400, 300));

        let rect = translate_from_anchor(&anchor, MediaPoint::new(650.5, 410.0), FULL_HD);
        assert_eq!(rect, CropRect::new(551, 310, 400, 300));
    }
}
