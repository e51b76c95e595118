use crate::geometry::{CropRect, MediaDimensions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatioPreset {
    Ratio16x9,
    Ratio9x16,
    Ratio1x1,
    Ratio4x3,
    Ratio3x4,
    Ratio21x9,
    Ratio2x1,
    Ratio3x2,
    Ratio2x3,
}

impl AspectRatioPreset {
    /// Presets offered as selector buttons, in display order.
    pub const SELECTOR: [AspectRatioPreset; 4] = [
        Self::Ratio16x9,
        Self::Ratio9x16,
        Self::Ratio1x1,
        Self::Ratio4x3,
    ];

    /// Every label the editor understands when restoring `aspect_ratio`.
    pub const ALL: [AspectRatioPreset; 9] = [
        Self::Ratio16x9,
        Self::Ratio9x16,
        Self::Ratio1x1,
        Self::Ratio4x3,
        Self::Ratio3x4,
        Self::Ratio21x9,
        Self::Ratio2x1,
        Self::Ratio3x2,
        Self::Ratio2x3,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Ratio16x9 => "16:9",
            Self::Ratio9x16 => "9:16",
            Self::Ratio1x1 => "1:1",
            Self::Ratio4x3 => "4:3",
            Self::Ratio3x4 => "3:4",
            Self::Ratio21x9 => "21:9",
            Self::Ratio2x1 => "2:1",
            Self::Ratio3x2 => "3:2",
            Self::Ratio2x3 => "2:3",
        }
    }

    pub const fn ratio(self) -> (u32, u32) {
        match self {
            Self::Ratio16x9 => (16, 9),
            Self::Ratio9x16 => (9, 16),
            Self::Ratio1x1 => (1, 1),
            Self::Ratio4x3 => (4, 3),
            Self::Ratio3x4 => (3, 4),
            Self::Ratio21x9 => (21, 9),
            Self::Ratio2x1 => (2, 1),
            Self::Ratio3x2 => (3, 2),
            Self::Ratio2x3 => (2, 3),
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.label() == label)
    }

    pub fn target_aspect(self) -> f64 {
        let (width, height) = self.ratio();
        f64::from(width) / f64::from(height)
    }

    pub fn fit_centered(self, media: MediaDimensions) -> CropRect {
        self.fit_with_offset(media, 0.0, 0.0)
    }

    /// Like [`Self::fit_centered`], shifted by an offset and clamped back into the media.
    pub fn fit_with_offset(self, media: MediaDimensions, offset_x: f64, offset_y: f64) -> CropRect {
        let media_width = media.width_f64();
        let media_height = media.height_f64();
        let target = self.target_aspect();

        let (width, height) = if media.aspect() > target {
            (media_height * target, media_height)
        } else {
            (media_width, media_width / target)
        };
        let width = width.round().min(media_width);
        let height = height.round().min(media_height);

        let x = ((media_width - width) / 2.0 + offset_x).clamp(0.0, media_width - width);
        let y = ((media_height - height) / 2.0 + offset_y).clamp(0.0, media_height - height);
        CropRect::new(
            x.round() as i32,
            y.round() as i32,
            width as i32,
            height as i32,
        )
    }
}

/// Rectangle spanning 10%..90% of the media on both axes.
pub fn fallback_rect(media: MediaDimensions) -> CropRect {
    let x1 = (media.width_f64() * 0.1).round() as i32;
    let y1 = (media.height_f64() * 0.1).round() as i32;
    let x2 = (media.width_f64() * 0.9).round() as i32;
    let y2 = (media.height_f64() * 0.9).round() as i32;
    CropRect::new(x1, y1, x2 - x1, y2 - y1)
}

/// Resolves a stored `aspect_ratio` label to a rectangle that satisfies the minimum crop size.
/// Unknown labels fall back to [`fallback_rect`] with a warning.
pub fn rect_for_label(
    label: &str,
    media: MediaDimensions,
    offset_x: f64,
    offset_y: f64,
) -> CropRect {
    let rect = match AspectRatioPreset::from_label(label) {
        Some(preset) => preset.fit_with_offset(media, offset_x, offset_y),
        None => {
            tracing::warn!(label, "unknown aspect ratio label; using default crop rectangle");
            fallback_rect(media)
        }
    };
    rect.normalized_within(media)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_MEDIA: [(u32, u32); 7] = [
        (1920, 1080),
        (1080, 1920),
        (1280, 720),
        (640, 480),
        (1000, 1000),
        (3840, 1600),
        (721, 1283),
    ];

    #[test]
    fn square_preset_on_full_hd_matches_known_rectangle() {
        let rect = AspectRatioPreset::Ratio1x1.fit_centered(MediaDimensions::new(1920, 1080));
        assert_eq!(rect, CropRect::new(420, 0, 1080, 1080));
    }

    #[test]
    fn matching_ratio_covers_whole_media() {
        let rect = AspectRatioPreset::Ratio16x9.fit_centered(MediaDimensions::new(1920, 1080));
        assert_eq!(rect, CropRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn presets_keep_ratio_fit_and_center_for_sample_media() {
        for (width, height) in SAMPLE_MEDIA {
            let media = MediaDimensions::new(width, height);
            for preset in AspectRatioPreset::ALL {
                let rect = preset.fit_centered(media);
                let (ratio_w, ratio_h) = preset.ratio();
                let expected_height = f64::from(rect.width) * f64::from(ratio_h) / f64::from(ratio_w);
                let expected_width = f64::from(rect.height) * f64::from(ratio_w) / f64::from(ratio_h);
                assert!(
                    (f64::from(rect.height) - expected_height).abs() <= 1.0
                        || (f64::from(rect.width) - expected_width).abs() <= 1.0,
                    "{preset:?} on {width}x{height} produced {rect:?}"
                );
                assert!(rect.x >= 0 && rect.y >= 0);
                assert!(rect.right() <= width as i32 && rect.bottom() <= height as i32);
                let left_gap = rect.x;
                let right_gap = width as i32 - rect.right();
                let top_gap = rect.y;
                let bottom_gap = height as i32 - rect.bottom();
                assert!((left_gap - right_gap).abs() <= 1, "{preset:?} {width}x{height}");
                assert!((top_gap - bottom_gap).abs() <= 1, "{preset:?} {width}x{height}");
            }
        }
    }

    #[test]
    fn applying_preset_twice_is_idempotent() {
        let media = MediaDimensions::new(1280, 720);
        for preset in AspectRatioPreset::ALL {
            assert_eq!(preset.fit_centered(media), preset.fit_centered(media));
        }
    }

    #[test]
    fn label_rect_on_tiny_media_keeps_minimum_size() {
        assert_eq!(
            rect_for_label("16:9", MediaDimensions::new(60, 1000), 0.0, 0.0),
            CropRect::new(0, 483, 60, 50)
        );
        assert_eq!(
            rect_for_label("21:9", MediaDimensions::new(1, 1), 0.0, 0.0),
            CropRect::new(0, 0, 1, 1)
        );
    }

    #[test]
    fn offset_is_clamped_into_media() {
        let media = MediaDimensions::new(1920, 1080);
        let rect = AspectRatioPreset::Ratio1x1.fit_with_offset(media, 10_000.0, -50.0);
        assert_eq!(rect, CropRect::new(840, 0, 1080, 1080));
    }

    #[test]
    fn labels_round_trip() {
        for preset in AspectRatioPreset::ALL {
            assert_eq!(AspectRatioPreset::from_label(preset.label()), Some(preset));
        }
    }

    #[test]
    fn unknown_label_falls_back_to_inner_eighty_percent() {
        let media = MediaDimensions::new(1920, 1080);
        let rect = rect_for_label("5:4", media, 0.0, 0.0);
        assert_eq!(rect, CropRect::new(192, 108, 1536, 864));
    }
}
