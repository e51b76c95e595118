/// Smallest crop edge, in source pixels.
pub const MIN_CROP_SIZE: i32 = 50;

pub const DEFAULT_MEDIA_WIDTH: u32 = 1920;
pub const DEFAULT_MEDIA_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaPoint {
    pub x: f64,
    pub y: f64,
}

impl MediaPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: MediaPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ScreenRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

impl MediaDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width.max(1))
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height.max(1))
    }

    pub fn aspect(self) -> f64 {
        self.width_f64() / self.height_f64()
    }

    /// Minimum crop edge along each axis; shrinks for media smaller than the nominal minimum.
    pub fn min_crop_size(self) -> (i32, i32) {
        (
            MIN_CROP_SIZE.min(media_extent(self.width)),
            MIN_CROP_SIZE.min(media_extent(self.height)),
        )
    }
}

impl Default for MediaDimensions {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_WIDTH, DEFAULT_MEDIA_HEIGHT)
    }
}

pub(crate) fn media_extent(value: u32) -> i32 {
    i32::try_from(value.max(1)).unwrap_or(i32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl CropRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn edges(&self) -> CropEdges {
        CropEdges {
            x1: f64::from(self.x),
            y1: f64::from(self.y),
            x2: f64::from(self.right()),
            y2: f64::from(self.bottom()),
        }
    }

    /// Clamps size into `[min, media]` and position into `[0, media - size]`.
    pub fn normalized_within(self, media: MediaDimensions) -> Self {
        let media_width = media_extent(media.width);
        let media_height = media_extent(media.height);
        let (min_width, min_height) = media.min_crop_size();
        let width = self.width.clamp(min_width, media_width);
        let height = self.height.clamp(min_height, media_height);
        Self {
            x: self.x.clamp(0, media_width - width),
            y: self.y.clamp(0, media_height - height),
            width,
            height,
        }
    }

    pub fn fits_within(&self, media: MediaDimensions) -> bool {
        let (min_width, min_height) = media.min_crop_size();
        self.x >= 0
            && self.y >= 0
            && self.right() <= media_extent(media.width)
            && self.bottom() <= media_extent(media.height)
            && self.width >= min_width
            && self.height >= min_height
    }
}

/// Edge form of a rectangle, fractional so drag deltas accumulate without rounding drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropEdges {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CropEdges {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Rounds each edge independently, so width and height keep their integral minimum.
    pub fn to_rect(self) -> CropRect {
        let x1 = self.x1.round() as i32;
        let y1 = self.y1.round() as i32;
        let x2 = self.x2.round() as i32;
        let y2 = self.y2.round() as i32;
        CropRect::new(x1, y1, x2 - x1, y2 - y1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl RgbaColor {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 0xFF)
    }

    pub fn to_cairo_rgba(self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.red) / 255.0,
            f64::from(self.green) / 255.0,
            f64::from(self.blue) / 255.0,
            f64::from(self.alpha) / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_within_pulls_oversized_rect_into_media() {
        let media = MediaDimensions::new(640, 360);
        let rect = CropRect::new(600, -20, 1000, 10).normalized_within(media);
        assert_eq!(rect, CropRect::new(0, 0, 640, 50));
        assert!(rect.fits_within(media));
    }

    #[test]
    fn normalized_within_shrinks_minimum_for_tiny_media() {
        let media = MediaDimensions::new(30, 20);
        let rect = CropRect::new(5, 5, 10, 10).normalized_within(media);
        assert_eq!(rect, CropRect::new(0, 0, 30, 20));
        assert!(rect.fits_within(media));
    }

    #[test]
    fn edges_to_rect_preserves_integral_minimum_width() {
        let edges = CropEdges {
            x1: 10.4,
            y1: 0.5,
            x2: 60.4,
            y2: 50.5,
        };
        let rect = edges.to_rect();
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 50);
    }

    #[test]
    fn screen_rect_contains_is_edge_inclusive() {
        let rect = ScreenRect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(ScreenPoint::new(10.0, 30.0)));
        assert!(!rect.contains(ScreenPoint::new(30.1, 15.0)));
    }

    #[test]
    fn rgba_color_converts_to_unit_components() {
        let color = RgbaColor::new(0xFF, 0x00, 0x33, 0x99);
        assert_eq!(color.to_cairo_rgba(), (1.0, 0.0, 0.2, 0.6));
    }
}
