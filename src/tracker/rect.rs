use ndarray::{ArrayView2, ArrayView3, Axis};

/// Axis-aligned bounding box in normalized keypoint coordinates, stored as
/// top-left corner plus width and height.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Create a Rect of the given size centered on `(cx, cy)`.
    #[inline]
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x: cx - width / 2.0,
            y: cy - height / 2.0,
            width,
            height,
        }
    }

    /// Bounding box of one person's keypoints, shaped `(parts, dims)`.
    ///
    /// Only keypoints with `x > 0 || y > 0` are observed. When none is, the
    /// result is `Rect::default()`: zero-sized at the origin.
    pub fn bounding(keypoints: ArrayView2<'_, f32>) -> Self {
        if keypoints.ncols() < 2 {
            return Self::default();
        }

        let mut min = (f32::MAX, f32::MAX);
        let mut max = (f32::MIN, f32::MIN);
        let mut observed = false;

        for part in keypoints.rows() {
            let (x, y) = (part[0], part[1]);
            if x > 0.0 || y > 0.0 {
                min = (min.0.min(x), min.1.min(y));
                max = (max.0.max(x), max.1.max(y));
                observed = true;
            }
        }

        if !observed {
            return Self::default();
        }
        Self::from_tlbr(min.0, min.1, max.0, max.1)
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Matching cost against another box: center distance plus the distance
    /// between the (width, height) pairs.
    pub fn tracking_distance(&self, other: &Rect) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        let position = (ax - bx).hypot(ay - by);
        let size = (self.width - other.width).hypot(self.height - other.height);
        position + size
    }
}

/// Bounding boxes for every person of a `(persons, parts, dims)` keypoint array.
pub fn bounding_rects(keypoints: ArrayView3<'_, f32>) -> Vec<Rect> {
    keypoints
        .axis_iter(Axis(0))
        .map(Rect::bounding)
        .collect()
}
