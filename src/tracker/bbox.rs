/// Axis-aligned detection bounding box in frame-pixel coordinates.
///
/// This is the validated input shape at the detection-adapter boundary:
/// everything downstream of the adapter operates on this closed type, never
/// on raw detector payloads. Boxes live for one frame only; the tracker
/// keeps centroids, not boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
    /// Detector confidence in `[0, 1]`
    pub confidence: f32,
}

impl BoundingBox {
    /// Create a new box from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
        }
    }

    /// Create a box from TLBR corner coordinates, the format most detector
    /// backends emit.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            confidence,
        }
    }

    /// Geometric center of the box, the position proxy used for matching
    /// and crossing detection.
    #[inline]
    pub fn centroid(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Area of the box in pixels squared.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the box is well-formed: positive size, finite coordinates,
    /// confidence within `[0, 1]`. Malformed boxes are input anomalies and
    /// are dropped at the adapter boundary, never propagated.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && (0.0..=1.0).contains(&self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0, 0.9);
        assert_eq!(b.centroid(), (25.0, 40.0));
    }

    #[test]
    fn test_from_tlbr() {
        let b = BoundingBox::from_tlbr(10.0, 20.0, 40.0, 60.0, 0.8);
        assert_eq!(b.x, 10.0);
        assert_eq!(b.y, 20.0);
        assert_eq!(b.width, 30.0);
        assert_eq!(b.height, 40.0);
        assert_eq!(b.area(), 1200.0);
    }

    #[test]
    fn test_validation() {
        assert!(BoundingBox::new(0.0, 0.0, 10.0, 10.0, 0.5).is_valid());
        // Negative size
        assert!(!BoundingBox::new(0.0, 0.0, -10.0, 10.0, 0.5).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, 0.0, 0.5).is_valid());
        // Confidence out of range
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, 10.0, 1.5).is_valid());
        assert!(!BoundingBox::new(0.0, 0.0, 10.0, 10.0, -0.1).is_valid());
        // Non-finite coordinates
        assert!(!BoundingBox::new(f32::NAN, 0.0, 10.0, 10.0, 0.5).is_valid());
    }
}
