//! Trait for object detection inference backends.

use crate::tracker::BoundingBox;

/// One frame's worth of detection-adapter output: the hand-off unit between
/// the detection stage and the engine. Frames must reach the engine in
/// capture order, without duplication.
#[derive(Debug, Clone)]
pub struct FrameDetections {
    pub boxes: Vec<BoundingBox>,
    pub width: u32,
    pub height: u32,
    /// Monotonic capture index
    pub frame_index: u64,
}

/// Trait for object detection inference backends.
///
/// The detector is an external collaborator: the engine treats it as a
/// function from image to bounding boxes and never depends on how inference
/// runs. Implement this trait to connect any detection model.
///
/// # Example
///
/// ```ignore
/// use parktrack_rs::{BoundingBox, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<BoundingBox>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<BoundingBox>, Self::Error>;
}
