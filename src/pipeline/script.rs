//! Scripted detection source for camera-less operation and tests.

use std::collections::VecDeque;
use std::convert::Infallible;

use crate::tracker::BoundingBox;

use super::detector::DetectionSource;

/// A `DetectionSource` that replays a pre-scripted sequence of per-frame
/// detections, one list per `detect` call. Once the script runs out it
/// yields empty frames, like a camera watching an empty lot.
pub struct ScriptedSource {
    frames: VecDeque<Vec<BoundingBox>>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = Vec<BoundingBox>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl DetectionSource for ScriptedSource {
    type Error = Infallible;

    fn detect(
        &mut self,
        _input: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<BoundingBox>, Self::Error> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_in_order_then_empties() {
        let mut source = ScriptedSource::new(vec![
            vec![BoundingBox::new(0.0, 0.0, 10.0, 10.0, 0.9)],
            vec![],
        ]);
        assert_eq!(source.detect(&[], 640, 480).unwrap().len(), 1);
        assert!(source.detect(&[], 640, 480).unwrap().is_empty());
        // Past the end of the script
        assert!(source.detect(&[], 640, 480).unwrap().is_empty());
    }
}
