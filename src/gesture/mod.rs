mod description;
mod estimator;
mod finger;
pub mod handsigns;
mod pose;

use anyhow::Result;

use crate::types::{GestureMatch, HandLandmarks};

pub use description::{GestureDescription, MAX_SCORE};
pub use estimator::{GestureEstimate, GestureEstimator};
pub use finger::{Finger, FingerCurl, FingerDirection};
pub use pose::{FingerPose, FingerPoseEstimator, PoseEstimatorOptions};

/// Matching-score floor used for letter recognition.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 6.5;

/// Ranks a hand's landmarks against known gestures.
///
/// Implementations return every candidate whose score is `>= min_score`.
pub trait GestureScorer: Send + Sync {
    fn estimate(&self, landmarks: &HandLandmarks, min_score: f32) -> Result<Vec<GestureMatch>>;
}

/// The letter scorer used by the application: all 26 handsigns.
pub fn alphabet_estimator() -> GestureEstimator {
    GestureEstimator::new(handsigns::alphabet().to_vec())
}
