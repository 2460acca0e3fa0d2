use anyhow::Result;

use super::{
    GestureScorer,
    description::GestureDescription,
    finger::{Finger, FingerCurl, FingerDirection},
    pose::{FingerPose, FingerPoseEstimator, PoseEstimatorOptions},
};
use crate::types::{GestureMatch, HandLandmarks};

#[derive(Clone, Debug)]
pub struct GestureEstimate {
    pub pose_data: Vec<(Finger, FingerCurl, FingerDirection)>,
    pub gestures: Vec<GestureMatch>,
}

/// Scores a detected hand against a fixed set of gesture descriptions.
#[derive(Clone, Debug)]
pub struct GestureEstimator {
    pose_estimator: FingerPoseEstimator,
    gestures: Vec<GestureDescription>,
}

impl GestureEstimator {
    pub fn new(gestures: Vec<GestureDescription>) -> Self {
        Self::with_options(gestures, PoseEstimatorOptions::default())
    }

    pub fn with_options(gestures: Vec<GestureDescription>, options: PoseEstimatorOptions) -> Self {
        Self {
            pose_estimator: FingerPoseEstimator::new(options),
            gestures,
        }
    }

    pub fn gestures(&self) -> &[GestureDescription] {
        &self.gestures
    }

    /// Every gesture scoring at least `min_score`, in description order.
    pub fn estimate(&self, landmarks: &HandLandmarks, min_score: f32) -> GestureEstimate {
        let pose = self.pose_estimator.estimate(landmarks);
        self.estimate_pose(&pose, min_score)
    }

    pub fn estimate_pose(&self, pose: &FingerPose, min_score: f32) -> GestureEstimate {
        let pose_data = Finger::ALL
            .iter()
            .map(|&finger| (finger, pose.curl(finger), pose.direction(finger)))
            .collect();

        let gestures = self
            .gestures
            .iter()
            .filter_map(|gesture| {
                let score = gesture.score(pose);
                (score >= min_score).then(|| GestureMatch::new(gesture.name(), score))
            })
            .collect();

        GestureEstimate {
            pose_data,
            gestures,
        }
    }
}

impl GestureScorer for GestureEstimator {
    fn estimate(&self, landmarks: &HandLandmarks, min_score: f32) -> Result<Vec<GestureMatch>> {
        Ok(GestureEstimator::estimate(self, landmarks, min_score).gestures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{handsigns, pose};

    fn best(matches: &[GestureMatch]) -> Option<&GestureMatch> {
        crate::recognition::select_best_match(matches)
    }

    /// Matches all five curls and two of the directions, one at half weight.
    fn six_and_a_half(direction_contribution: f32) -> GestureDescription {
        let mut description = GestureDescription::new("edge");
        for finger in Finger::ALL {
            description = description.curl(finger, FingerCurl::NoCurl, 1.0);
        }
        description
            .direction(Finger::Thumb, FingerDirection::VerticalUp, 1.0)
            .direction(Finger::Index, FingerDirection::VerticalUp, direction_contribution)
            .direction(Finger::Middle, FingerDirection::VerticalDown, 1.0)
            .direction(Finger::Ring, FingerDirection::VerticalDown, 1.0)
            .direction(Finger::Pinky, FingerDirection::VerticalDown, 1.0)
    }

    fn straight_up() -> FingerPose {
        FingerPose {
            curls: [FingerCurl::NoCurl; 5],
            directions: [FingerDirection::VerticalUp; 5],
        }
    }

    #[test]
    fn score_exactly_at_threshold_is_reported() {
        let estimator = GestureEstimator::new(vec![six_and_a_half(0.5)]);
        let estimate = estimator.estimate_pose(&straight_up(), 6.5);
        assert_eq!(estimate.gestures, vec![GestureMatch::new("edge", 6.5)]);
    }

    #[test]
    fn score_below_threshold_is_dropped() {
        let estimator = GestureEstimator::new(vec![six_and_a_half(0.4)]);
        let estimate = estimator.estimate_pose(&straight_up(), 6.5);
        assert!(estimate.gestures.is_empty());
    }

    #[test]
    fn pose_data_lists_every_finger() {
        let estimator = GestureEstimator::new(Vec::new());
        let estimate = estimator.estimate(&pose::tests::open_palm(), 0.0);
        assert_eq!(estimate.pose_data.len(), 5);
        assert_eq!(estimate.pose_data[1].0, Finger::Index);
        assert_eq!(estimate.pose_data[1].1, FingerCurl::NoCurl);
    }

    #[test]
    fn canonical_a_pose_scores_a_highest() {
        let estimator = GestureEstimator::new(handsigns::alphabet().to_vec());
        let pose = FingerPose {
            curls: [
                FingerCurl::NoCurl,
                FingerCurl::FullCurl,
                FingerCurl::FullCurl,
                FingerCurl::FullCurl,
                FingerCurl::FullCurl,
            ],
            directions: [FingerDirection::VerticalUp; 5],
        };

        let estimate = estimator.estimate_pose(&pose, 6.5);
        let top = best(&estimate.gestures).expect("a match");
        assert_eq!(top.name, "A");
        assert_eq!(top.confidence, 10.0);
    }

    #[test]
    fn canonical_l_pose_scores_l_highest() {
        let estimator = GestureEstimator::new(handsigns::alphabet().to_vec());
        let pose = FingerPose {
            curls: [
                FingerCurl::NoCurl,
                FingerCurl::NoCurl,
                FingerCurl::FullCurl,
                FingerCurl::FullCurl,
                FingerCurl::FullCurl,
            ],
            directions: [
                FingerDirection::HorizontalLeft,
                FingerDirection::VerticalUp,
                FingerDirection::VerticalUp,
                FingerDirection::VerticalUp,
                FingerDirection::VerticalUp,
            ],
        };

        let estimate = estimator.estimate_pose(&pose, 6.5);
        assert_eq!(best(&estimate.gestures).map(|m| m.name.as_str()), Some("L"));
    }
}
