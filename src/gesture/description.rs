use super::{
    finger::{Finger, FingerCurl, FingerDirection},
    pose::FingerPose,
};

/// Highest score a description can reach: five fingers for curl plus five for
/// direction, with relative weights summing to five on each side.
pub const MAX_SCORE: f32 = 10.0;

/// Expected finger configuration for one named gesture.
///
/// A finger with no curl (or direction) expectation always contributes its
/// full weight; otherwise it contributes `contribution * weight` of the first
/// expectation that equals the detected value, or nothing.
#[derive(Clone, Debug)]
pub struct GestureDescription {
    name: String,
    curls: [Vec<(FingerCurl, f32)>; 5],
    directions: [Vec<(FingerDirection, f32)>; 5],
    weights: [f32; 5],
    relative_weights: [f32; 5],
}

impl GestureDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curls: Default::default(),
            directions: Default::default(),
            weights: [1.0; 5],
            relative_weights: [1.0; 5],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn curl(mut self, finger: Finger, curl: FingerCurl, contribution: f32) -> Self {
        self.curls[finger.index()].push((curl, contribution));
        self
    }

    pub fn direction(
        mut self,
        finger: Finger,
        direction: FingerDirection,
        contribution: f32,
    ) -> Self {
        self.directions[finger.index()].push((direction, contribution));
        self
    }

    pub fn weight(mut self, finger: Finger, weight: f32) -> Self {
        self.weights[finger.index()] = weight;
        let total: f32 = self.weights.iter().sum();
        if total > 0.0 {
            for (relative, weight) in self.relative_weights.iter_mut().zip(self.weights) {
                *relative = weight * 5.0 / total;
            }
        }
        self
    }

    pub fn score(&self, pose: &FingerPose) -> f32 {
        let mut score = 0.0;
        for finger in Finger::ALL {
            let idx = finger.index();
            let weight = self.relative_weights[idx];
            score += expectation_score(&self.curls[idx], pose.curls[idx], weight);
            score += expectation_score(&self.directions[idx], pose.directions[idx], weight);
        }
        score
    }
}

fn expectation_score<T: PartialEq + Copy>(expected: &[(T, f32)], detected: T, weight: f32) -> f32 {
    if expected.is_empty() {
        return weight;
    }
    expected
        .iter()
        .find(|(value, _)| *value == detected)
        .map(|(_, contribution)| contribution * weight)
        .unwrap_or(0.0)
}
