use super::finger::{Finger, FingerCurl, FingerDirection};
use crate::types::HandLandmarks;

#[derive(Clone, Debug)]
pub struct PoseEstimatorOptions {
    /// Joint angle (degrees) above which a finger counts as half curled.
    pub half_curl_start_limit: f32,
    /// Joint angle (degrees) above which a finger counts as straight.
    pub no_curl_start_limit: f32,
    pub distance_vote_power: f32,
    pub single_angle_vote_power: f32,
    pub total_angle_vote_power: f32,
}

impl Default for PoseEstimatorOptions {
    fn default() -> Self {
        Self {
            half_curl_start_limit: 60.0,
            no_curl_start_limit: 130.0,
            distance_vote_power: 1.1,
            single_angle_vote_power: 0.9,
            total_angle_vote_power: 1.6,
        }
    }
}

/// Curl and pointing direction of every finger, indexed by `Finger::index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerPose {
    pub curls: [FingerCurl; 5],
    pub directions: [FingerDirection; 5],
}

impl FingerPose {
    pub fn curl(&self, finger: Finger) -> FingerCurl {
        self.curls[finger.index()]
    }

    pub fn direction(&self, finger: Finger) -> FingerDirection {
        self.directions[finger.index()]
    }
}

#[derive(Clone, Debug, Default)]
pub struct FingerPoseEstimator {
    options: PoseEstimatorOptions,
}

impl FingerPoseEstimator {
    pub fn new(options: PoseEstimatorOptions) -> Self {
        Self { options }
    }

    pub fn estimate(&self, landmarks: &HandLandmarks) -> FingerPose {
        let mut curls = [FingerCurl::NoCurl; 5];
        let mut directions = [FingerDirection::VerticalUp; 5];

        for finger in Finger::ALL {
            let segments = finger.segments();
            // The thumb's first bone (wrist to CMC) says little about its pose.
            let offset = if finger == Finger::Thumb { 1 } else { 0 };

            let start = landmarks[segments[offset].0];
            let mid = landmarks[segments[offset + 1].1];
            let end = landmarks[segments[3].1];

            let slopes: Vec<f32> = segments[offset..]
                .iter()
                .map(|&(a, b)| slope_xy(landmarks[a], landmarks[b]))
                .collect();

            curls[finger.index()] = self.estimate_curl(start, mid, end);
            directions[finger.index()] = self.estimate_direction(start, mid, end, &slopes);
        }

        FingerPose { curls, directions }
    }

    fn estimate_curl(&self, start: [f32; 3], mid: [f32; 3], end: [f32; 3]) -> FingerCurl {
        let start_mid = distance3(start, mid);
        let start_end = distance3(start, end);
        let mid_end = distance3(mid, end);

        let denom = 2.0 * mid_end * start_mid;
        let cos_in = if denom > f32::EPSILON {
            ((mid_end * mid_end + start_mid * start_mid - start_end * start_end) / denom)
                .clamp(-1.0, 1.0)
        } else {
            1.0
        };
        let angle = cos_in.acos().to_degrees();

        if angle > self.options.no_curl_start_limit {
            FingerCurl::NoCurl
        } else if angle > self.options.half_curl_start_limit {
            FingerCurl::HalfCurl
        } else {
            FingerCurl::FullCurl
        }
    }

    fn estimate_direction(
        &self,
        start: [f32; 3],
        mid: [f32; 3],
        end: [f32; 3],
        slopes: &[f32],
    ) -> FingerDirection {
        let dx = Deltas::new(start[0], mid[0], end[0]);
        let dy = Deltas::new(start[1], mid[1], end[1]);

        let mut votes = Votes::default();

        let ratio = dy.max_abs() / (dx.max_abs() + 1e-5);
        if ratio > 1.5 {
            votes.vertical += self.options.distance_vote_power;
        } else if ratio > 0.66 {
            votes.diagonal += self.options.distance_vote_power;
        } else {
            votes.horizontal += self.options.distance_vote_power;
        }

        // Overall angle over the longest of the three spans.
        let start_mid = dx.start_mid.hypot(dy.start_mid);
        let start_end = dx.start_end.hypot(dy.start_end);
        let mid_end = dx.mid_end.hypot(dy.mid_end);
        let (from, to) = if start_mid >= start_end && start_mid >= mid_end {
            (start, mid)
        } else if mid_end >= start_end {
            (mid, end)
        } else {
            (start, end)
        };
        votes.add_angle(slope_xy(from, to), self.options.total_angle_vote_power);

        for &slope in slopes {
            votes.add_angle(slope, self.options.single_angle_vote_power);
        }

        let best = votes.vertical.max(votes.diagonal).max(votes.horizontal);
        if votes.vertical == best {
            vertical_direction(&dy)
        } else if votes.horizontal == best {
            horizontal_direction(&dx)
        } else {
            diagonal_direction(&dx, &dy)
        }
    }
}

#[derive(Default)]
struct Votes {
    vertical: f32,
    diagonal: f32,
    horizontal: f32,
}

impl Votes {
    fn add_angle(&mut self, angle: f32, weight: f32) {
        if (75.0..=105.0).contains(&angle) {
            self.vertical += weight;
        } else if (25.0..=155.0).contains(&angle) {
            self.diagonal += weight;
        } else {
            self.horizontal += weight;
        }
    }
}

/// Signed offsets along one axis between the start, mid and end joints.
struct Deltas {
    start_mid: f32,
    start_end: f32,
    mid_end: f32,
}

impl Deltas {
    fn new(start: f32, mid: f32, end: f32) -> Self {
        Self {
            start_mid: start - mid,
            start_end: start - end,
            mid_end: mid - end,
        }
    }

    fn max_abs(&self) -> f32 {
        self.start_mid
            .abs()
            .max(self.start_end.abs())
            .max(self.mid_end.abs())
    }

    /// The delta with the largest magnitude, preferring start-mid, then mid-end.
    fn dominant(&self) -> f32 {
        let max = self.max_abs();
        if max == self.start_mid.abs() {
            self.start_mid
        } else if max == self.mid_end.abs() {
            self.mid_end
        } else {
            self.start_end
        }
    }
}

// Image y grows downwards, so a positive start-minus-end offset points up.
fn vertical_direction(dy: &Deltas) -> FingerDirection {
    if dy.dominant() < 0.0 {
        FingerDirection::VerticalDown
    } else {
        FingerDirection::VerticalUp
    }
}

fn horizontal_direction(dx: &Deltas) -> FingerDirection {
    if dx.dominant() < 0.0 {
        FingerDirection::HorizontalLeft
    } else {
        FingerDirection::HorizontalRight
    }
}

fn diagonal_direction(dx: &Deltas, dy: &Deltas) -> FingerDirection {
    let up = vertical_direction(dy) == FingerDirection::VerticalUp;
    let left = horizontal_direction(dx) == FingerDirection::HorizontalLeft;
    match (up, left) {
        (true, true) => FingerDirection::DiagonalUpLeft,
        (true, false) => FingerDirection::DiagonalUpRight,
        (false, true) => FingerDirection::DiagonalDownLeft,
        (false, false) => FingerDirection::DiagonalDownRight,
    }
}

/// Unsigned angle of the segment in the x/y plane, in degrees within `[0, 180]`,
/// where 90 means vertical.
fn slope_xy(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    let slope = (dy / dx).atan().to_degrees();
    if slope <= 0.0 { -slope } else { 180.0 - slope }
}

fn distance3(a: [f32; 3], b: [f32; 3]) -> f32 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const WRIST: [f32; 3] = [100.0, 300.0, 0.0];

    fn straight_finger(x: f32) -> [[f32; 3]; 4] {
        [
            [x, 220.0, 0.0],
            [x, 180.0, 0.0],
            [x, 150.0, 0.0],
            [x, 120.0, 0.0],
        ]
    }

    fn folded_finger(x: f32) -> [[f32; 3]; 4] {
        [
            [x, 220.0, 0.0],
            [x, 200.0, 0.0],
            [x + 2.0, 225.0, 0.0],
            [x + 4.0, 250.0, 0.0],
        ]
    }

    /// Builds a hand from a thumb and four finger chains (MCP, PIP, DIP, TIP).
    pub(crate) fn hand(thumb: [[f32; 3]; 4], fingers: [[[f32; 3]; 4]; 4]) -> HandLandmarks {
        let mut landmarks = [[0.0; 3]; 21];
        landmarks[0] = WRIST;
        landmarks[1..5].copy_from_slice(&thumb);
        for (i, chain) in fingers.iter().enumerate() {
            let base = 5 + i * 4;
            landmarks[base..base + 4].copy_from_slice(chain);
        }
        landmarks
    }

    pub(crate) fn open_palm() -> HandLandmarks {
        hand(
            [
                [80.0, 280.0, 0.0],
                [65.0, 250.0, 0.0],
                [55.0, 220.0, 0.0],
                [48.0, 190.0, 0.0],
            ],
            [
                straight_finger(70.0),
                straight_finger(95.0),
                straight_finger(118.0),
                straight_finger(140.0),
            ],
        )
    }

    #[test]
    fn open_palm_fingers_are_straight_and_point_up() {
        let pose = FingerPoseEstimator::default().estimate(&open_palm());

        for finger in Finger::ALL {
            assert_eq!(pose.curl(finger), FingerCurl::NoCurl, "{}", finger.name());
        }
        for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
            assert_eq!(
                pose.direction(finger),
                FingerDirection::VerticalUp,
                "{}",
                finger.name()
            );
        }
        assert_eq!(pose.direction(Finger::Thumb), FingerDirection::DiagonalUpRight);
    }

    #[test]
    fn folded_index_is_fully_curled() {
        let mut landmarks = open_palm();
        landmarks[5..9].copy_from_slice(&folded_finger(70.0));

        let pose = FingerPoseEstimator::default().estimate(&landmarks);
        assert_eq!(pose.curl(Finger::Index), FingerCurl::FullCurl);
        assert_eq!(pose.curl(Finger::Middle), FingerCurl::NoCurl);
    }

    #[test]
    fn finger_pointing_down_is_vertical_down() {
        let mut landmarks = open_palm();
        landmarks[0] = [100.0, 100.0, 0.0];
        landmarks[9..13].copy_from_slice(&[
            [95.0, 180.0, 0.0],
            [95.0, 220.0, 0.0],
            [95.0, 250.0, 0.0],
            [95.0, 280.0, 0.0],
        ]);

        let pose = FingerPoseEstimator::default().estimate(&landmarks);
        assert_eq!(pose.direction(Finger::Middle), FingerDirection::VerticalDown);
    }

    #[test]
    fn slope_is_ninety_degrees_for_vertical_segments() {
        assert!((slope_xy([10.0, 10.0, 0.0], [10.0, 0.0, 0.0]) - 90.0).abs() < 1e-3);
        assert!(slope_xy([0.0, 5.0, 0.0], [10.0, 5.0, 0.0]).abs() < 1e-3);
        assert!((slope_xy([0.0, 0.0, 0.0], [10.0, 10.0, 0.0]) - 135.0).abs() < 1e-3);
    }
}
