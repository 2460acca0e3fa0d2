use std::{cmp::Ordering, sync::Arc};

use anyhow::{Context, Result};

use crate::{
    gesture::GestureScorer,
    pipeline::{HandDetector, OverlayCanvas, ReadyState, VideoSource},
    types::GestureMatch,
};

/// What one tick of the detection step did.
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The video had no usable frame; nothing was called.
    Skipped,
    Processed {
        hands: usize,
        letter: Option<String>,
    },
}

/// Highest-confidence match; ties resolve to the earliest entry.
pub fn select_best_match(matches: &[GestureMatch]) -> Option<&GestureMatch> {
    matches
        .iter()
        .filter(|m| !m.confidence.is_nan())
        .fold(None, |best: Option<&GestureMatch>, candidate| match best {
            Some(current)
                if current.confidence.partial_cmp(&candidate.confidence)
                    != Some(Ordering::Less) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
}

/// Detector, scorer and threshold for one recognition loop.
pub struct DetectionStep {
    detector: Box<dyn HandDetector>,
    scorer: Arc<dyn GestureScorer>,
    min_score: f32,
}

impl DetectionStep {
    pub fn new(
        detector: Box<dyn HandDetector>,
        scorer: Arc<dyn GestureScorer>,
        min_score: f32,
    ) -> Self {
        Self {
            detector,
            scorer,
            min_score,
        }
    }

    pub fn into_detector(self) -> Box<dyn HandDetector> {
        self.detector
    }

    /// Runs detection on the current video frame and redraws `canvas`.
    ///
    /// The canvas is resized (and so cleared) to the frame before detection,
    /// and every detected hand is drawn even when no letter matched.
    pub fn run(&mut self, video: &dyn VideoSource, canvas: &mut OverlayCanvas) -> Result<TickOutcome> {
        if video.ready_state() != ReadyState::HaveEnoughData {
            log::debug!("video not ready, skipping tick");
            return Ok(TickOutcome::Skipped);
        }
        let Some(frame) = video.snapshot() else {
            log::debug!("video reported ready without a frame, skipping tick");
            return Ok(TickOutcome::Skipped);
        };

        video.set_display_size(frame.width, frame.height);
        canvas.resize(frame.width, frame.height);

        let hands = self
            .detector
            .estimate_hands(&frame)
            .context("hand detection failed")?;

        let letter = match hands.first() {
            Some(hand) => self
                .scorer
                .estimate(&hand.landmarks, self.min_score)
                .map(|matches| select_best_match(&matches).map(|best| best.name.clone())),
            None => Ok(None),
        };

        canvas.draw_hands(&hands);

        Ok(TickOutcome::Processed {
            hands: hands.len(),
            letter: letter.context("gesture scoring failed")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use anyhow::anyhow;

    use super::*;
    use crate::{
        pipeline::VideoElement,
        types::{Frame, Hand, HandLandmarks},
    };

    struct FixedDetector {
        hands: Vec<Hand>,
        calls: Arc<AtomicUsize>,
    }

    impl HandDetector for FixedDetector {
        fn estimate_hands(&mut self, _frame: &Frame) -> Result<Vec<Hand>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hands.clone())
        }
    }

    struct FixedScorer {
        matches: Result<Vec<GestureMatch>, String>,
        calls: AtomicUsize,
        last_min_score: Mutex<Option<f32>>,
    }

    impl FixedScorer {
        fn new(matches: Vec<GestureMatch>) -> Self {
            Self {
                matches: Ok(matches),
                calls: AtomicUsize::new(0),
                last_min_score: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                matches: Err("scorer exploded".to_string()),
                calls: AtomicUsize::new(0),
                last_min_score: Mutex::new(None),
            }
        }
    }

    impl GestureScorer for FixedScorer {
        fn estimate(&self, _landmarks: &HandLandmarks, min_score: f32) -> Result<Vec<GestureMatch>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_min_score.lock().unwrap() = Some(min_score);
            self.matches.clone().map_err(|msg| anyhow!(msg))
        }
    }

    fn abc_matches() -> Vec<GestureMatch> {
        vec![
            GestureMatch::new("A", 0.3),
            GestureMatch::new("B", 0.9),
            GestureMatch::new("C", 0.7),
        ]
    }

    fn hand_at(x: f32, y: f32) -> Hand {
        Hand::from_landmarks([[x, y, 0.0]; 21])
    }

    fn ready_video() -> VideoElement {
        let video = VideoElement::new();
        video.bind(32, 24);
        video.publish(Frame::blank(32, 24));
        video
    }

    fn step_with(
        hands: Vec<Hand>,
        scorer: Arc<FixedScorer>,
    ) -> (DetectionStep, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let detector = FixedDetector {
            hands,
            calls: calls.clone(),
        };
        (DetectionStep::new(Box::new(detector), scorer, 6.5), calls)
    }

    #[test]
    fn best_match_takes_highest_confidence() {
        let matches = abc_matches();
        assert_eq!(select_best_match(&matches).map(|m| m.name.as_str()), Some("B"));
    }

    #[test]
    fn best_match_ties_keep_first_occurrence() {
        let matches = vec![
            GestureMatch::new("X", 8.0),
            GestureMatch::new("Y", 8.0),
            GestureMatch::new("Z", 7.0),
        ];
        assert_eq!(select_best_match(&matches).map(|m| m.name.as_str()), Some("X"));
    }

    #[test]
    fn best_match_ignores_nan_and_empty() {
        assert!(select_best_match(&[]).is_none());
        let matches = vec![GestureMatch::new("N", f32::NAN), GestureMatch::new("O", 7.0)];
        assert_eq!(select_best_match(&matches).map(|m| m.name.as_str()), Some("O"));
    }

    #[test]
    fn unready_video_calls_nothing() {
        let scorer = Arc::new(FixedScorer::new(abc_matches()));
        let (mut step, detector_calls) = step_with(vec![hand_at(5.0, 5.0)], scorer.clone());
        let video = VideoElement::new();
        video.bind(32, 24);
        let mut canvas = OverlayCanvas::new(8, 8);

        let outcome = step.run(&video, &mut canvas).unwrap();

        assert_eq!(outcome, TickOutcome::Skipped);
        assert_eq!(detector_calls.load(Ordering::SeqCst), 0);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
        assert_eq!((canvas.width(), canvas.height()), (8, 8));
    }

    #[test]
    fn best_label_is_reported_at_fixed_threshold() {
        let scorer = Arc::new(FixedScorer::new(abc_matches()));
        let (mut step, _) = step_with(vec![hand_at(5.0, 5.0)], scorer.clone());
        let video = ready_video();
        let mut canvas = OverlayCanvas::default();

        let outcome = step.run(&video, &mut canvas).unwrap();

        assert_eq!(
            outcome,
            TickOutcome::Processed {
                hands: 1,
                letter: Some("B".to_string())
            }
        );
        assert_eq!(*scorer.last_min_score.lock().unwrap(), Some(6.5));
        assert_eq!(video.display_size(), Some((32, 24)));
        assert_eq!((canvas.width(), canvas.height()), (32, 24));
        assert!(!canvas.is_blank());
    }

    #[test]
    fn same_frame_twice_reports_letter_twice() {
        let scorer = Arc::new(FixedScorer::new(abc_matches()));
        let (mut step, _) = step_with(vec![hand_at(5.0, 5.0)], scorer);
        let video = ready_video();
        let mut canvas = OverlayCanvas::default();

        let mut text = String::new();
        for _ in 0..2 {
            if let TickOutcome::Processed {
                letter: Some(label),
                ..
            } = step.run(&video, &mut canvas).unwrap()
            {
                text.push_str(&label);
                text.push(' ');
            }
        }
        assert_eq!(text, "B B ");
    }

    #[test]
    fn zero_hands_clears_previous_overlay() {
        let scorer = Arc::new(FixedScorer::new(abc_matches()));
        let (mut step, _) = step_with(Vec::new(), scorer.clone());
        let video = ready_video();
        let mut canvas = OverlayCanvas::new(32, 24);
        canvas.draw_hands(&[hand_at(10.0, 10.0)]);
        assert!(!canvas.is_blank());

        let outcome = step.run(&video, &mut canvas).unwrap();

        assert_eq!(
            outcome,
            TickOutcome::Processed {
                hands: 0,
                letter: None
            }
        );
        assert!(canvas.is_blank());
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn no_match_still_draws_skeleton() {
        let scorer = Arc::new(FixedScorer::new(Vec::new()));
        let (mut step, _) = step_with(vec![hand_at(5.0, 5.0)], scorer);
        let video = ready_video();
        let mut canvas = OverlayCanvas::default();

        let outcome = step.run(&video, &mut canvas).unwrap();

        assert_eq!(
            outcome,
            TickOutcome::Processed {
                hands: 1,
                letter: None
            }
        );
        assert!(!canvas.is_blank());
    }

    #[test]
    fn scorer_failure_is_an_error_after_drawing() {
        let scorer = Arc::new(FixedScorer::failing());
        let (mut step, _) = step_with(vec![hand_at(5.0, 5.0)], scorer);
        let video = ready_video();
        let mut canvas = OverlayCanvas::default();

        assert!(step.run(&video, &mut canvas).is_err());
        assert!(!canvas.is_blank());
    }
}
