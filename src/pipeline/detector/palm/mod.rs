mod anchors;

use std::{cmp::Ordering, f32::consts::PI, path::Path};

use anyhow::{Context, Result, anyhow, ensure};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

pub use anchors::{NUM_ANCHORS, generate_anchors};

use crate::{config::DetectorConfig, types::PalmRegion};

use super::common::{LetterboxInfo, PALM_INPUT_SIZE, letterbox_frame};
use crate::types::Frame;

const PALM_LANDMARKS: usize = 7;
const MIN_CROP_SIDE: f32 = 80.0;
const CROP_EXPANSION: f32 = 2.4;

#[derive(Clone, Debug)]
pub struct PalmDetectorConfig {
    pub score_threshold: f32,
    pub nms_threshold: f32,
    pub top_k: usize,
}

impl Default for PalmDetectorConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.5,
            nms_threshold: 0.3,
            top_k: 32,
        }
    }
}

impl From<&DetectorConfig> for PalmDetectorConfig {
    fn from(cfg: &DetectorConfig) -> Self {
        Self {
            score_threshold: cfg.palm_score_threshold,
            nms_threshold: cfg.palm_nms_threshold,
            ..Self::default()
        }
    }
}

pub struct PalmDetector {
    session: Session,
    anchors: Vec<[f32; 2]>,
    cfg: PalmDetectorConfig,
}

impl PalmDetector {
    pub fn new(model_path: &Path, cfg: PalmDetectorConfig, intra_threads: usize) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(intra_threads)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("failed to load palm detector from {}", model_path.display())
            })?;

        Ok(Self {
            session,
            anchors: generate_anchors(PALM_INPUT_SIZE),
            cfg,
        })
    }

    pub fn detect(&mut self, frame: &Frame) -> Result<Vec<PalmRegion>> {
        let (input, letterbox) = letterbox_frame(frame, PALM_INPUT_SIZE)?;
        let tensor = Tensor::from_array(input)?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run palm detector session")?;

        ensure!(
            outputs.len() >= 2,
            "palm detector returned {} outputs, expected at least 2",
            outputs.len()
        );

        let boxes = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;

        let raw = RawPalmOutput {
            boxes: boxes
                .as_slice()
                .ok_or_else(|| anyhow!("palm boxes not contiguous"))?,
            box_shape: boxes.shape(),
            scores: scores
                .as_slice()
                .ok_or_else(|| anyhow!("palm scores not contiguous"))?,
            score_shape: scores.shape(),
        };

        decode_palm_outputs(&raw, &self.anchors, &letterbox, &self.cfg)
    }
}

/// Borrowed view over the two palm detector output tensors.
pub struct RawPalmOutput<'a> {
    pub boxes: &'a [f32],
    pub box_shape: &'a [usize],
    pub scores: &'a [f32],
    pub score_shape: &'a [usize],
}

/// Turns raw SSD regressions into frame-space palm regions after NMS.
pub fn decode_palm_outputs(
    raw: &RawPalmOutput<'_>,
    anchors: &[[f32; 2]],
    letterbox: &LetterboxInfo,
    cfg: &PalmDetectorConfig,
) -> Result<Vec<PalmRegion>> {
    ensure!(
        raw.box_shape.len() >= 3,
        "unexpected palm box shape {:?}, need [batch, anchors, features]",
        raw.box_shape
    );
    ensure!(
        raw.score_shape.len() >= 3,
        "unexpected palm score shape {:?}, need [batch, anchors, 1]",
        raw.score_shape
    );

    let anchor_dim = raw.box_shape[raw.box_shape.len() - 2];
    let feature_dim = raw.box_shape[raw.box_shape.len() - 1];
    let score_anchor_dim = raw.score_shape[raw.score_shape.len() - 2];
    let score_feature_dim = raw.score_shape[raw.score_shape.len() - 1];

    ensure!(
        feature_dim >= 4 + PALM_LANDMARKS * 2,
        "palm box feature dimension too small: {feature_dim}"
    );
    ensure!(
        anchor_dim == score_anchor_dim,
        "anchor dimension mismatch between boxes ({anchor_dim}) and scores ({score_anchor_dim})"
    );

    let pad_bias_x = letterbox.pad_x / letterbox.scale;
    let pad_bias_y = letterbox.pad_y / letterbox.scale;
    let scale = letterbox.orig_w.max(letterbox.orig_h) as f32;
    let input = PALM_INPUT_SIZE as f32;
    let to_frame = |v: f32, anchor: f32, bias: f32| (v / input + anchor) * scale - bias;

    let mut candidates = Vec::new();
    for (idx, anchor) in anchors.iter().enumerate().take(anchor_dim) {
        let raw_score = *raw
            .scores
            .get(idx * score_feature_dim)
            .ok_or_else(|| anyhow!("missing score for palm anchor {idx}"))?;
        let score = sigmoid(raw_score);
        if score < cfg.score_threshold {
            continue;
        }

        let offset = idx * feature_dim;
        let features = raw
            .boxes
            .get(offset..offset + 4 + PALM_LANDMARKS * 2)
            .ok_or_else(|| anyhow!("missing box features for palm anchor {idx}"))?;

        let cx = features[0] / input + anchor[0];
        let cy = features[1] / input + anchor[1];
        let hw = features[2] / input / 2.0;
        let hh = features[3] / input / 2.0;

        let mut bbox = [
            (cx - hw) * scale - pad_bias_x,
            (cy - hh) * scale - pad_bias_y,
            (cx + hw) * scale - pad_bias_x,
            (cy + hh) * scale - pad_bias_y,
        ];
        if bbox[2] <= bbox[0] || bbox[3] <= bbox[1] {
            continue;
        }
        clamp_box(&mut bbox, letterbox.orig_w, letterbox.orig_h);

        let landmarks = features[4..]
            .chunks_exact(2)
            .map(|p| {
                (
                    to_frame(p[0], anchor[0], pad_bias_x),
                    to_frame(p[1], anchor[1], pad_bias_y),
                )
            })
            .collect();

        candidates.push(PalmRegion {
            bbox,
            landmarks,
            score,
        });
    }

    let kept = nms(&candidates, cfg.nms_threshold, cfg.top_k);
    Ok(kept
        .into_iter()
        .filter_map(|idx| candidates.get(idx).cloned())
        .collect())
}

pub fn pick_primary_region(regions: &[PalmRegion]) -> Option<&PalmRegion> {
    regions
        .iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal))
}

/// Center, side length and rotation of the square the landmark model sees.
pub fn crop_from_palm(region: &PalmRegion) -> ((f32, f32), f32, f32) {
    let center = if region.landmarks.is_empty() {
        (
            (region.bbox[0] + region.bbox[2]) * 0.5,
            (region.bbox[1] + region.bbox[3]) * 0.5,
        )
    } else {
        let (sum_x, sum_y) = region
            .landmarks
            .iter()
            .fold((0.0_f32, 0.0_f32), |acc, p| (acc.0 + p.0, acc.1 + p.1));
        let n = region.landmarks.len() as f32;
        (sum_x / n, sum_y / n)
    };

    let base_w = (region.bbox[2] - region.bbox[0]).abs();
    let base_h = (region.bbox[3] - region.bbox[1]).abs();
    let landmark_span = if region.landmarks.is_empty() {
        0.0
    } else {
        let (min_x, max_x, min_y, max_y) = region
            .landmarks
            .iter()
            .fold((f32::MAX, f32::MIN, f32::MAX, f32::MIN), |acc, (x, y)| {
                (acc.0.min(*x), acc.1.max(*x), acc.2.min(*y), acc.3.max(*y))
            });
        (max_x - min_x).max(max_y - min_y)
    };
    // Fingers extend well past the palm box.
    let side = base_w.max(base_h).max(landmark_span).max(MIN_CROP_SIDE) * CROP_EXPANSION;

    (center, side, estimate_orientation(region))
}

/// Principal axis of the palm keypoints, rotated so fingers point up.
pub fn estimate_orientation(region: &PalmRegion) -> f32 {
    if region.landmarks.len() < 2 {
        return 0.0;
    }

    let n = region.landmarks.len() as f32;
    let (sx, sy) = region
        .landmarks
        .iter()
        .fold((0.0_f32, 0.0_f32), |acc, (x, y)| (acc.0 + x, acc.1 + y));
    let mean = (sx / n, sy / n);

    let (mut cov_xx, mut cov_xy, mut cov_yy) = (0.0, 0.0, 0.0);
    for (x, y) in &region.landmarks {
        let dx = x - mean.0;
        let dy = y - mean.1;
        cov_xx += dx * dx;
        cov_xy += dx * dy;
        cov_yy += dy * dy;
    }
    cov_xx /= n;
    cov_xy /= n;
    cov_yy /= n;

    let trace = cov_xx + cov_yy;
    let det = cov_xx * cov_yy - cov_xy * cov_xy;
    let lambda1 = (trace * 0.5 + ((trace * 0.5).powi(2) - det).max(0.0).sqrt()).max(1e-6);
    let (vx, vy) = if cov_xy.abs() > 1e-6 {
        (lambda1 - cov_yy, cov_xy)
    } else if cov_xx >= cov_yy {
        (1.0, 0.0)
    } else {
        (0.0, 1.0)
    };

    vy.atan2(vx) - PI * 0.5
}

fn nms(candidates: &[PalmRegion], threshold: f32, top_k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|a, b| {
        candidates[*b]
            .score
            .partial_cmp(&candidates[*a].score)
            .unwrap_or(Ordering::Equal)
    });

    let mut keep: Vec<usize> = Vec::new();
    'outer: for &idx in &order {
        for &k in &keep {
            if iou(&candidates[idx].bbox, &candidates[k].bbox) >= threshold {
                continue 'outer;
            }
        }
        keep.push(idx);
        if keep.len() >= top_k {
            break;
        }
    }
    keep
}

fn iou(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let inter_w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let inter_h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let inter = inter_w * inter_h;
    if inter <= 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - inter;
    if union <= 0.0 { 0.0 } else { inter / union }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn clamp_box(bbox: &mut [f32; 4], w: u32, h: u32) {
    let max_w = w.saturating_sub(1) as f32;
    let max_h = h.saturating_sub(1) as f32;
    bbox[0] = bbox[0].clamp(0.0, max_w);
    bbox[1] = bbox[1].clamp(0.0, max_h);
    bbox[2] = bbox[2].clamp(0.0, max_w);
    bbox[3] = bbox[3].clamp(0.0, max_h);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEATURES: usize = 4 + PALM_LANDMARKS * 2;

    fn region(bbox: [f32; 4], score: f32) -> PalmRegion {
        PalmRegion {
            bbox,
            landmarks: Vec::new(),
            score,
        }
    }

    fn square_letterbox(side: u32) -> LetterboxInfo {
        LetterboxInfo {
            scale: PALM_INPUT_SIZE as f32 / side as f32,
            pad_x: 0.0,
            pad_y: 0.0,
            orig_w: side,
            orig_h: side,
        }
    }

    #[test]
    fn overlapping_boxes_are_suppressed() {
        let candidates = vec![
            region([0.0, 0.0, 10.0, 10.0], 0.6),
            region([1.0, 1.0, 11.0, 11.0], 0.9),
            region([50.0, 50.0, 60.0, 60.0], 0.7),
        ];
        assert_eq!(nms(&candidates, 0.3, 32), vec![1, 2]);
        assert_eq!(nms(&candidates, 0.3, 1), vec![1]);
    }

    #[test]
    fn iou_of_disjoint_boxes_is_zero() {
        assert_eq!(iou(&[0.0, 0.0, 1.0, 1.0], &[2.0, 2.0, 3.0, 3.0]), 0.0);
        assert_eq!(iou(&[0.0, 0.0, 2.0, 2.0], &[0.0, 0.0, 2.0, 2.0]), 1.0);
    }

    #[test]
    fn primary_region_has_highest_score() {
        let regions = vec![region([0.0; 4], 0.2), region([1.0; 4], 0.8)];
        assert_eq!(pick_primary_region(&regions), Some(&regions[1]));
        assert!(pick_primary_region(&[]).is_none());
    }

    #[test]
    fn decode_keeps_only_confident_anchors() {
        let anchors = vec![[0.5, 0.5], [0.25, 0.25]];
        let mut boxes = vec![0.0f32; 2 * FEATURES];
        boxes[2] = 96.0;
        boxes[3] = 96.0;
        boxes[FEATURES + 2] = 48.0;
        boxes[FEATURES + 3] = 48.0;
        let scores = vec![4.0, -4.0];

        let raw = RawPalmOutput {
            boxes: &boxes,
            box_shape: &[1, 2, FEATURES],
            scores: &scores,
            score_shape: &[1, 2, 1],
        };
        let regions = decode_palm_outputs(
            &raw,
            &anchors,
            &square_letterbox(384),
            &PalmDetectorConfig::default(),
        )
        .expect("decode");

        assert_eq!(regions.len(), 1);
        let palm = &regions[0];
        assert_eq!(palm.bbox, [96.0, 96.0, 288.0, 288.0]);
        assert_eq!(palm.landmarks.len(), PALM_LANDMARKS);
        assert_eq!(palm.landmarks[0], (192.0, 192.0));
    }

    #[test]
    fn decode_rejects_mismatched_shapes() {
        let raw = RawPalmOutput {
            boxes: &[0.0; FEATURES],
            box_shape: &[1, 1, FEATURES],
            scores: &[0.0, 0.0],
            score_shape: &[1, 2, 1],
        };
        let result = decode_palm_outputs(
            &raw,
            &[[0.5, 0.5]],
            &square_letterbox(192),
            &PalmDetectorConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn crop_is_centered_on_palm_keypoints() {
        let palm = PalmRegion {
            bbox: [0.0, 0.0, 100.0, 100.0],
            landmarks: vec![(40.0, 60.0), (60.0, 60.0)],
            score: 0.9,
        };
        let (center, side, _) = crop_from_palm(&palm);
        assert_eq!(center, (50.0, 60.0));
        assert_eq!(side, 100.0 * CROP_EXPANSION);
    }

    #[test]
    fn horizontal_keypoints_rotate_by_quarter_turn() {
        let palm = PalmRegion {
            bbox: [0.0; 4],
            landmarks: vec![(0.0, 0.0), (10.0, 0.0)],
            score: 1.0,
        };
        assert!((estimate_orientation(&palm) + PI * 0.5).abs() < 1e-6);
    }
}
