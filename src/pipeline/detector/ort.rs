use std::path::Path;

use anyhow::{Context, Result, ensure};
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use super::{
    HandDetector,
    common::{self, HANDPOSE_INPUT_SIZE},
    palm::{PalmDetector, PalmDetectorConfig, crop_from_palm, pick_primary_region},
};
use crate::{
    config::DetectorConfig,
    model_download::{ModelKind, ensure_model_ready},
    types::{Frame, Hand},
};

/// Palm detector followed by the 21-point hand landmark model, both on ONNX
/// Runtime.
pub struct OrtHandDetector {
    handpose: Session,
    palm_detector: PalmDetector,
    hand_score_threshold: f32,
}

impl OrtHandDetector {
    /// Fetches any missing model files, then builds both sessions.
    pub fn load(cfg: &DetectorConfig) -> Result<Self> {
        let handpose_path = ModelKind::HandposeEstimator.path_in(&cfg.model_dir);
        let palm_path = ModelKind::PalmDetector.path_in(&cfg.model_dir);

        ensure_model_ready(ModelKind::HandposeEstimator, &handpose_path, |_evt| {})?;
        ensure_model_ready(ModelKind::PalmDetector, &palm_path, |_evt| {})?;

        let handpose = load_session(&handpose_path, cfg.intra_threads)?;
        let palm_detector =
            PalmDetector::new(&palm_path, PalmDetectorConfig::from(cfg), cfg.intra_threads)?;

        log::info!(
            "hand detector ready using {} and palm detector {}",
            handpose_path.display(),
            palm_path.display()
        );

        Ok(Self {
            handpose,
            palm_detector,
            hand_score_threshold: cfg.hand_score_threshold,
        })
    }
}

fn load_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    Ok(Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(intra_threads)?
        .commit_from_file(model_path)
        .with_context(|| format!("failed to load ORT session from {}", model_path.display()))?)
}

impl HandDetector for OrtHandDetector {
    fn estimate_hands(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        let palm_regions = self.palm_detector.detect(frame)?;
        let Some(selected) = pick_primary_region(&palm_regions) else {
            return Ok(Vec::new());
        };
        let (center, side, angle) = crop_from_palm(selected);

        let (input, transform) =
            common::rotated_crop(frame, center, side, angle, HANDPOSE_INPUT_SIZE)?;
        let tensor = Tensor::from_array(input)?;
        let outputs = self
            .handpose
            .run(ort::inputs![tensor])
            .context("failed to run handpose session")?;

        ensure!(outputs.len() >= 1, "handpose model returned no outputs");

        let coords = outputs[0].try_extract_array::<f32>()?;
        let flattened: Vec<f32> = coords.iter().copied().collect();
        let landmarks = common::decode_landmarks(&flattened)?;

        let confidence = match outputs.len() {
            n if n > 1 => outputs[1]
                .try_extract_array::<f32>()
                .ok()
                .and_then(|arr| arr.iter().next().copied())
                .unwrap_or(0.0),
            _ => 0.0,
        };
        let score = (confidence * selected.score).clamp(0.0, 1.0);
        if score < self.hand_score_threshold {
            log::debug!("dropping hand with score {score:.2}");
            return Ok(Vec::new());
        }

        Ok(vec![Hand {
            landmarks: common::project_landmarks(&landmarks, &transform),
            score,
            palm: Some(selected.clone()),
        }])
    }
}
