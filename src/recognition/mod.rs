mod step;
mod text_buffer;
mod worker;

use std::{sync::Arc, time::Instant};

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};

pub use step::{DetectionStep, TickOutcome, select_best_match};
pub use text_buffer::TextBuffer;
pub use worker::DetectorLoader;

use crate::{
    config::SignaConfig,
    error::ControllerError,
    gesture::{self, GestureScorer},
    pipeline::{HandDetector, OverlayCanvas, VideoSource},
    types::CameraState,
};

use self::worker::{DetectorSlot, OverlaySender, Worker, WorkerSettings};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopStatus {
    Loading,
    Running,
    Failed,
    #[default]
    Stopped,
}

impl LoopStatus {
    pub fn label(self) -> &'static str {
        match self {
            LoopStatus::Loading => "Loading hand detector...",
            LoopStatus::Running => "Recognizing",
            LoopStatus::Failed => "Hand detector failed to load",
            LoopStatus::Stopped => "Stopped",
        }
    }
}

/// Lossless messages from the recognition worker to the owning thread.
/// Overlays travel separately and only the newest one is kept.
#[derive(Clone, Debug)]
pub enum RecognitionEvent {
    Letter(String),
    Status(LoopStatus),
}

/// Owns the recognition loop and the UI-facing state it feeds.
///
/// The detector is loaded at most once, on the first `start()`, and survives
/// `stop()`. Worker output is only applied to the text buffer and overlay in
/// `pump()`, so all state changes happen on the caller's thread.
pub struct RecognitionController {
    config: SignaConfig,
    video: Arc<dyn VideoSource>,
    scorer: Arc<dyn GestureScorer>,
    detector: DetectorSlot,
    worker: Option<Worker>,
    events_tx: Sender<RecognitionEvent>,
    events_rx: Receiver<RecognitionEvent>,
    overlay_tx: OverlaySender,
    overlay_rx: Receiver<OverlayCanvas>,
    text: TextBuffer,
    overlay: OverlayCanvas,
    camera: CameraState,
    status: LoopStatus,
    disposed: bool,
}

impl RecognitionController {
    /// Controller scoring against the 26-letter alphabet.
    pub fn new<L>(config: SignaConfig, video: Arc<dyn VideoSource>, loader: L) -> Self
    where
        L: FnOnce() -> Result<Box<dyn HandDetector>> + Send + 'static,
    {
        Self::with_scorer(
            config,
            video,
            Arc::new(gesture::alphabet_estimator()),
            loader,
        )
    }

    pub fn with_scorer<L>(
        config: SignaConfig,
        video: Arc<dyn VideoSource>,
        scorer: Arc<dyn GestureScorer>,
        loader: L,
    ) -> Self
    where
        L: FnOnce() -> Result<Box<dyn HandDetector>> + Send + 'static,
    {
        let (events_tx, events_rx) = crossbeam_channel::unbounded();
        let (overlay_tx, overlay_rx) = OverlaySender::channel();
        let camera = if config.camera_enabled {
            CameraState::On
        } else {
            CameraState::Off
        };
        Self {
            text: TextBuffer::new(config.scroll_delay()),
            config,
            video,
            scorer,
            detector: DetectorSlot::Unloaded(Box::new(loader)),
            worker: None,
            events_tx,
            events_rx,
            overlay_tx,
            overlay_rx,
            overlay: OverlayCanvas::default(),
            camera,
            status: LoopStatus::Stopped,
            disposed: false,
        }
    }

    /// Starts the polling loop. Calling it while already running is a no-op.
    pub fn start(&mut self) -> Result<(), ControllerError> {
        if self.disposed {
            return Err(ControllerError::Disposed);
        }
        if self.worker.is_some() {
            return Ok(());
        }
        if matches!(self.detector, DetectorSlot::Failed) {
            log::warn!("hand detector failed to load earlier, not starting");
            self.status = LoopStatus::Failed;
            return Ok(());
        }

        let slot = std::mem::replace(&mut self.detector, DetectorSlot::Failed);
        let settings = WorkerSettings {
            interval: self.config.tick_interval(),
            min_score: gesture::DEFAULT_SCORE_THRESHOLD,
            scorer: self.scorer.clone(),
            video: self.video.clone(),
            events: self.events_tx.clone(),
            overlays: self.overlay_tx.clone(),
        };
        let worker = Worker::spawn(slot, settings).map_err(ControllerError::Spawn)?;
        self.worker = Some(worker);
        Ok(())
    }

    /// Stops the timer and waits for any in-flight tick. Letters produced
    /// before the stop are still applied.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.detector = worker.stop();
        self.pump(Instant::now());
        self.status = match self.detector {
            DetectorSlot::Failed => LoopStatus::Failed,
            _ => LoopStatus::Stopped,
        };
    }

    /// Stops the loop and releases the video. The controller cannot be
    /// restarted afterwards. A detector load still in progress is not waited
    /// for; its result is discarded.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(worker) = self.worker.take() {
            let released = worker.release();
            self.pump(Instant::now());
            self.status = match released {
                Some(DetectorSlot::Failed) => LoopStatus::Failed,
                _ => LoopStatus::Stopped,
            };
            if let Some(slot) = released {
                self.detector = slot;
            }
        }
        self.video.unbind();
        self.disposed = true;
        log::info!("recognition controller disposed");
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Applies pending worker output and any due scroll. Returns `true` when
    /// visible state changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            changed = true;
            match event {
                RecognitionEvent::Letter(label) => self.text.apply_letter(&label, now),
                RecognitionEvent::Status(status) => self.status = status,
            }
        }
        if let Ok(canvas) = self.overlay_rx.try_recv() {
            self.overlay = canvas;
            changed = true;
        }
        self.text.poll_scroll(now) || changed
    }

    /// Flips the camera state. The loop keeps ticking either way.
    pub fn toggle_camera(&mut self) -> CameraState {
        self.camera = self.camera.toggled();
        log::info!("camera toggled: {}", self.camera.label());
        self.camera
    }

    pub fn camera_state(&self) -> CameraState {
        self.camera
    }

    pub fn edit_text(&mut self, text: impl Into<String>) {
        self.text.edit(text);
    }

    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    pub fn text_mut(&mut self) -> &mut TextBuffer {
        &mut self.text
    }

    pub fn overlay(&self) -> &OverlayCanvas {
        &self.overlay
    }

    /// Overlays produced by the worker and not yet taken by `pump`.
    pub fn pending_overlays(&self) -> usize {
        self.overlay_rx.len()
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn config(&self) -> &SignaConfig {
        &self.config
    }
}

impl Drop for RecognitionController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::VideoElement;
    use anyhow::anyhow;

    fn idle_controller() -> RecognitionController {
        RecognitionController::new(
            SignaConfig::default(),
            Arc::new(VideoElement::new()),
            || Err(anyhow!("not used")),
        )
    }

    #[test]
    fn camera_starts_from_config() {
        let config = SignaConfig {
            camera_enabled: false,
            ..SignaConfig::default()
        };
        let controller =
            RecognitionController::new(config, Arc::new(VideoElement::new()), || {
                Err(anyhow!("not used"))
            });
        assert_eq!(controller.camera_state(), CameraState::Off);
    }

    #[test]
    fn toggle_camera_flips_state() {
        let mut controller = idle_controller();
        assert_eq!(controller.toggle_camera(), CameraState::Off);
        assert_eq!(controller.toggle_camera(), CameraState::On);
    }

    #[test]
    fn edits_replace_visible_text_only() {
        let mut controller = idle_controller();
        controller.edit_text("hi");
        assert_eq!(controller.text().text(), "hi");
        assert_eq!(controller.text().detected_letters(), "");
    }

    #[test]
    fn disposed_controller_refuses_start() {
        let mut controller = idle_controller();
        controller.dispose();
        assert!(controller.is_disposed());
        assert!(matches!(controller.start(), Err(ControllerError::Disposed)));
    }

    #[test]
    fn stop_without_start_is_harmless() {
        let mut controller = idle_controller();
        controller.stop();
        assert_eq!(controller.status(), LoopStatus::Stopped);
        assert!(!controller.is_running());
    }

    #[test]
    fn status_labels_are_distinct() {
        let labels = [
            LoopStatus::Loading,
            LoopStatus::Running,
            LoopStatus::Failed,
            LoopStatus::Stopped,
        ]
        .map(LoopStatus::label);
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
