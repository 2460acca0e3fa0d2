use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

use anyhow::Result;
use crossbeam_channel::{Receiver, Sender, TrySendError, select, tick};

use super::{
    LoopStatus, RecognitionEvent,
    step::{DetectionStep, TickOutcome},
};
use crate::{
    gesture::GestureScorer,
    pipeline::{HandDetector, OverlayCanvas, VideoSource},
};

pub type DetectorLoader = Box<dyn FnOnce() -> Result<Box<dyn HandDetector>> + Send>;

/// Lifecycle of the controller's single detector instance.
pub(crate) enum DetectorSlot {
    Unloaded(DetectorLoader),
    Loaded(Box<dyn HandDetector>),
    Failed,
}

/// Capacity-one overlay hand-off. A newer canvas replaces one the UI has not
/// picked up yet, so an unrendered window holds at most one frame.
#[derive(Clone)]
pub(crate) struct OverlaySender {
    tx: Sender<OverlayCanvas>,
    rx: Receiver<OverlayCanvas>,
}

impl OverlaySender {
    pub fn channel() -> (Self, Receiver<OverlayCanvas>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (
            Self {
                tx,
                rx: rx.clone(),
            },
            rx,
        )
    }

    pub fn publish(&self, canvas: OverlayCanvas) {
        if let Err(TrySendError::Full(canvas)) = self.tx.try_send(canvas) {
            let _ = self.rx.try_recv();
            let _ = self.tx.try_send(canvas);
        }
    }
}

pub(crate) struct WorkerSettings {
    pub interval: Duration,
    pub min_score: f32,
    pub scorer: Arc<dyn GestureScorer>,
    pub video: Arc<dyn VideoSource>,
    pub events: Sender<RecognitionEvent>,
    pub overlays: OverlaySender,
}

pub(crate) struct Worker {
    stop_tx: Sender<()>,
    loading: Arc<AtomicBool>,
    handle: thread::JoinHandle<DetectorSlot>,
}

impl Worker {
    pub fn spawn(slot: DetectorSlot, settings: WorkerSettings) -> std::io::Result<Self> {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded(1);
        let loading = Arc::new(AtomicBool::new(matches!(slot, DetectorSlot::Unloaded(_))));
        let worker_loading = loading.clone();
        let handle = thread::Builder::new()
            .name("recognition-worker".to_string())
            .spawn(move || run(slot, settings, stop_rx, worker_loading))?;
        Ok(Self {
            stop_tx,
            loading,
            handle,
        })
    }

    /// Like `stop`, but a worker still inside the detector loader is left to
    /// finish on its own and `None` is returned.
    pub fn release(self) -> Option<DetectorSlot> {
        let _ = self.stop_tx.try_send(());
        if self.loading.load(Ordering::SeqCst) {
            log::info!("detector still loading, leaving it to finish in the background");
            return None;
        }
        Some(self.stop())
    }

    /// Signals the loop, waits for the in-flight tick and hands back the
    /// detector.
    pub fn stop(self) -> DetectorSlot {
        let _ = self.stop_tx.try_send(());
        match self.handle.join() {
            Ok(slot) => slot,
            Err(_) => {
                log::error!("recognition worker panicked, detector lost");
                DetectorSlot::Failed
            }
        }
    }
}

fn run(
    slot: DetectorSlot,
    settings: WorkerSettings,
    stop_rx: Receiver<()>,
    loading: Arc<AtomicBool>,
) -> DetectorSlot {
    let WorkerSettings {
        interval,
        min_score,
        scorer,
        video,
        events,
        overlays,
    } = settings;

    let detector = match slot {
        DetectorSlot::Loaded(detector) => detector,
        DetectorSlot::Failed => return DetectorSlot::Failed,
        DetectorSlot::Unloaded(loader) => {
            let _ = events.send(RecognitionEvent::Status(LoopStatus::Loading));
            let loaded = loader();
            loading.store(false, Ordering::SeqCst);
            match loaded {
                Ok(detector) => detector,
                Err(err) => {
                    log::error!("failed to load hand detector: {err:?}");
                    let _ = events.send(RecognitionEvent::Status(LoopStatus::Failed));
                    return DetectorSlot::Failed;
                }
            }
        }
    };

    if stop_rx.try_recv().is_ok() {
        log::info!("recognition stopped before the loop started");
        return DetectorSlot::Loaded(detector);
    }

    let _ = events.send(RecognitionEvent::Status(LoopStatus::Running));
    log::info!("recognition loop running every {interval:?}");

    let mut step = DetectionStep::new(detector, scorer, min_score);
    let mut canvas = OverlayCanvas::default();
    let ticker = tick(interval);

    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => match step.run(video.as_ref(), &mut canvas) {
                Ok(TickOutcome::Skipped) => {}
                Ok(TickOutcome::Processed { letter, .. }) => {
                    overlays.publish(canvas.clone());
                    if let Some(label) = letter {
                        let _ = events.send(RecognitionEvent::Letter(label));
                    }
                }
                Err(err) => log::warn!("detection tick failed: {err:?}"),
            },
        }
    }

    log::info!("recognition loop stopped");
    DetectorSlot::Loaded(step.into_detector())
}
