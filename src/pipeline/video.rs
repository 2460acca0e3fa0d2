use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::Frame;

/// Readiness of a video source, numbered like an HTML media element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

/// Where the recognition loop reads frames from.
pub trait VideoSource: Send + Sync {
    fn ready_state(&self) -> ReadyState;

    /// Latest frame, if any has arrived since the source was bound.
    fn snapshot(&self) -> Option<Frame>;

    /// Mirrors the frame's intrinsic size onto the display surface.
    fn set_display_size(&self, _width: u32, _height: u32) {}

    /// Releases the source once nothing will read from it again.
    fn unbind(&self) {}
}

#[derive(Debug, Default)]
struct VideoSlot {
    ready: ReadyState,
    intrinsic: Option<(u32, u32)>,
    display: Option<(u32, u32)>,
    frame: Option<Frame>,
    sequence: u64,
}

/// Shared slot the camera thread publishes into and the UI and recognition
/// loop read from.
#[derive(Clone, Debug, Default)]
pub struct VideoElement {
    slot: Arc<Mutex<VideoSlot>>,
}

impl VideoElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once the capture device is open and its format is known.
    pub fn bind(&self, width: u32, height: u32) {
        let mut slot = self.lock();
        slot.ready = ReadyState::HaveMetadata;
        slot.intrinsic = Some((width, height));
        slot.frame = None;
    }

    /// Detaches the capture device; readers see `HaveNothing` afterwards.
    pub fn unbind(&self) {
        let mut slot = self.lock();
        *slot = VideoSlot {
            sequence: slot.sequence,
            ..VideoSlot::default()
        };
    }

    pub fn publish(&self, frame: Frame) {
        let mut slot = self.lock();
        slot.intrinsic = Some((frame.width, frame.height));
        slot.ready = ReadyState::HaveEnoughData;
        slot.frame = Some(frame);
        slot.sequence = slot.sequence.wrapping_add(1);
    }

    pub fn intrinsic_size(&self) -> Option<(u32, u32)> {
        self.lock().intrinsic
    }

    pub fn display_size(&self) -> Option<(u32, u32)> {
        self.lock().display
    }

    /// Monotonic counter bumped on every published frame.
    pub fn sequence(&self) -> u64 {
        self.lock().sequence
    }

    fn lock(&self) -> MutexGuard<'_, VideoSlot> {
        // Writers only assign whole fields, so a poisoned slot is still consistent.
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl VideoSource for VideoElement {
    fn ready_state(&self) -> ReadyState {
        self.lock().ready
    }

    fn snapshot(&self) -> Option<Frame> {
        self.lock().frame.clone()
    }

    fn set_display_size(&self, width: u32, height: u32) {
        self.lock().display = Some((width, height));
    }

    fn unbind(&self) {
        VideoElement::unbind(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_only_after_first_frame() {
        let video = VideoElement::new();
        assert_eq!(video.ready_state(), ReadyState::HaveNothing);

        video.bind(4, 2);
        assert_eq!(video.ready_state(), ReadyState::HaveMetadata);
        assert!(video.snapshot().is_none());

        video.publish(Frame::blank(4, 2));
        assert_eq!(video.ready_state(), ReadyState::HaveEnoughData);
        assert_eq!(video.intrinsic_size(), Some((4, 2)));
        assert_eq!(video.sequence(), 1);
    }

    #[test]
    fn unbind_drops_frame_and_readiness() {
        let video = VideoElement::new();
        video.publish(Frame::blank(2, 2));
        video.unbind();

        assert_eq!(video.ready_state(), ReadyState::HaveNothing);
        assert!(video.snapshot().is_none());
        assert_eq!(video.sequence(), 1);
    }

    #[test]
    fn ready_state_numbers_match_media_elements() {
        assert_eq!(ReadyState::HaveEnoughData as u8, 4);
        assert!(ReadyState::HaveFutureData < ReadyState::HaveEnoughData);
    }
}
