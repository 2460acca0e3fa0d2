/// Number of joints the hand-landmark model produces for one hand.
pub const NUM_LANDMARKS: usize = 21;

#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            rgba,
            width,
            height,
        }
    }

    /// Solid black frame, mostly useful for tests and placeholders.
    pub fn blank(width: u32, height: u32) -> Self {
        let mut rgba = vec![0u8; (width as usize) * (height as usize) * 4];
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self::new(rgba, width, height)
    }
}

/// The 21 joints of one hand in MediaPipe order, in frame pixel space.
/// `z` is relative depth in the same scale as `x`/`y`.
pub type HandLandmarks = [[f32; 3]; NUM_LANDMARKS];

#[derive(Clone, Debug, PartialEq)]
pub struct PalmRegion {
    pub bbox: [f32; 4],
    pub landmarks: Vec<(f32, f32)>,
    pub score: f32,
}

#[derive(Clone, Debug)]
pub struct Hand {
    pub landmarks: HandLandmarks,
    pub score: f32,
    pub palm: Option<PalmRegion>,
}

impl Hand {
    pub fn from_landmarks(landmarks: HandLandmarks) -> Self {
        Self {
            landmarks,
            score: 1.0,
            palm: None,
        }
    }

    pub fn points_2d(&self) -> Vec<(f32, f32)> {
        self.landmarks.iter().map(|[x, y, _z]| (*x, *y)).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureMatch {
    pub name: String,
    pub confidence: f32,
}

impl GestureMatch {
    pub fn new(name: impl Into<String>, confidence: f32) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CameraState {
    #[default]
    On,
    Off,
}

impl CameraState {
    pub fn toggled(self) -> Self {
        match self {
            CameraState::On => CameraState::Off,
            CameraState::Off => CameraState::On,
        }
    }

    pub fn is_on(self) -> bool {
        matches!(self, CameraState::On)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CameraState::On => "Camera on",
            CameraState::Off => "Camera off",
        }
    }
}
