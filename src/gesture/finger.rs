#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Finger::Thumb => "Thumb",
            Finger::Index => "Index",
            Finger::Middle => "Middle",
            Finger::Ring => "Ring",
            Finger::Pinky => "Pinky",
        }
    }

    /// Bone segments from the wrist outwards, as landmark index pairs.
    pub fn segments(self) -> [(usize, usize); 4] {
        match self {
            Finger::Thumb => [(0, 1), (1, 2), (2, 3), (3, 4)],
            Finger::Index => [(0, 5), (5, 6), (6, 7), (7, 8)],
            Finger::Middle => [(0, 9), (9, 10), (10, 11), (11, 12)],
            Finger::Ring => [(0, 13), (13, 14), (14, 15), (15, 16)],
            Finger::Pinky => [(0, 17), (17, 18), (18, 19), (19, 20)],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerCurl {
    NoCurl,
    HalfCurl,
    FullCurl,
}

impl FingerCurl {
    pub fn name(self) -> &'static str {
        match self {
            FingerCurl::NoCurl => "No Curl",
            FingerCurl::HalfCurl => "Half Curl",
            FingerCurl::FullCurl => "Full Curl",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FingerDirection {
    VerticalUp,
    VerticalDown,
    HorizontalLeft,
    HorizontalRight,
    DiagonalUpRight,
    DiagonalUpLeft,
    DiagonalDownRight,
    DiagonalDownLeft,
}

impl FingerDirection {
    pub fn name(self) -> &'static str {
        match self {
            FingerDirection::VerticalUp => "Vertical Up",
            FingerDirection::VerticalDown => "Vertical Down",
            FingerDirection::HorizontalLeft => "Horizontal Left",
            FingerDirection::HorizontalRight => "Horizontal Right",
            FingerDirection::DiagonalUpRight => "Diagonal Up Right",
            FingerDirection::DiagonalUpLeft => "Diagonal Up Left",
            FingerDirection::DiagonalDownRight => "Diagonal Down Right",
            FingerDirection::DiagonalDownLeft => "Diagonal Down Left",
        }
    }
}
