pub mod common;
pub mod ort;
pub mod palm;

use anyhow::Result;

use crate::types::{Frame, Hand};

pub use self::ort::OrtHandDetector;

/// Finds hands in a frame and returns their landmarks in frame pixel space.
pub trait HandDetector: Send {
    fn estimate_hands(&mut self, frame: &Frame) -> Result<Vec<Hand>>;
}

impl<T: HandDetector + ?Sized> HandDetector for Box<T> {
    fn estimate_hands(&mut self, frame: &Frame) -> Result<Vec<Hand>> {
        (**self).estimate_hands(frame)
    }
}
