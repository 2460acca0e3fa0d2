//! Fingerspelling recognition: camera frames go through an ONNX hand
//! detector, the landmarks are scored against the 26 letter handsigns and
//! recognized letters are appended to an editable text buffer.

pub mod config;
pub mod error;
pub mod gesture;
pub mod model_download;
pub mod pipeline;
pub mod recognition;
pub mod types;
pub mod ui;

pub use config::{DetectorConfig, SignaConfig};
pub use error::{ConfigError, ControllerError};
pub use recognition::{LoopStatus, RecognitionController, RecognitionEvent, TextBuffer};
