#[cfg(feature = "camera-nokhwa")]
pub mod camera;
pub mod detector;
pub mod rgba_converter;
pub mod skeleton;
pub mod video;

#[cfg(feature = "camera-nokhwa")]
pub use camera::{CameraDevice, CameraStream, available_cameras, find_camera, start_camera_stream};
pub use detector::{HandDetector, OrtHandDetector};
pub use skeleton::OverlayCanvas;
pub use video::{ReadyState, VideoElement, VideoSource};
