use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Instant,
};

use anyhow::{Context, Result, anyhow};
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    query,
    utils::{ApiBackend, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType},
};

use super::{rgba_converter, video::VideoElement};

// Built-in macOS cameras often reject YUYV even when it is reported.
const PREFERRED_PIXEL_FORMATS: &[FrameFormat] = &[
    FrameFormat::RAWRGB,
    FrameFormat::RAWBGR,
    FrameFormat::GRAY,
    FrameFormat::YUYV,
    FrameFormat::NV12,
    FrameFormat::MJPEG,
];

fn requested_formats() -> [RequestedFormat<'static>; 3] {
    [
        RequestedFormat::with_formats(
            RequestedFormatType::AbsoluteHighestFrameRate,
            PREFERRED_PIXEL_FORMATS,
        ),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

#[derive(Clone, Debug)]
pub struct CameraDevice {
    pub index: u32,
    pub label: String,
}

/// Running capture thread feeding a `VideoElement`. Dropping it stops capture
/// and unbinds the element.
#[derive(Debug)]
pub struct CameraStream {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    video: VideoElement,
}

impl CameraStream {
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
            self.video.unbind();
            log::info!("camera stream stopped");
        }
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub fn available_cameras() -> Result<Vec<CameraDevice>> {
    let cameras = query(ApiBackend::Auto).context("failed to enumerate cameras")?;
    Ok(cameras
        .into_iter()
        .enumerate()
        .map(|(idx, info)| CameraDevice {
            index: match info.index() {
                CameraIndex::Index(i) => *i,
                CameraIndex::String(_) => idx as u32,
            },
            label: info.human_name(),
        })
        .collect())
}

fn open_camera(index: u32) -> Result<Camera> {
    let mut last_err = None;

    for requested in requested_formats() {
        match Camera::new(CameraIndex::Index(index), requested) {
            Ok(mut camera) => match camera.open_stream() {
                Ok(()) => return Ok(camera),
                Err(err) => last_err = Some(anyhow::Error::from(err)),
            },
            Err(err) => last_err = Some(err.into()),
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("failed to open camera {index} with any format")))
}

/// Looks up `index` among the enumerated devices.
pub fn find_camera(devices: &[CameraDevice], index: u32) -> Result<&CameraDevice> {
    devices.iter().find(|device| device.index == index).ok_or_else(|| {
        let known: Vec<String> = devices
            .iter()
            .map(|device| format!("{} ({})", device.index, device.label))
            .collect();
        if known.is_empty() {
            anyhow!("camera {index} not found, no cameras detected")
        } else {
            anyhow!("camera {index} not found, available: {}", known.join(", "))
        }
    })
}

pub fn start_camera_stream(index: u32, video: VideoElement) -> Result<CameraStream> {
    match available_cameras() {
        Ok(devices) => {
            let device = find_camera(&devices, index)?;
            log::info!("using camera {}: {}", device.index, device.label);
        }
        // Some backends cannot enumerate but still open by index.
        Err(err) => log::warn!("camera enumeration failed: {err:?}"),
    }

    // Fail fast before spawning the capture thread.
    let probe = open_camera(index)?;
    let resolution = probe.resolution();
    drop(probe);

    video.bind(resolution.width_x, resolution.height_y);
    log::info!(
        "camera {index} opened at {}x{}",
        resolution.width_x,
        resolution.height_y
    );

    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = stop.clone();
    let sink = video.clone();

    let handle = thread::Builder::new()
        .name("camera-capture".to_string())
        .spawn(move || {
            let mut camera = match open_camera(index) {
                Ok(cam) => cam,
                Err(err) => {
                    log::error!("failed to open camera: {err:?}");
                    sink.unbind();
                    return;
                }
            };

            while !stop_flag.load(Ordering::Relaxed) {
                let started = Instant::now();
                let buffer = match camera.frame() {
                    Ok(buffer) => buffer,
                    Err(err) => {
                        log::warn!(
                            "camera frame read failed (after {:?}): {err:?}",
                            started.elapsed()
                        );
                        continue;
                    }
                };

                match rgba_converter::convert_camera_frame(&buffer) {
                    Ok(frame) => sink.publish(frame),
                    Err(err) => log::warn!("failed to decode camera frame: {err:?}"),
                }
            }

            if let Err(err) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {err:?}");
            }
        })
        .context("failed to spawn camera capture thread")?;

    Ok(CameraStream {
        stop,
        handle: Some(handle),
        video,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn devices() -> Vec<CameraDevice> {
        vec![
            CameraDevice {
                index: 0,
                label: "FaceTime HD".to_string(),
            },
            CameraDevice {
                index: 2,
                label: "USB Camera".to_string(),
            },
        ]
    }

    #[test]
    fn configured_index_is_matched_by_device_index() {
        let devices = devices();
        let device = find_camera(&devices, 2).expect("camera 2");
        assert_eq!(device.label, "USB Camera");
    }

    #[test]
    fn unknown_index_lists_available_cameras() {
        let err = find_camera(&devices(), 1).unwrap_err().to_string();
        assert!(err.contains("camera 1 not found"), "{err}");
        assert!(err.contains("0 (FaceTime HD)"), "{err}");
        assert!(err.contains("2 (USB Camera)"), "{err}");
    }

    #[test]
    fn empty_device_list_is_reported() {
        let err = find_camera(&[], 0).unwrap_err().to_string();
        assert!(err.contains("no cameras detected"), "{err}");
    }
}
