use std::sync::Arc;

use gpui::RenderImage;
use image::{Frame as ImageFrame, ImageBuffer, Rgba};

use crate::{pipeline::OverlayCanvas, types::Frame};

/// Blends the skeleton overlay onto a copy of the frame and uploads it as a
/// GPUI image.
pub(super) fn frame_to_image(frame: &Frame, overlay: &OverlayCanvas) -> Option<Arc<RenderImage>> {
    let mut rgba = frame.rgba.clone();
    overlay.composite_onto(&mut rgba, frame.width, frame.height);
    rgba_to_image(frame.width, frame.height, rgba)
}

/// Black stand-in shown while the camera is off.
pub(super) fn placeholder_image(width: u32, height: u32) -> Option<Arc<RenderImage>> {
    let frame = Frame::blank(width.max(1), height.max(1));
    rgba_to_image(frame.width, frame.height, frame.rgba)
}

fn rgba_to_image(width: u32, height: u32, mut rgba: Vec<u8>) -> Option<Arc<RenderImage>> {
    // GPUI expects BGRA.
    swap_red_blue(&mut rgba);

    let buffer = ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(width, height, rgba)?;
    Some(Arc::new(RenderImage::new(vec![ImageFrame::new(buffer)])))
}

fn swap_red_blue(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}
