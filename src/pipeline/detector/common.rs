use anyhow::{Context, Result, anyhow, ensure};
use fast_image_resize as fir;
use ndarray::Array4;
use rayon::prelude::*;

use crate::types::{Frame, HandLandmarks, NUM_LANDMARKS};

pub const HANDPOSE_INPUT_SIZE: u32 = 224;
pub const PALM_INPUT_SIZE: u32 = 192;

/// How a frame was scaled and padded into a square model input.
#[derive(Clone, Debug)]
pub struct LetterboxInfo {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub orig_w: u32,
    pub orig_h: u32,
}

/// Rotated square crop of a frame, and its inverse mapping.
#[derive(Clone, Debug)]
pub struct CropTransform {
    pub center: (f32, f32),
    pub side: f32,
    pub angle: f32,
    pub output_size: u32,
    pub orig_w: u32,
    pub orig_h: u32,
}

impl CropTransform {
    /// Maps a point in crop pixels back to frame pixels.
    pub fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let half = self.output_size as f32 / 2.0;
        let scale = self.scale();
        let dx = (x - half) * scale;
        let dy = (y - half) * scale;
        let (sin, cos) = self.angle.sin_cos();
        let ox = self.center.0 + dx * cos - dy * sin;
        let oy = self.center.1 + dx * sin + dy * cos;
        (
            ox.clamp(0.0, self.orig_w.saturating_sub(1) as f32),
            oy.clamp(0.0, self.orig_h.saturating_sub(1) as f32),
        )
    }

    /// Frame pixels per crop pixel.
    pub fn scale(&self) -> f32 {
        self.side / self.output_size as f32
    }
}

fn check_frame(frame: &Frame) -> Result<()> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    ensure!(
        frame.rgba.len() == expected,
        "frame buffer size mismatch: got {}, expected {expected}",
        frame.rgba.len()
    );
    Ok(())
}

/// Resizes a frame into a black-padded `target_size` square, NHWC in `[0, 1]`.
pub fn letterbox_frame(frame: &Frame, target_size: u32) -> Result<(Array4<f32>, LetterboxInfo)> {
    check_frame(frame)?;

    let scale = target_size as f32 / (frame.width.max(frame.height) as f32);
    let new_w = ((frame.width as f32 * scale).round() as u32).clamp(1, target_size);
    let new_h = ((frame.height as f32 * scale).round() as u32).clamp(1, target_size);

    let src = fir::images::Image::from_vec_u8(
        frame.width,
        frame.height,
        frame.rgba.clone(),
        fir::PixelType::U8x4,
    )?;
    let mut dst = fir::images::Image::new(new_w, new_h, fir::PixelType::U8x4);
    let options = fir::ResizeOptions::new()
        .resize_alg(fir::ResizeAlg::Interpolation(fir::FilterType::Bilinear));
    fir::Resizer::new()
        .resize(&src, &mut dst, Some(&options))
        .context("fast resize failed")?;
    let resized = dst.into_vec();

    let pad_x = ((target_size - new_w) / 2) as usize;
    let pad_y = ((target_size - new_h) / 2) as usize;
    let side = target_size as usize;
    let row_len = new_w as usize;

    let mut data = vec![0.0f32; side * side * 3];
    data.par_chunks_exact_mut(side * 3)
        .enumerate()
        .for_each(|(y, row)| {
            if y < pad_y || y >= pad_y + new_h as usize {
                return;
            }
            let src_row = &resized[(y - pad_y) * row_len * 4..(y - pad_y + 1) * row_len * 4];
            for (x, px) in src_row.chunks_exact(4).enumerate() {
                let dst = &mut row[(pad_x + x) * 3..(pad_x + x) * 3 + 3];
                dst[0] = px[0] as f32 / 255.0;
                dst[1] = px[1] as f32 / 255.0;
                dst[2] = px[2] as f32 / 255.0;
            }
        });

    let input = Array4::from_shape_vec((1, side, side, 3), data)
        .map_err(|err| anyhow!("failed to build input tensor: {err}"))?;

    Ok((
        input,
        LetterboxInfo {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
            orig_w: frame.width,
            orig_h: frame.height,
        },
    ))
}

/// Samples a rotated square around `center` into an `output_size` NHWC tensor.
pub fn rotated_crop(
    frame: &Frame,
    center: (f32, f32),
    side: f32,
    angle: f32,
    output_size: u32,
) -> Result<(Array4<f32>, CropTransform)> {
    check_frame(frame)?;

    let transform = CropTransform {
        center,
        side,
        angle,
        output_size,
        orig_w: frame.width,
        orig_h: frame.height,
    };

    let size = output_size as usize;
    let half = output_size as f32 / 2.0;
    let scale = transform.scale();
    let (sin, cos) = angle.sin_cos();

    let mut data = vec![0.0f32; size * size * 3];
    data.par_chunks_exact_mut(size * 3)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = (y as f32 + 0.5 - half) * scale;
            for (x, dst) in row.chunks_exact_mut(3).enumerate() {
                let dx = (x as f32 + 0.5 - half) * scale;
                let src_x = center.0 + dx * cos - dy * sin;
                let src_y = center.1 + dx * sin + dy * cos;
                dst.copy_from_slice(&sample_bilinear(frame, src_x, src_y));
            }
        });

    let input = Array4::from_shape_vec((1, size, size, 3), data)
        .map_err(|err| anyhow!("failed to build crop tensor: {err}"))?;

    Ok((input, transform))
}

/// Reads 21 `(x, y, z)` triples from a flat model output.
pub fn decode_landmarks(flat: &[f32]) -> Result<HandLandmarks> {
    ensure!(
        flat.len() >= NUM_LANDMARKS * 3,
        "unexpected landmarks length: got {}, need {}",
        flat.len(),
        NUM_LANDMARKS * 3
    );

    let mut landmarks = [[0.0f32; 3]; NUM_LANDMARKS];
    for (dst, chunk) in landmarks.iter_mut().zip(flat.chunks_exact(3)) {
        *dst = [chunk[0], chunk[1], chunk[2]];
    }
    Ok(landmarks)
}

/// Crop-space landmarks to frame pixel space; depth is rescaled like x/y.
pub fn project_landmarks(landmarks: &HandLandmarks, transform: &CropTransform) -> HandLandmarks {
    let scale = transform.scale();
    let mut projected = [[0.0f32; 3]; NUM_LANDMARKS];
    for (dst, [x, y, z]) in projected.iter_mut().zip(landmarks) {
        let (px, py) = transform.project(*x, *y);
        *dst = [px, py, z * scale];
    }
    projected
}

fn sample_bilinear(frame: &Frame, x: f32, y: f32) -> [f32; 3] {
    if !x.is_finite() || !y.is_finite() {
        return [0.0; 3];
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let fetch = |cx: f32, cy: f32| -> [f32; 3] {
        let (ix, iy) = (cx as i64, cy as i64);
        if ix < 0 || iy < 0 || ix >= frame.width as i64 || iy >= frame.height as i64 {
            return [0.0; 3];
        }
        let idx = ((iy as usize) * frame.width as usize + ix as usize) * 4;
        [
            frame.rgba[idx] as f32 / 255.0,
            frame.rgba[idx + 1] as f32 / 255.0,
            frame.rgba[idx + 2] as f32 / 255.0,
        ]
    };

    let c00 = fetch(x0, y0);
    let c10 = fetch(x0 + 1.0, y0);
    let c01 = fetch(x0, y0 + 1.0);
    let c11 = fetch(x0 + 1.0, y0 + 1.0);

    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    std::array::from_fn(|c| {
        lerp(
            lerp(c00[c], c10[c], fx),
            lerp(c01[c], c11[c], fx),
            fy,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white_frame(width: u32, height: u32) -> Frame {
        Frame::new(vec![255; (width * height * 4) as usize], width, height)
    }

    #[test]
    fn letterbox_pads_the_short_side() {
        let (input, info) = letterbox_frame(&white_frame(40, 20), 20).expect("letterbox");
        assert_eq!(input.shape(), &[1, 20, 20, 3]);
        assert_eq!(info.scale, 0.5);
        assert_eq!(info.pad_x, 0.0);
        assert_eq!(info.pad_y, 5.0);
        assert_eq!(input[[0, 0, 0, 0]], 0.0);
        assert_eq!(input[[0, 10, 10, 0]], 1.0);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let frame = Frame::new(vec![0; 10], 4, 4);
        assert!(letterbox_frame(&frame, 16).is_err());
    }

    #[test]
    fn unrotated_crop_projects_center_to_center() {
        let transform = CropTransform {
            center: (50.0, 40.0),
            side: 20.0,
            angle: 0.0,
            output_size: 10,
            orig_w: 100,
            orig_h: 100,
        };
        assert_eq!(transform.project(5.0, 5.0), (50.0, 40.0));
        assert_eq!(transform.project(0.0, 0.0), (40.0, 30.0));
    }

    #[test]
    fn projected_depth_uses_crop_scale() {
        let transform = CropTransform {
            center: (50.0, 50.0),
            side: 448.0,
            angle: 0.0,
            output_size: 224,
            orig_w: 640,
            orig_h: 480,
        };
        let mut landmarks = [[112.0, 112.0, 0.0]; NUM_LANDMARKS];
        landmarks[0][2] = 3.0;
        let projected = project_landmarks(&landmarks, &transform);
        assert_eq!(projected[0], [50.0, 50.0, 6.0]);
    }

    #[test]
    fn short_landmark_output_is_an_error() {
        assert!(decode_landmarks(&[0.0; 10]).is_err());
        let decoded = decode_landmarks(&(0..63).map(|v| v as f32).collect::<Vec<_>>()).unwrap();
        assert_eq!(decoded[20], [60.0, 61.0, 62.0]);
    }
}
