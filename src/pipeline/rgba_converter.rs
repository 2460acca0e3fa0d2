use std::convert::TryFrom;

use anyhow::{Result, anyhow, ensure};
use rayon::prelude::*;
use yuv::{
    YuvBiPlanarImage, YuvConversionMode, YuvPackedImage, YuvRange, YuvStandardMatrix,
    yuv_nv12_to_rgba, yuyv422_to_rgba,
};
use zune_jpeg::{
    JpegDecoder,
    zune_core::{bytestream::ZCursor, colorspace::ColorSpace, options::DecoderOptions},
};

use crate::types::Frame;

/// Pixel layouts a capture device may hand us.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    Nv12,
    Yuyv,
    Mjpeg,
    Rgb,
    Bgr,
    Gray,
}

impl PixelLayout {
    /// Bytes needed for an uncompressed image, `None` for MJPEG.
    pub fn expected_len(self, width: u32, height: u32) -> Option<usize> {
        let pixels = width as usize * height as usize;
        match self {
            PixelLayout::Nv12 => Some(pixels + pixels / 2),
            PixelLayout::Yuyv => Some(pixels * 2),
            PixelLayout::Rgb | PixelLayout::Bgr => Some(pixels * 3),
            PixelLayout::Gray => Some(pixels),
            PixelLayout::Mjpeg => None,
        }
    }
}

#[cfg(feature = "camera-nokhwa")]
impl From<nokhwa::utils::FrameFormat> for PixelLayout {
    fn from(format: nokhwa::utils::FrameFormat) -> Self {
        use nokhwa::utils::FrameFormat;
        match format {
            FrameFormat::NV12 => PixelLayout::Nv12,
            FrameFormat::YUYV => PixelLayout::Yuyv,
            FrameFormat::MJPEG => PixelLayout::Mjpeg,
            FrameFormat::RAWRGB => PixelLayout::Rgb,
            FrameFormat::RAWBGR => PixelLayout::Bgr,
            FrameFormat::GRAY => PixelLayout::Gray,
        }
    }
}

#[cfg(feature = "camera-nokhwa")]
pub fn convert_camera_frame(buffer: &nokhwa::Buffer) -> Result<Frame> {
    let resolution = buffer.resolution();
    decode_to_frame(
        buffer.source_frame_format().into(),
        buffer.buffer(),
        resolution.width_x,
        resolution.height_y,
    )
}

pub fn decode_to_frame(layout: PixelLayout, data: &[u8], width: u32, height: u32) -> Result<Frame> {
    if let Some(expected) = layout.expected_len(width, height) {
        ensure!(
            data.len() >= expected,
            "{layout:?} buffer too small: got {}, expected {expected}",
            data.len()
        );
    }

    let rgba = match layout {
        PixelLayout::Nv12 => nv12_to_rgba(data, width, height)?,
        PixelLayout::Yuyv => yuyv_to_rgba(data, width, height)?,
        PixelLayout::Mjpeg => return mjpeg_to_frame(data),
        PixelLayout::Rgb => packed_to_rgba(data, width, height, false),
        PixelLayout::Bgr => packed_to_rgba(data, width, height, true),
        PixelLayout::Gray => gray_to_rgba(data, width, height),
    };

    Ok(Frame::new(rgba, width, height))
}

fn nv12_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let luma_len = width as usize * height as usize;
    let image = YuvBiPlanarImage {
        y_plane: &data[..luma_len],
        y_stride: width,
        uv_plane: &data[luma_len..luma_len + luma_len / 2],
        uv_stride: width,
        width,
        height,
    };

    let mut rgba = vec![0u8; luma_len * 4];
    yuv_nv12_to_rgba(
        &image,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
        YuvConversionMode::Balanced,
    )
    .map_err(|err| anyhow!("NV12 to RGBA failed: {err:?}"))?;

    Ok(rgba)
}

fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let packed = YuvPackedImage {
        yuy: data,
        yuy_stride: width * 2,
        width,
        height,
    };

    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    yuyv422_to_rgba(
        &packed,
        &mut rgba,
        width * 4,
        YuvRange::Full,
        YuvStandardMatrix::Bt709,
    )
    .map_err(|err| anyhow!("YUYV to RGBA failed: {err:?}"))?;

    Ok(rgba)
}

fn mjpeg_to_frame(data: &[u8]) -> Result<Frame> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGBA);
    let mut decoder = JpegDecoder::new_with_options(ZCursor::new(data), options);
    let rgba = decoder
        .decode()
        .map_err(|err| anyhow!("MJPEG decode failed: {err:?}"))?;
    let info = decoder
        .info()
        .ok_or_else(|| anyhow!("MJPEG decoder reported no image info"))?;

    let width = u32::try_from(info.width).map_err(|_| anyhow!("MJPEG width out of range"))?;
    let height = u32::try_from(info.height).map_err(|_| anyhow!("MJPEG height out of range"))?;
    let expected = width as usize * height as usize * 4;
    ensure!(
        rgba.len() >= expected,
        "MJPEG decode produced too few bytes: got {}, expected {expected}",
        rgba.len()
    );

    Ok(Frame::new(rgba, width, height))
}

fn packed_to_rgba(data: &[u8], width: u32, height: u32, swap_rb: bool) -> Vec<u8> {
    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    rgba.par_chunks_exact_mut(4)
        .zip(data.par_chunks_exact(3))
        .for_each(|(dst, src)| {
            let (r, b) = if swap_rb { (src[2], src[0]) } else { (src[0], src[2]) };
            dst.copy_from_slice(&[r, src[1], b, 255]);
        });
    rgba
}

fn gray_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    rgba.par_chunks_exact_mut(4)
        .zip(data.par_iter())
        .for_each(|(dst, &value)| dst.copy_from_slice(&[value, value, value, 255]));
    rgba
}
