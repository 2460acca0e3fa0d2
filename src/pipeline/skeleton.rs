use crate::types::Hand;

pub const CONNECTIONS: &[(usize, usize)] = &[
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (0, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (0, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (0, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (5, 9),
    (9, 13),
    (13, 17),
];

pub const SKELETON_LINE_THICKNESS: i32 = 5;
const JOINT_RADIUS: i32 = 5;
const LINE_COLOR: [u8; 4] = [255, 255, 255, 255];
const JOINT_COLOR: [u8; 4] = [250, 128, 114, 255];

/// Transparent RGBA layer drawn over the video, sized to the frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayCanvas {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl OverlayCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; pixel_len(width, height)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.rgba
    }

    /// Resizing always clears, even to the same size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.rgba.clear();
        self.rgba.resize(pixel_len(width, height), 0);
    }

    pub fn clear(&mut self) {
        self.rgba.fill(0);
    }

    pub fn is_blank(&self) -> bool {
        self.rgba.iter().all(|&b| b == 0)
    }

    /// Joints and bone segments for every hand; an empty slice draws nothing.
    pub fn draw_hands(&mut self, hands: &[Hand]) {
        for hand in hands {
            self.draw_skeleton(&hand.points_2d());
        }
    }

    pub fn draw_skeleton(&mut self, points: &[(f32, f32)]) {
        if points.len() < 2 {
            return;
        }

        for &(a, b) in CONNECTIONS {
            if let (Some(pa), Some(pb)) = (points.get(a), points.get(b)) {
                self.draw_line(pa, pb, LINE_COLOR, SKELETON_LINE_THICKNESS);
            }
        }

        for &(x, y) in points {
            if let Some(center) = self.visible_point(x, y, JOINT_RADIUS) {
                self.draw_circle(center, JOINT_RADIUS, JOINT_COLOR);
            }
        }
    }

    /// Blends every non-transparent overlay pixel onto a same-sized RGBA frame.
    pub fn composite_onto(&self, frame_rgba: &mut [u8], width: u32, height: u32) {
        if width != self.width || height != self.height {
            return;
        }
        for (dst, src) in frame_rgba.chunks_exact_mut(4).zip(self.rgba.chunks_exact(4)) {
            let alpha = src[3] as u16;
            if alpha == 0 {
                continue;
            }
            for c in 0..3 {
                let blended = (src[c] as u16 * alpha + dst[c] as u16 * (255 - alpha)) / 255;
                dst[c] = blended as u8;
            }
            dst[3] = 255;
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) as usize) * 4;
        self.rgba
            .get(idx..idx + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    fn draw_line(&mut self, p0: &(f32, f32), p1: &(f32, f32), color: [u8; 4], thickness: i32) {
        let radius = (thickness.max(1) - 1) / 2;
        let Some(((fx0, fy0), (fx1, fy1))) = self.clip_segment(*p0, *p1, radius as f64) else {
            return;
        };
        let (mut x0, mut y0) = (fx0 as i32, fy0 as i32);
        let (x1, y1) = (fx1 as i32, fy1 as i32);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            for ox in -radius..=radius {
                for oy in -radius..=radius {
                    if ox.abs() + oy.abs() <= radius {
                        self.put_pixel(x0 + ox, y0 + oy, color);
                    }
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Liang-Barsky clip against the canvas grown by `margin` on every side.
    /// Endpoints come back inside that box, so rasterizing stays bounded by
    /// the canvas size.
    fn clip_segment(
        &self,
        p0: (f32, f32),
        p1: (f32, f32),
        margin: f64,
    ) -> Option<((f64, f64), (f64, f64))> {
        if ![p0.0, p0.1, p1.0, p1.1].iter().all(|v| v.is_finite()) {
            return None;
        }
        let (x0, y0) = (p0.0 as f64, p0.1 as f64);
        let (dx, dy) = (p1.0 as f64 - x0, p1.1 as f64 - y0);
        let (min_x, min_y) = (-margin, -margin);
        let max_x = self.width as f64 + margin;
        let max_y = self.height as f64 + margin;

        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [
            (-dx, x0 - min_x),
            (dx, max_x - x0),
            (-dy, y0 - min_y),
            (dy, max_y - y0),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
            if t0 > t1 {
                return None;
            }
        }

        let at = |t: f64| {
            (
                (x0 + t * dx).clamp(min_x, max_x),
                (y0 + t * dy).clamp(min_y, max_y),
            )
        };
        Some((at(t0), at(t1)))
    }

    fn visible_point(&self, x: f32, y: f32, margin: i32) -> Option<(i32, i32)> {
        let margin = margin as f32;
        let inside = |v: f32, extent: u32| v.is_finite() && v >= -margin && v <= extent as f32 + margin;
        (inside(x, self.width) && inside(y, self.height)).then(|| (x as i32, y as i32))
    }

    fn draw_circle(&mut self, center: (i32, i32), radius: i32, color: [u8; 4]) {
        let (cx, cy) = center;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.put_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }
        let (ux, uy) = (x as u32, y as u32);
        if ux >= self.width || uy >= self.height {
            return;
        }
        let idx = ((uy * self.width + ux) as usize) * 4;
        if let Some(px) = self.rgba.get_mut(idx..idx + 4) {
            px.copy_from_slice(&color);
        }
    }
}

fn pixel_len(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize) * 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HandLandmarks;

    fn diagonal_hand() -> Hand {
        let mut landmarks: HandLandmarks = [[0.0; 3]; 21];
        for (i, point) in landmarks.iter_mut().enumerate() {
            let v = 10.0 + i as f32 * 2.0;
            *point = [v, v, 0.0];
        }
        Hand::from_landmarks(landmarks)
    }

    #[test]
    fn draws_joints_and_segments() {
        let mut canvas = OverlayCanvas::new(64, 64);
        canvas.draw_hands(&[diagonal_hand()]);

        assert_eq!(canvas.pixel(10, 10), Some(JOINT_COLOR));
        assert!(!canvas.is_blank());
        assert_eq!(canvas.pixel(63, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn resize_clears_previous_overlay() {
        let mut canvas = OverlayCanvas::new(64, 64);
        canvas.draw_hands(&[diagonal_hand()]);
        canvas.resize(64, 64);
        assert!(canvas.is_blank());
    }

    #[test]
    fn drawing_no_hands_leaves_canvas_blank() {
        let mut canvas = OverlayCanvas::new(16, 16);
        canvas.draw_hands(&[]);
        assert!(canvas.is_blank());
    }

    #[test]
    fn composite_replaces_opaque_pixels_only() {
        let mut canvas = OverlayCanvas::new(2, 1);
        canvas.put_pixel(0, 0, [200, 100, 50, 255]);
        let mut frame = vec![10, 10, 10, 255, 20, 20, 20, 255];

        canvas.composite_onto(&mut frame, 2, 1);
        assert_eq!(frame, vec![200, 100, 50, 255, 20, 20, 20, 255]);
    }

    #[test]
    fn points_outside_canvas_are_ignored() {
        let mut canvas = OverlayCanvas::new(4, 4);
        canvas.draw_skeleton(&[(-50.0, -50.0), (-40.0, -40.0)]);
        assert!(canvas.is_blank());
    }

    #[test]
    fn far_off_landmark_draws_only_the_visible_part() {
        let mut canvas = OverlayCanvas::new(32, 32);
        canvas.draw_skeleton(&[(8.0, 8.0), (1.0e12, 8.0)]);

        assert_eq!(canvas.pixel(8, 8), Some(JOINT_COLOR));
        assert_eq!(canvas.pixel(20, 8), Some(LINE_COLOR));
        assert_eq!(canvas.pixel(31, 8), Some(LINE_COLOR));
    }

    #[test]
    fn non_finite_landmarks_are_skipped() {
        let mut canvas = OverlayCanvas::new(16, 16);
        canvas.draw_skeleton(&[(f32::NAN, 4.0), (f32::INFINITY, f32::NEG_INFINITY)]);
        assert!(canvas.is_blank());
    }
}
