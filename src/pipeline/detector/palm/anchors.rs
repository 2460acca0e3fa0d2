/// Total SSD anchors for the 192x192 palm detector.
pub const NUM_ANCHORS: usize = 2016;

// (stride, anchors per feature-map cell). Stride 16 is shared by three layers
// with two anchors each.
const LAYERS: &[(u32, usize)] = &[(8, 2), (16, 6)];

/// Normalized `[cx, cy]` anchor centers in the order the model emits scores.
pub fn generate_anchors(input_size: u32) -> Vec<[f32; 2]> {
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for &(stride, per_cell) in LAYERS {
        let cells = input_size.div_ceil(stride);
        for y in 0..cells {
            let cy = (y as f32 + 0.5) / cells as f32;
            for x in 0..cells {
                let cx = (x as f32 + 0.5) / cells as f32;
                anchors.extend(std::iter::repeat_n([cx, cy], per_cell));
            }
        }
    }
    anchors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::detector::common::PALM_INPUT_SIZE;

    #[test]
    fn palm_input_yields_expected_anchor_count() {
        let anchors = generate_anchors(PALM_INPUT_SIZE);
        assert_eq!(anchors.len(), NUM_ANCHORS);
    }

    #[test]
    fn anchors_are_cell_centers() {
        let anchors = generate_anchors(PALM_INPUT_SIZE);
        assert_eq!(anchors[0], [0.5 / 24.0, 0.5 / 24.0]);
        assert_eq!(anchors[1], anchors[0]);
        assert_eq!(anchors[2], [1.5 / 24.0, 0.5 / 24.0]);
        assert_eq!(anchors[1152], [0.5 / 12.0, 0.5 / 12.0]);
        assert_eq!(anchors[NUM_ANCHORS - 1], [11.5 / 12.0, 11.5 / 12.0]);
    }
}
