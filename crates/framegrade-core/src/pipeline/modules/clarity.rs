use crate::color::{luma, to_u8};
use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Local contrast: boosts (or softens) the difference between each pixel
/// and a small Gaussian blur of its neighborhood, concentrated in midtones.
pub struct Clarity;

impl ProcessingModule for Clarity {
    fn name(&self) -> &'static str {
        "clarity"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.color_adjustments.clarity != 0.0
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let clarity = state.color_adjustments.clarity;
        if clarity == 0.0 {
            return Ok(input);
        }

        let amount = clarity / 100.0 * CLARITY_SCALE;
        let blurred = gaussian_blur_rgb(&input.data, input.width as usize, input.height as usize);

        for (pixel, blur) in input.data.chunks_exact_mut(4).zip(blurred.chunks_exact(3)) {
            let rgb = [
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            ];

            let mask = midtone_mask(luma(rgb[0], rgb[1], rgb[2]));
            if mask <= 0.0 {
                continue;
            }

            let strength = mask * amount;
            for c in 0..3 {
                pixel[c] = to_u8(rgb[c] + (rgb[c] - blur[c]) * strength);
            }
        }

        Ok(input)
    }
}

const CLARITY_SCALE: f32 = 2.0;

const KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
const KERNEL_SUM: f32 = 16.0;

/// 1.0 at luma 0.5, quadratic falloff to 0.0 at black and white.
fn midtone_mask(l: f32) -> f32 {
    let d = 2.0 * l - 1.0;
    (1.0 - d * d).max(0.0)
}

/// Separable 5-tap Gaussian (1-4-6-4-1) of the RGB channels, horizontal pass
/// then vertical pass. Out-of-range taps clamp to the nearest edge pixel.
/// Returns normalized RGB triples.
fn gaussian_blur_rgb(data: &[u8], width: usize, height: usize) -> Vec<f32> {
    let mut horizontal = vec![0.0_f32; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0_f32; 3];
            for (k, weight) in KERNEL.iter().enumerate() {
                let sx = (x + k).saturating_sub(2).min(width - 1);
                let src = (y * width + sx) * 4;
                for c in 0..3 {
                    acc[c] += data[src + c] as f32 * weight;
                }
            }
            let dst = (y * width + x) * 3;
            for c in 0..3 {
                horizontal[dst + c] = acc[c] / (KERNEL_SUM * 255.0);
            }
        }
    }

    let mut out = vec![0.0_f32; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0_f32; 3];
            for (k, weight) in KERNEL.iter().enumerate() {
                let sy = (y + k).saturating_sub(2).min(height - 1);
                let src = (sy * width + x) * 3;
                for c in 0..3 {
                    acc[c] += horizontal[src + c] * weight;
                }
            }
            let dst = (y * width + x) * 3;
            for c in 0..3 {
                out[dst + c] = acc[c] / KERNEL_SUM;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::modules::test_util::{ramp, state_with, uniform};

    fn edge_frame() -> Frame {
        // Left half darker midtone, right half lighter midtone.
        let mut data = Vec::new();
        for _y in 0..6 {
            for x in 0..6 {
                let v = if x < 3 { 100 } else { 150 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Frame::from_data(6, 6, data).unwrap()
    }

    #[test]
    fn zero_clarity_is_identity() {
        let frame = ramp(9, 5);
        let expected = frame.data.clone();
        let result = Clarity
            .process_cpu(frame, &EffectsState::default())
            .unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn uniform_frame_unchanged() {
        let state = state_with(|s| s.color_adjustments.clarity = 100.0);
        let result = Clarity
            .process_cpu(uniform([120, 90, 60, 255], 7, 7), &state)
            .unwrap();
        assert!(result.data.chunks_exact(4).all(|p| p == [120, 90, 60, 255]));
    }

    #[test]
    fn positive_clarity_increases_edge_contrast() {
        let state = state_with(|s| s.color_adjustments.clarity = 80.0);
        let result = Clarity.process_cpu(edge_frame(), &state).unwrap();
        let row = 3 * 6 * 4;
        let dark_side = result.data[row + 2 * 4];
        let light_side = result.data[row + 3 * 4];
        assert!(dark_side < 100, "dark side should darken, got {dark_side}");
        assert!(light_side > 150, "light side should brighten, got {light_side}");
    }

    #[test]
    fn negative_clarity_softens_edges() {
        let state = state_with(|s| s.color_adjustments.clarity = -80.0);
        let result = Clarity.process_cpu(edge_frame(), &state).unwrap();
        let row = 3 * 6 * 4;
        assert!(result.data[row + 2 * 4] > 100);
        assert!(result.data[row + 3 * 4] < 150);
    }

    #[test]
    fn blur_preserves_uniform_and_clamps_edges() {
        let frame = uniform([200, 100, 50, 255], 3, 2);
        let blurred = gaussian_blur_rgb(&frame.data, 3, 2);
        for rgb in blurred.chunks_exact(3) {
            assert!((rgb[0] - 200.0 / 255.0).abs() < 1e-5);
            assert!((rgb[1] - 100.0 / 255.0).abs() < 1e-5);
            assert!((rgb[2] - 50.0 / 255.0).abs() < 1e-5);
        }
    }

    #[test]
    fn single_pixel_frame() {
        let state = state_with(|s| s.color_adjustments.clarity = 50.0);
        let result = Clarity
            .process_cpu(uniform([10, 128, 240, 77], 1, 1), &state)
            .unwrap();
        assert_eq!(result.data, vec![10, 128, 240, 77]);
    }

    #[test]
    fn midtone_mask_shape() {
        assert!((midtone_mask(0.5) - 1.0).abs() < 1e-6);
        assert_eq!(midtone_mask(0.0), 0.0);
        assert_eq!(midtone_mask(1.0), 0.0);
        assert!((midtone_mask(0.25) - midtone_mask(0.75)).abs() < 1e-6);
    }

    #[test]
    fn alpha_preserved() {
        let state = state_with(|s| s.color_adjustments.clarity = 60.0);
        let result = Clarity.process_cpu(ramp(8, 4), &state).unwrap();
        assert!(result.data.chunks_exact(4).all(|p| p[3] == 180));
    }
}
