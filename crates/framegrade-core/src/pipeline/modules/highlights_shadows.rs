use std::sync::LazyLock;

use crate::color::{luma, smoothstep, to_u8};
use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

pub struct HighlightsShadows;

impl ProcessingModule for HighlightsShadows {
    fn name(&self) -> &'static str {
        "highlights_shadows"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.color_adjustments.has_highlights_shadows()
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let adj = &state.color_adjustments;

        // Whites pull the white point down (brighter), blacks pull the black
        // point below zero (lifted). A collapsed range disables the remap.
        let white_point = 1.0 - adj.whites / 100.0 * WHITES_BLACKS_RANGE;
        let black_point = -adj.blacks / 100.0 * WHITES_BLACKS_RANGE;
        let range = white_point - black_point;
        let remap = (adj.whites != 0.0 || adj.blacks != 0.0) && range > 0.0;
        let inv_range = if remap { 1.0 / range } else { 1.0 };

        let highlights = adj.highlights / 100.0;
        let shadows = adj.shadows / 100.0;
        let push = highlights != 0.0 || shadows != 0.0;

        if !remap && !push {
            return Ok(input);
        }

        let hw = &*HIGHLIGHT_WEIGHTS;
        let sw = &*SHADOW_WEIGHTS;

        for pixel in input.data.chunks_exact_mut(4) {
            let mut rgb = [
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            ];

            if remap {
                for c in &mut rgb {
                    *c = ((*c - black_point) * inv_range).clamp(0.0, 1.0);
                }
            }

            if push {
                let idx = to_u8(luma(rgb[0], rgb[1], rgb[2])) as usize;
                let delta = (highlights * hw[idx] + shadows * sw[idx]) * PUSH_SCALE;
                for c in &mut rgb {
                    *c += delta;
                }
            }

            pixel[0] = to_u8(rgb[0]);
            pixel[1] = to_u8(rgb[1]);
            pixel[2] = to_u8(rgb[2]);
        }

        Ok(input)
    }
}

/// Max white/black point shift at ±100, in normalized units (55/255).
const WHITES_BLACKS_RANGE: f32 = 55.0 / 255.0;

/// Max highlight/shadow push at ±100, in normalized units.
const PUSH_SCALE: f32 = 0.4;

// Luma-indexed weights: highlights ramp in over the upper half,
// shadows ramp out over the lower half.
static HIGHLIGHT_WEIGHTS: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut lut = [0.0_f32; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = smoothstep(0.5, 1.0, i as f32 / 255.0);
    }
    lut
});

static SHADOW_WEIGHTS: LazyLock<[f32; 256]> = LazyLock::new(|| {
    let mut lut = [0.0_f32; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = 1.0 - smoothstep(0.0, 0.5, i as f32 / 255.0);
    }
    lut
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::modules::test_util::{ramp, state_with, uniform};

    #[test]
    fn identity_noop() {
        let frame = ramp(16, 4);
        let expected = frame.data.clone();
        let result = HighlightsShadows
            .process_cpu(frame, &EffectsState::default())
            .unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn highlights_recovery_on_white() {
        let state = state_with(|s| s.color_adjustments.highlights = -100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([255, 255, 255, 255], 4, 4), &state)
            .unwrap();
        for pixel in result.data.chunks_exact(4) {
            assert!(pixel[0] < 255 && pixel[1] < 255 && pixel[2] < 255);
            assert_eq!(pixel[3], 255);
        }
    }

    #[test]
    fn highlights_leave_shadows_alone() {
        let state = state_with(|s| s.color_adjustments.highlights = -100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([40, 40, 40, 255], 1, 1), &state)
            .unwrap();
        assert_eq!(&result.data[..3], &[40, 40, 40]);
    }

    #[test]
    fn shadows_lift_dark_pixels() {
        let state = state_with(|s| s.color_adjustments.shadows = 60.0);
        let result = HighlightsShadows
            .process_cpu(uniform([20, 20, 20, 255], 1, 1), &state)
            .unwrap();
        assert!(result.data[0] > 20, "got {}", result.data[0]);
    }

    #[test]
    fn shadows_leave_highlights_alone() {
        let state = state_with(|s| s.color_adjustments.shadows = 100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([230, 230, 230, 255], 1, 1), &state)
            .unwrap();
        assert_eq!(result.data[0], 230);
    }

    #[test]
    fn whites_brighten_and_blacks_lift() {
        let whites = state_with(|s| s.color_adjustments.whites = 100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([128, 128, 128, 255], 1, 1), &whites)
            .unwrap();
        assert!(result.data[0] > 128);

        let blacks = state_with(|s| s.color_adjustments.blacks = 100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([0, 0, 0, 255], 1, 1), &blacks)
            .unwrap();
        assert!(result.data[0] > 0);

        let crush = state_with(|s| s.color_adjustments.blacks = -100.0);
        let result = HighlightsShadows
            .process_cpu(uniform([30, 30, 30, 255], 1, 1), &crush)
            .unwrap();
        assert!(result.data[0] < 30);
    }

    #[test]
    fn weight_tables_are_complementary_ramps() {
        assert_eq!(HIGHLIGHT_WEIGHTS[0], 0.0);
        assert_eq!(HIGHLIGHT_WEIGHTS[255], 1.0);
        assert_eq!(SHADOW_WEIGHTS[0], 1.0);
        assert_eq!(SHADOW_WEIGHTS[255], 0.0);
        assert!(HIGHLIGHT_WEIGHTS.windows(2).all(|w| w[1] >= w[0]));
        assert!(SHADOW_WEIGHTS.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn alpha_preserved() {
        let state = state_with(|s| {
            s.color_adjustments.highlights = 50.0;
            s.color_adjustments.whites = -40.0;
        });
        let result = HighlightsShadows.process_cpu(ramp(8, 2), &state).unwrap();
        assert!(result.data.chunks_exact(4).all(|p| p[3] == 180));
    }
}
