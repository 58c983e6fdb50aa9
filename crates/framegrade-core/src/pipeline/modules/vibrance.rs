use crate::color::{bell_curve, hsl_to_rgb, rgb_to_hsl, to_u8};
use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

pub struct Vibrance;

impl ProcessingModule for Vibrance {
    fn name(&self) -> &'static str {
        "vibrance"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.color_adjustments.vibrance != 0.0
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let adj = &state.color_adjustments;
        if adj.vibrance == 0.0 {
            return Ok(input);
        }

        let amount = adj.vibrance / 100.0;
        for pixel in input.data.chunks_exact_mut(4) {
            let (h, s, l) = rgb_to_hsl(
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            );

            // Boosting targets muted pixels: the gain shrinks as saturation
            // approaches 1. Cutting scales saturation down proportionally.
            let mut delta = if amount > 0.0 {
                s * amount * (1.0 - s)
            } else {
                s * amount
            };

            if adj.vibrance_skin_protection {
                delta *= 1.0 - SKIN_PROTECTION * skin_tone_weight(h);
            }

            if delta.abs() < MIN_SATURATION_DELTA {
                continue;
            }

            let (r, g, b) = hsl_to_rgb(h, (s + delta).clamp(0.0, 1.0), l);
            pixel[0] = to_u8(r);
            pixel[1] = to_u8(g);
            pixel[2] = to_u8(b);
        }
        Ok(input)
    }
}

/// Protected skin-tone band: hues within ±35° of 25° (deep red through yellow-orange).
const SKIN_HUE_CENTER: f32 = 25.0;
const SKIN_HUE_HALF_WIDTH: f32 = 35.0;
/// Fraction of the adjustment removed at the center of the band.
const SKIN_PROTECTION: f32 = 0.7;
const MIN_SATURATION_DELTA: f32 = 0.001;

/// 0.0-1.0 membership of `hue` (degrees) in the skin-tone band, wrapping at 360.
fn skin_tone_weight(hue: f32) -> f32 {
    let mut d = (hue - SKIN_HUE_CENTER).abs().rem_euclid(360.0);
    if d > 180.0 {
        d = 360.0 - d;
    }
    bell_curve(d, 0.0, SKIN_HUE_HALF_WIDTH)
}
