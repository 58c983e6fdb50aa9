use crate::color::{hsl_to_rgb, rgb_to_hsl, smoothstep, to_u8};
use crate::effects::{self, EffectsState, RangeSelector};
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Secondary correction: selects pixels by hue/saturation/luminance and
/// grades only the selection, or shows the selection matte itself.
pub struct HslQualifier;

impl ProcessingModule for HslQualifier {
    fn name(&self) -> &'static str {
        "hsl_qualifier"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.hsl_qualifier.enabled
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let q = &state.hsl_qualifier;
        if !q.enabled {
            return Ok(input);
        }

        let correction = q.correction;
        for pixel in input.data.chunks_exact_mut(4) {
            let r = pixel[0] as f32 / 255.0;
            let g = pixel[1] as f32 / 255.0;
            let b = pixel[2] as f32 / 255.0;
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let matte = qualifier_matte(h, s, l, q);

            if q.matte_preview {
                let gray = to_u8(matte);
                pixel[0] = gray;
                pixel[1] = gray;
                pixel[2] = gray;
                continue;
            }

            if matte < MIN_MATTE {
                continue;
            }

            let new_h = (h + correction.hue_shift * matte).rem_euclid(360.0);
            let new_s = (s * (1.0 + (correction.saturation_scale - 1.0) * matte)).clamp(0.0, 1.0);
            let new_l = (l * (1.0 + (correction.luminance_scale - 1.0) * matte)).clamp(0.0, 1.0);
            let (cr, cg, cb) = hsl_to_rgb(new_h, new_s, new_l);

            pixel[0] = to_u8(r + (cr - r) * matte);
            pixel[1] = to_u8(g + (cg - g) * matte);
            pixel[2] = to_u8(b + (cb - b) * matte);
        }

        Ok(input)
    }
}

const MIN_MATTE: f32 = 0.001;

/// Selection strength in [0,1] for a pixel given as (hue°, s, l).
///
/// Saturation and luminance selectors work in percent. Hue distance wraps
/// at 180°; saturation and luminance distances are linear.
pub fn qualifier_matte(h: f32, s: f32, l: f32, q: &effects::HslQualifier) -> f32 {
    let mut hue_distance = (h - q.hue.center).abs().rem_euclid(360.0);
    if hue_distance > 180.0 {
        hue_distance = 360.0 - hue_distance;
    }

    let matte = range_match(hue_distance, &q.hue)
        * range_match((s * 100.0 - q.saturation.center).abs(), &q.saturation)
        * range_match((l * 100.0 - q.luminance.center).abs(), &q.luminance);

    if q.invert { 1.0 - matte } else { matte }
}

/// 1 inside `width/2`, 0 beyond the soft edge, smoothstep in between.
fn range_match(distance: f32, sel: &RangeSelector) -> f32 {
    let inner = sel.width * 0.5;
    let outer = inner + sel.softness * sel.width / 100.0;
    if distance <= inner {
        1.0
    } else if distance >= outer {
        0.0
    } else {
        1.0 - smoothstep(inner, outer, distance)
    }
}
