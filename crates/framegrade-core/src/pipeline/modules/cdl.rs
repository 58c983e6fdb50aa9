use crate::color::{luma, to_u8};
use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// ASC CDL: `out = max(in * slope + offset, 0) ^ power` per channel, then
/// saturation around Rec.709 luma.
pub struct Cdl;

impl ProcessingModule for Cdl {
    fn name(&self) -> &'static str {
        "cdl"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        !state.cdl.is_identity()
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let cdl = &state.cdl;
        if cdl.is_identity() {
            return Ok(input);
        }

        let slope = cdl.slope.to_array();
        let offset = cdl.offset.to_array();
        let power = cdl.power.to_array();
        let saturation = cdl.saturation;

        for pixel in input.data.chunks_exact_mut(4) {
            let mut rgb = [0.0_f32; 3];
            for c in 0..3 {
                let v = (pixel[c] as f32 / 255.0 * slope[c] + offset[c]).max(0.0);
                rgb[c] = if power[c] == 1.0 { v } else { v.powf(power[c]) };
            }

            if saturation != 1.0 {
                let y = luma(rgb[0], rgb[1], rgb[2]);
                for c in &mut rgb {
                    *c = y + saturation * (*c - y);
                }
            }

            pixel[0] = to_u8(rgb[0]);
            pixel[1] = to_u8(rgb[1]);
            pixel[2] = to_u8(rgb[2]);
        }

        Ok(input)
    }
}
