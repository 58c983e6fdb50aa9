use crate::color::{linear_to_srgb, srgb_to_linear, to_u8};
use crate::effects::{EffectsState, ToneMappingOperator};
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Compresses the linearized signal with the selected operator and encodes
/// back to sRGB. The whole curve is baked into a per-call 256-entry LUT.
pub struct ToneMap;

impl ProcessingModule for ToneMap {
    fn name(&self) -> &'static str {
        "tone_mapping"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.tone_mapping.is_active()
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        if !state.tone_mapping.is_active() {
            return Ok(input);
        }

        let lut = build_lut(state.tone_mapping.operator);
        for pixel in input.data.chunks_exact_mut(4) {
            pixel[0] = lut[pixel[0] as usize];
            pixel[1] = lut[pixel[1] as usize];
            pixel[2] = lut[pixel[2] as usize];
        }

        Ok(input)
    }
}

fn build_lut(op: ToneMappingOperator) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        let linear = srgb_to_linear(i as f32 / 255.0);
        *entry = to_u8(linear_to_srgb(op.map(linear)));
    }
    lut
}
