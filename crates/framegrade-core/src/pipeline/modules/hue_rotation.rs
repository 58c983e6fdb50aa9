use crate::color::{hue_rotation_matrix, is_identity_hue_rotation, to_u8};
use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

pub struct HueRotation;

impl ProcessingModule for HueRotation {
    fn name(&self) -> &'static str {
        "hue_rotation"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        !is_identity_hue_rotation(state.color_adjustments.hue_rotation)
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let degrees = state.color_adjustments.hue_rotation;
        if is_identity_hue_rotation(degrees) {
            return Ok(input);
        }

        let m = hue_rotation_matrix(degrees);
        for pixel in input.data.chunks_exact_mut(4) {
            let r = pixel[0] as f32 / 255.0;
            let g = pixel[1] as f32 / 255.0;
            let b = pixel[2] as f32 / 255.0;
            pixel[0] = to_u8(m[0] * r + m[3] * g + m[6] * b);
            pixel[1] = to_u8(m[1] * r + m[4] * g + m[7] * b);
            pixel[2] = to_u8(m[2] * r + m[5] * g + m[8] * b);
        }

        Ok(input)
    }
}
