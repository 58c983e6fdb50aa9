use crate::color::{luma, to_u8};
use crate::effects::{ChannelMode, EffectsState};
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Shows a single channel (or luma) as grayscale.
pub struct ChannelIsolation;

impl ProcessingModule for ChannelIsolation {
    fn name(&self) -> &'static str {
        "channel_isolation"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.channel_mode != ChannelMode::Rgb
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let source = match state.channel_mode {
            ChannelMode::Rgb => return Ok(input),
            ChannelMode::Red => Some(0),
            ChannelMode::Green => Some(1),
            ChannelMode::Blue => Some(2),
            ChannelMode::Alpha => Some(3),
            ChannelMode::Luminance => None,
        };

        for pixel in input.data.chunks_exact_mut(4) {
            let v = match source {
                Some(c) => pixel[c],
                None => to_u8(luma(
                    pixel[0] as f32 / 255.0,
                    pixel[1] as f32 / 255.0,
                    pixel[2] as f32 / 255.0,
                )),
            };
            pixel[0] = v;
            pixel[1] = v;
            pixel[2] = v;
        }

        Ok(input)
    }
}
