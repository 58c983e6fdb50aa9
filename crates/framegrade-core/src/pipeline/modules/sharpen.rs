use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// 3×3 cross sharpen:
///
/// ```text
///    0 -1  0
///   -1  5 -1
///    0 -1  0
/// ```
///
/// Reads from an untouched copy of the frame, blends the result in by
/// `sharpen / 100`, and leaves the 1-pixel border as-is.
pub struct Sharpen;

impl ProcessingModule for Sharpen {
    fn name(&self) -> &'static str {
        "sharpen"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.filters.sharpen > 0.0
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let amount = (state.filters.sharpen / 100.0).clamp(0.0, 1.0);
        let w = input.width as usize;
        let h = input.height as usize;
        if amount <= 0.0 || w < 3 || h < 3 {
            return Ok(input);
        }

        let src = input.data.clone();
        let stride = w * 4;

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let idx = y * stride + x * 4;
                for c in 0..3 {
                    let center = src[idx + c] as f32;
                    let neighbors = src[idx - stride + c] as f32
                        + src[idx + stride + c] as f32
                        + src[idx - 4 + c] as f32
                        + src[idx + 4 + c] as f32;
                    let sharpened = (5.0 * center - neighbors).clamp(0.0, 255.0);
                    let v = center + (sharpened - center) * amount;
                    input.data[idx + c] = v.round().clamp(0.0, 255.0) as u8;
                }
            }
        }

        Ok(input)
    }
}
