use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Photographic negative of the color channels. Alpha is kept.
pub struct Invert;

impl ProcessingModule for Invert {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        state.color_inversion
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        if !state.color_inversion {
            return Ok(input);
        }
        for pixel in input.data.chunks_exact_mut(4) {
            pixel[0] = 255 - pixel[0];
            pixel[1] = 255 - pixel[1];
            pixel[2] = 255 - pixel[2];
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::modules::test_util::{pixels, ramp, state_with};

    #[test]
    fn inverts_rgb_keeps_alpha() {
        let state = state_with(|s| s.color_inversion = true);
        let result = Invert
            .process_cpu(pixels(&[[0, 128, 255, 77]]), &state)
            .unwrap();
        assert_eq!(result.data, vec![255, 127, 0, 77]);
    }

    #[test]
    fn twice_is_identity() {
        let state = state_with(|s| s.color_inversion = true);
        let frame = ramp(16, 4);
        let expected = frame.data.clone();
        let once = Invert.process_cpu(frame, &state).unwrap();
        assert_ne!(once.data, expected);
        let twice = Invert.process_cpu(once, &state).unwrap();
        assert_eq!(twice.data, expected);
    }

    #[test]
    fn off_is_identity() {
        let frame = ramp(4, 4);
        let expected = frame.data.clone();
        let result = Invert
            .process_cpu(frame, &EffectsState::default())
            .unwrap();
        assert_eq!(result.data, expected);
    }
}
