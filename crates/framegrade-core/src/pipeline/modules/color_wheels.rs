use crate::color::{bell_curve, luma, smoothstep, to_u8};
use crate::effects::{EffectsState, WheelValues};
use crate::error::Result;
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

/// Lift/gamma/gain/master color wheels.
///
/// ```text
///   master  uniform offset            weight 1
///   lift    additive                  weight 1 - smoothstep(0.0, 0.5, luma)
///   gamma   power curve blend         weight bell(luma, 0.5, 0.5)
///   gain    multiplicative blend      weight smoothstep(0.5, 1.0, luma)
/// ```
///
/// Each wheel adds its luminance component `y` to every channel offset.
/// Zones are weighted by the luma after the master wheel is applied.
pub struct ColorWheels;

impl ProcessingModule for ColorWheels {
    fn name(&self) -> &'static str {
        "color_wheels"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        !state.color_wheels.is_identity()
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let wheels = &state.color_wheels;
        if wheels.is_identity() {
            return Ok(input);
        }

        let master = channel_offsets(&wheels.master);
        let lift = channel_offsets(&wheels.lift);
        let gain = channel_offsets(&wheels.gain);
        let gamma_exp = channel_offsets(&wheels.gamma).map(|g| 1.0 / (1.0 + g).max(MIN_GAMMA));

        let use_master = !wheels.master.is_zero();
        let use_lift = !wheels.lift.is_zero();
        let use_gamma = !wheels.gamma.is_zero();
        let use_gain = !wheels.gain.is_zero();

        for pixel in input.data.chunks_exact_mut(4) {
            let mut rgb = [
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            ];

            if use_master {
                for (c, offset) in rgb.iter_mut().zip(master) {
                    *c += offset;
                }
            }

            let l = luma(rgb[0], rgb[1], rgb[2]).clamp(0.0, 1.0);

            if use_lift {
                let w = 1.0 - smoothstep(0.0, 0.5, l);
                for (c, offset) in rgb.iter_mut().zip(lift) {
                    *c += offset * w;
                }
            }

            if use_gamma {
                let w = bell_curve(l, 0.5, 0.5);
                for (c, exp) in rgb.iter_mut().zip(gamma_exp) {
                    let corrected = c.max(0.0).powf(exp);
                    *c += (corrected - *c) * w;
                }
            }

            if use_gain {
                let w = smoothstep(0.5, 1.0, l);
                for (c, factor) in rgb.iter_mut().zip(gain) {
                    let corrected = *c * (1.0 + factor);
                    *c += (corrected - *c) * w;
                }
            }

            pixel[0] = to_u8(rgb[0]);
            pixel[1] = to_u8(rgb[1]);
            pixel[2] = to_u8(rgb[2]);
        }

        Ok(input)
    }
}

const MIN_GAMMA: f32 = 0.01;

fn channel_offsets(w: &WheelValues) -> [f32; 3] {
    [w.r + w.y, w.g + w.y, w.b + w.y]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::modules::test_util::{pixels, ramp, state_with};

    const DARK: [u8; 4] = [30, 30, 30, 255];
    const MID: [u8; 4] = [128, 128, 128, 255];
    const BRIGHT: [u8; 4] = [225, 225, 225, 255];

    fn run(state: &EffectsState) -> Vec<u8> {
        ColorWheels
            .process_cpu(pixels(&[DARK, MID, BRIGHT]), state)
            .unwrap()
            .data
    }

    #[test]
    fn identity_noop() {
        let frame = ramp(8, 2);
        let expected = frame.data.clone();
        let result = ColorWheels
            .process_cpu(frame, &EffectsState::default())
            .unwrap();
        assert_eq!(result.data, expected);
    }

    #[test]
    fn lift_targets_shadows() {
        let state = state_with(|s| s.color_wheels.lift.y = 0.2);
        let out = run(&state);
        let dark_delta = out[0] as i32 - DARK[0] as i32;
        let bright_delta = out[8] as i32 - BRIGHT[0] as i32;
        assert!(dark_delta > 20, "lift should raise shadows: {dark_delta}");
        assert_eq!(bright_delta, 0, "lift should not touch highlights");
    }

    #[test]
    fn gain_targets_highlights() {
        let state = state_with(|s| s.color_wheels.gain.y = -0.3);
        let out = run(&state);
        assert_eq!(out[0], DARK[0], "gain should not touch shadows");
        assert!(out[8] < BRIGHT[0], "negative gain should darken highlights");
    }

    #[test]
    fn gamma_targets_midtones() {
        let state = state_with(|s| s.color_wheels.gamma.y = 0.5);
        let out = run(&state);
        let dark_delta = out[0] as i32 - DARK[0] as i32;
        let mid_delta = out[4] as i32 - MID[0] as i32;
        let bright_delta = out[8] as i32 - BRIGHT[0] as i32;
        assert!(mid_delta > 0, "positive gamma should brighten midtones");
        assert!(
            mid_delta > dark_delta && mid_delta > bright_delta,
            "midtones should move most: dark={dark_delta} mid={mid_delta} bright={bright_delta}"
        );
    }

    #[test]
    fn master_is_uniform() {
        let state = state_with(|s| s.color_wheels.master.r = 0.1);
        let out = run(&state);
        for i in 0..3 {
            let red = out[i * 4] as i32 - [DARK, MID, BRIGHT][i][0] as i32;
            assert!((red - 26).abs() <= 1, "pixel {i}: red delta {red}");
            assert_eq!(out[i * 4 + 1], [DARK, MID, BRIGHT][i][1]);
        }
    }

    #[test]
    fn channel_tint_only_moves_that_channel() {
        let state = state_with(|s| s.color_wheels.lift.b = 0.2);
        let out = run(&state);
        assert!(out[2] > DARK[2]);
        assert_eq!(out[0], DARK[0]);
        assert_eq!(out[1], DARK[1]);
    }

    #[test]
    fn alpha_preserved() {
        let state = state_with(|s| {
            s.color_wheels.lift.r = 0.1;
            s.color_wheels.gain.g = 0.2;
        });
        let result = ColorWheels.process_cpu(ramp(8, 2), &state).unwrap();
        assert!(result.data.chunks_exact(4).all(|p| p[3] == 180));
    }
}
