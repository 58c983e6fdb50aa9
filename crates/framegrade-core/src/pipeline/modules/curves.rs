use crate::color::to_u8;
use crate::effects::{CurveChannel, CurvePoint, EffectsState};
use crate::error::{PipelineError, Result};
use crate::frame::Frame;
use crate::pipeline::module::ProcessingModule;

type Lut = [u8; 256];

/// Master + per-channel tone curves, each baked into a 256-entry LUT.
///
/// The master curve is applied first, then the red/green/blue curves.
pub struct Curves;

impl ProcessingModule for Curves {
    fn name(&self) -> &'static str {
        "curves"
    }

    fn is_active(&self, state: &EffectsState) -> bool {
        !state.curves.is_identity()
    }

    fn process_cpu(&self, mut input: Frame, state: &EffectsState) -> Result<Frame> {
        let curves = &state.curves;

        let master = channel_lut("master", &curves.master)?;
        let channels = [
            channel_lut("red", &curves.red)?,
            channel_lut("green", &curves.green)?,
            channel_lut("blue", &curves.blue)?,
        ];

        if master.is_none() && channels.iter().all(Option::is_none) {
            return Ok(input);
        }

        // Fold master into each channel so the per-pixel cost is one lookup.
        let mut combined = [IDENTITY_LUT; 3];
        for (lut, channel) in combined.iter_mut().zip(&channels) {
            for (i, entry) in lut.iter_mut().enumerate() {
                let after_master = master.as_ref().map_or(i as u8, |m| m[i]);
                *entry = channel.as_ref().map_or(after_master, |c| c[after_master as usize]);
            }
        }

        for pixel in input.data.chunks_exact_mut(4) {
            pixel[0] = combined[0][pixel[0] as usize];
            pixel[1] = combined[1][pixel[1] as usize];
            pixel[2] = combined[2][pixel[2] as usize];
        }

        Ok(input)
    }
}

const IDENTITY_LUT: Lut = {
    let mut lut = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        lut[i] = i as u8;
        i += 1;
    }
    lut
};

/// LUT for one channel, or `None` when the channel is a no-op.
fn channel_lut(name: &str, channel: &CurveChannel) -> Result<Option<Lut>> {
    if !channel.enabled {
        return Ok(None);
    }
    validate_points(name, &channel.points)?;
    if channel.is_identity() {
        return Ok(None);
    }
    Ok(Some(interpolate(&channel.points)))
}

fn validate_points(name: &str, points: &[CurvePoint]) -> Result<()> {
    if let Some(bad) = points
        .iter()
        .find(|p| !p.x.is_finite() || !p.y.is_finite())
    {
        return Err(PipelineError::InvalidParameter {
            stage: "curves",
            reason: format!(
                "{name} curve has non-finite control point ({}, {})",
                bad.x, bad.y
            ),
        });
    }
    Ok(())
}

/// Bake a curve into a 256-entry table.
///
/// Control points are sorted by `x`; inputs left of the first point take the
/// first point's value and inputs right of the last take the last's. Fewer
/// than two points yield the identity table.
pub fn curve_lut(channel: &CurveChannel) -> Result<Lut> {
    validate_points("curve", &channel.points)?;
    if channel.points.len() < 2 {
        return Ok(IDENTITY_LUT);
    }
    Ok(interpolate(&channel.points))
}

fn interpolate(points: &[CurvePoint]) -> Lut {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    let mut lut = [0u8; 256];
    let mut seg = 0;
    for (i, entry) in lut.iter_mut().enumerate() {
        let x = i as f32 / 255.0;
        let y = if x <= first.x {
            first.y
        } else if x >= last.x {
            last.y
        } else {
            while seg + 1 < sorted.len() - 1 && x > sorted[seg + 1].x {
                seg += 1;
            }
            let p0 = sorted[seg];
            let p1 = sorted[seg + 1];
            let dx = p1.x - p0.x;
            if dx <= 0.0 {
                p1.y
            } else {
                p0.y + (x - p0.x) / dx * (p1.y - p0.y)
            }
        };
        *entry = to_u8(y.clamp(0.0, 1.0));
    }
    lut
}
