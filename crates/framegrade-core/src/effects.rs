use serde::{Deserialize, Serialize};

use crate::color::{self, is_identity_hue_rotation};

/// Complete effect parameter snapshot for one pipeline run.
///
/// Every block's `Default` is its bypass value. Deserialization requires
/// all fields; there is no partial-snapshot merge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsState {
    pub color_adjustments: ColorAdjustments,
    pub cdl: CdlValues,
    pub curves: ColorCurves,
    pub color_wheels: ColorWheels,
    pub hsl_qualifier: HslQualifier,
    pub tone_mapping: ToneMapping,
    pub filters: FilterSettings,
    pub channel_mode: ChannelMode,
    pub color_inversion: bool,
}

impl EffectsState {
    /// True if any stage of the pipeline would touch the frame.
    pub fn has_active_effects(&self) -> bool {
        self.color_adjustments.has_highlights_shadows()
            || self.color_adjustments.vibrance != 0.0
            || self.color_adjustments.clarity != 0.0
            || !is_identity_hue_rotation(self.color_adjustments.hue_rotation)
            || !self.color_wheels.is_identity()
            || !self.cdl.is_identity()
            || !self.curves.is_identity()
            || self.hsl_qualifier.enabled
            || self.tone_mapping.is_active()
            || self.color_inversion
            || self.filters.sharpen > 0.0
            || self.channel_mode != ChannelMode::Rgb
    }
}

/// Tone controls independent of exposure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAdjustments {
    /// -100..100
    pub highlights: f32,
    /// -100..100
    pub shadows: f32,
    /// -100..100
    pub whites: f32,
    /// -100..100
    pub blacks: f32,
    /// -100..100
    pub vibrance: f32,
    /// Damp vibrance on skin-tone hues.
    pub vibrance_skin_protection: bool,
    /// -100..100
    pub clarity: f32,
    /// Degrees, 0..360.
    pub hue_rotation: f32,
}

impl Default for ColorAdjustments {
    fn default() -> Self {
        Self {
            highlights: 0.0,
            shadows: 0.0,
            whites: 0.0,
            blacks: 0.0,
            vibrance: 0.0,
            vibrance_skin_protection: true,
            clarity: 0.0,
            hue_rotation: 0.0,
        }
    }
}

impl ColorAdjustments {
    pub fn has_highlights_shadows(&self) -> bool {
        self.highlights != 0.0 || self.shadows != 0.0 || self.whites != 0.0 || self.blacks != 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn splat(v: f32) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// ASC CDL slope/offset/power per channel plus global saturation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdlValues {
    pub slope: Rgb,
    pub offset: Rgb,
    pub power: Rgb,
    pub saturation: f32,
}

impl Default for CdlValues {
    fn default() -> Self {
        Self {
            slope: Rgb::splat(1.0),
            offset: Rgb::splat(0.0),
            power: Rgb::splat(1.0),
            saturation: 1.0,
        }
    }
}

impl CdlValues {
    pub fn is_identity(&self) -> bool {
        self.slope == Rgb::splat(1.0)
            && self.offset == Rgb::splat(0.0)
            && self.power == Rgb::splat(1.0)
            && self.saturation == 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

impl CurvePoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One tone curve in normalized [0,1] x [0,1] space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveChannel {
    pub enabled: bool,
    pub points: Vec<CurvePoint>,
}

impl Default for CurveChannel {
    fn default() -> Self {
        Self {
            enabled: true,
            points: vec![CurvePoint::new(0.0, 0.0), CurvePoint::new(1.0, 1.0)],
        }
    }
}

impl CurveChannel {
    /// Disabled, degenerate (< 2 points) or the exact 2-point diagonal.
    pub fn is_identity(&self) -> bool {
        if !self.enabled || self.points.len() < 2 {
            return true;
        }
        self.points.len() == 2
            && self.points[0] == CurvePoint::new(0.0, 0.0)
            && self.points[1] == CurvePoint::new(1.0, 1.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorCurves {
    pub master: CurveChannel,
    pub red: CurveChannel,
    pub green: CurveChannel,
    pub blue: CurveChannel,
}

impl ColorCurves {
    pub fn is_identity(&self) -> bool {
        self.master.is_identity()
            && self.red.is_identity()
            && self.green.is_identity()
            && self.blue.is_identity()
    }
}

/// One color wheel: per-channel offsets plus a luminance component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelValues {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub y: f32,
}

impl WheelValues {
    pub fn is_zero(&self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0 && self.y == 0.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorWheels {
    pub lift: WheelValues,
    pub gamma: WheelValues,
    pub gain: WheelValues,
    pub master: WheelValues,
}

impl ColorWheels {
    pub fn is_identity(&self) -> bool {
        self.lift.is_zero() && self.gamma.is_zero() && self.gain.is_zero() && self.master.is_zero()
    }
}

/// Center/width/softness selector for one HSL component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSelector {
    pub center: f32,
    pub width: f32,
    /// Percentage of `width` used for the soft edge.
    pub softness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HslCorrection {
    /// Degrees added to the hue of selected pixels.
    pub hue_shift: f32,
    pub saturation_scale: f32,
    pub luminance_scale: f32,
}

impl Default for HslCorrection {
    fn default() -> Self {
        Self {
            hue_shift: 0.0,
            saturation_scale: 1.0,
            luminance_scale: 1.0,
        }
    }
}

/// Secondary color correction keyed on a hue/saturation/luminance matte.
///
/// Hue selector is in degrees, saturation and luminance selectors in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HslQualifier {
    pub enabled: bool,
    pub hue: RangeSelector,
    pub saturation: RangeSelector,
    pub luminance: RangeSelector,
    pub correction: HslCorrection,
    pub invert: bool,
    pub matte_preview: bool,
}

impl Default for HslQualifier {
    fn default() -> Self {
        Self {
            enabled: false,
            hue: RangeSelector {
                center: 0.0,
                width: 30.0,
                softness: 20.0,
            },
            saturation: RangeSelector {
                center: 50.0,
                width: 100.0,
                softness: 10.0,
            },
            luminance: RangeSelector {
                center: 50.0,
                width: 100.0,
                softness: 10.0,
            },
            correction: HslCorrection::default(),
            invert: false,
            matte_preview: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMappingOperator {
    #[default]
    Off,
    Reinhard,
    Filmic,
    Aces,
}

impl ToneMappingOperator {
    /// Map one linear channel value into display range.
    pub fn map(self, x: f32) -> f32 {
        match self {
            Self::Off => x,
            Self::Reinhard => color::reinhard(x),
            Self::Filmic => color::filmic(x),
            Self::Aces => color::aces(x),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToneMapping {
    pub enabled: bool,
    pub operator: ToneMappingOperator,
}

impl ToneMapping {
    pub fn is_active(&self) -> bool {
        self.enabled && self.operator != ToneMappingOperator::Off
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    /// 0..100
    pub sharpen: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    #[default]
    Rgb,
    Red,
    Green,
    Blue,
    Alpha,
    Luminance,
}
