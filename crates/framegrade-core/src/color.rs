/// Rec.709 luma weights.
pub const LUMA_R: f32 = 0.2126;
pub const LUMA_G: f32 = 0.7152;
pub const LUMA_B: f32 = 0.0722;

/// Fixed-weight luma of a normalized RGB triple.
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_R * r + LUMA_G * g + LUMA_B * b
}

/// Normalized [0,1] value back to a byte, rounded and clamped.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// `x` is clamped into the edge range first. Equal edges behave as a hard
/// step at the edge.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Symmetric falloff: 1.0 at `center`, 0.0 at `center ± width` and beyond.
#[inline]
pub fn bell_curve(x: f32, center: f32, width: f32) -> f32 {
    1.0 - smoothstep(0.0, width, (x - center).abs())
}

/// HSL -> RGB channel helper. `t` is wrapped into [0,1).
pub fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Normalized RGB -> (hue in degrees [0,360), saturation, lightness).
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    let d = max - min;
    if d <= 0.0 {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    ((h * 60.0).rem_euclid(360.0), s, l)
}

/// (hue in degrees, saturation, lightness) -> normalized RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    if s <= 0.0 {
        return (l, l, l);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hk = h / 360.0;

    (
        hue_to_rgb(p, q, hk + 1.0 / 3.0),
        hue_to_rgb(p, q, hk),
        hue_to_rgb(p, q, hk - 1.0 / 3.0),
    )
}

/// Luma-preserving hue rotation, stored column-major.
///
/// Apply as `r' = m[0]r + m[3]g + m[6]b`, `g' = m[1]r + m[4]g + m[7]b`,
/// `b' = m[2]r + m[5]g + m[8]b`.
pub fn hue_rotation_matrix(degrees: f32) -> [f32; 9] {
    let (sin, cos) = degrees.to_radians().sin_cos();

    let a00 = 0.213 + cos * 0.787 - sin * 0.213;
    let a01 = 0.715 - cos * 0.715 - sin * 0.715;
    let a02 = 0.072 - cos * 0.072 + sin * 0.928;
    let a10 = 0.213 - cos * 0.213 + sin * 0.143;
    let a11 = 0.715 + cos * 0.285 + sin * 0.140;
    let a12 = 0.072 - cos * 0.072 - sin * 0.283;
    let a20 = 0.213 - cos * 0.213 - sin * 0.787;
    let a21 = 0.715 - cos * 0.715 + sin * 0.715;
    let a22 = 0.072 + cos * 0.928 + sin * 0.072;

    [a00, a10, a20, a01, a11, a21, a02, a12, a22]
}

pub fn is_identity_hue_rotation(degrees: f32) -> bool {
    degrees.rem_euclid(360.0) == 0.0
}

/// Inverse sRGB EOTF (IEC 61966-2-1): linear light [0,1] -> perceptual sRGB [0,1].
pub fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.0031308 {
        12.92 * x
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

/// sRGB EOTF (IEC 61966-2-1): perceptual sRGB [0,1] -> linear light [0,1].
pub fn srgb_to_linear(x: f32) -> f32 {
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

// ── Tone mapping operators ───────────────────────────────────────────────
//
// Each maps an unbounded non-negative linear value into [0,1].

pub fn reinhard(x: f32) -> f32 {
    let x = x.max(0.0);
    x / (1.0 + x)
}

// Hable (Uncharted 2) curve constants.
const HABLE_A: f32 = 0.15;
const HABLE_B: f32 = 0.50;
const HABLE_C: f32 = 0.10;
const HABLE_D: f32 = 0.20;
const HABLE_E: f32 = 0.02;
const HABLE_F: f32 = 0.30;
const FILMIC_WHITE: f32 = 11.2;
const FILMIC_EXPOSURE_BIAS: f32 = 2.0;

fn hable(x: f32) -> f32 {
    (x * (HABLE_A * x + HABLE_C * HABLE_B) + HABLE_D * HABLE_E)
        / (x * (HABLE_A * x + HABLE_B) + HABLE_D * HABLE_F)
        - HABLE_E / HABLE_F
}

pub fn filmic(x: f32) -> f32 {
    let x = x.max(0.0);
    (hable(x * FILMIC_EXPOSURE_BIAS) / hable(FILMIC_WHITE)).clamp(0.0, 1.0)
}

/// ACES filmic fit (Narkowicz 2015).
pub fn aces(x: f32) -> f32 {
    let x = x.max(0.0);
    ((x * (2.51 * x + 0.03)) / (x * (2.43 * x + 0.59) + 0.14)).clamp(0.0, 1.0)
}
