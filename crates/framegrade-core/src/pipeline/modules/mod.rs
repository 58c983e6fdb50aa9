mod cdl;
mod channel_isolation;
mod clarity;
mod color_wheels;
mod curves;
mod highlights_shadows;
mod hsl_qualifier;
mod hue_rotation;
mod invert;
mod sharpen;
mod tone_map;
mod vibrance;

pub use cdl::Cdl;
pub use channel_isolation::ChannelIsolation;
pub use clarity::Clarity;
pub use color_wheels::ColorWheels;
pub use curves::{Curves, curve_lut};
pub use highlights_shadows::HighlightsShadows;
pub use hsl_qualifier::{HslQualifier, qualifier_matte};
pub use hue_rotation::HueRotation;
pub use invert::Invert;
pub use sharpen::Sharpen;
pub use tone_map::ToneMap;
pub use vibrance::Vibrance;
