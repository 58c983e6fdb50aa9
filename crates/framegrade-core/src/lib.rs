//! CPU color/effects pipeline for 8-bit RGBA frames.
//!
//! A [`Frame`] and an [`EffectsState`] snapshot go in, the graded frame comes
//! out. The pipeline holds no state between calls.

pub mod color;
pub mod effects;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use effects::EffectsState;
pub use error::{PipelineError, Result};
pub use frame::Frame;
pub use pipeline::Pipeline;
