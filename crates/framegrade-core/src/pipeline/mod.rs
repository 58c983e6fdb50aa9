pub mod module;
pub mod modules;

use tracing::debug;

use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;
use module::ProcessingModule;

/// Processing pipeline that chains modules together.
///
/// ```text
/// Highlights/Shadows -> Vibrance -> Clarity -> Hue Rotation -> Color Wheels
///   -> CDL -> Curves -> HSL Qualifier -> Tone Map -> Invert -> Sharpen
///   -> Channel Isolation
/// ```
///
/// The order is part of the output contract: swapping two stages changes
/// the graded pixels. Modules whose parameters are at their bypass value
/// are skipped without touching the frame.
pub struct Pipeline {
    modules: Vec<Box<dyn ProcessingModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_modules(vec![
            Box::new(modules::HighlightsShadows),
            Box::new(modules::Vibrance),
            Box::new(modules::Clarity),
            Box::new(modules::HueRotation),
            Box::new(modules::ColorWheels),
            Box::new(modules::Cdl),
            Box::new(modules::Curves),
            Box::new(modules::HslQualifier),
            Box::new(modules::ToneMap),
            Box::new(modules::Invert),
            Box::new(modules::Sharpen),
            Box::new(modules::ChannelIsolation),
        ])
    }

    /// Pipeline with a caller-chosen module order.
    pub fn with_modules(modules: Vec<Box<dyn ProcessingModule>>) -> Self {
        Self { modules }
    }

    /// Names of the modules that would run for `state`, in order.
    pub fn active_modules(&self, state: &EffectsState) -> Vec<&'static str> {
        self.modules
            .iter()
            .filter(|m| m.is_active(state))
            .map(|m| m.name())
            .collect()
    }

    /// Run the full CPU pipeline on a frame. The first failing module aborts
    /// the run and the frame is dropped.
    pub fn process_cpu(&self, input: Frame, state: &EffectsState) -> Result<Frame> {
        input.validate()?;

        let mut current = input;
        for module in &self.modules {
            if !module.is_active(state) {
                continue;
            }
            debug!(module = module.name(), "processing");
            current = module.process_cpu(current, state)?;
        }
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
