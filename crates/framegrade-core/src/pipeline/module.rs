use crate::effects::EffectsState;
use crate::error::Result;
use crate::frame::Frame;

/// A single step in the processing pipeline.
pub trait ProcessingModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// O(1) check against the snapshot; inactive modules are never run.
    fn is_active(&self, state: &EffectsState) -> bool;

    fn process_cpu(&self, input: Frame, state: &EffectsState) -> Result<Frame>;
}
