use crate::error::{PipelineError, Result};

/// 8-bit RGBA frame buffer.
///
/// Pixel data is interleaved RGBARGBA... row-major, one byte per channel.
/// A `Frame` is moved through the pipeline (and across the worker boundary)
/// rather than shared, so exactly one owner can touch the bytes at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Flat pixel data: [R, G, B, A, R, G, B, A, ...].
    pub data: Vec<u8>,
}

impl Frame {
    /// Fully transparent black frame.
    ///
    /// Panics like any oversized allocation if `width * height * 4` does
    /// not fit in `usize`.
    pub fn new(width: u32, height: u32) -> Self {
        let len = byte_len(width, height).unwrap_or(usize::MAX);
        Self {
            width,
            height,
            data: vec![0; len],
        }
    }

    pub fn from_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let frame = Self {
            width,
            height,
            data,
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Check the `width * height * 4` invariant.
    ///
    /// Dimensions whose byte length overflows `usize` are rejected with
    /// `expected` set to `usize::MAX`.
    pub fn validate(&self) -> Result<()> {
        let expected = byte_len(self.width, self.height);
        let ok = self.width != 0
            && self.height != 0
            && expected.is_some_and(|n| n == self.data.len());
        if !ok {
            return Err(PipelineError::InvalidDimensions {
                width: self.width,
                height: self.height,
                expected: expected.unwrap_or(usize::MAX),
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

fn byte_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(4)
}
