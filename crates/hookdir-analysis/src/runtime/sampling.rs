//! One-in-N sampling with a fail-open random source.

use rand::RngCore;

/// Source of uniform random draws that can fail.
pub trait RandomSource {
    fn draw(&mut self) -> Result<u32, rand::Error>;
}

impl<R: RngCore> RandomSource for R {
    fn draw(&mut self) -> Result<u32, rand::Error> {
        let mut buf = [0u8; 4];
        self.try_fill_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

/// Capture one event in `every`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePolicy {
    every: u32,
}

impl SamplePolicy {
    pub fn new(every: u32) -> Self {
        Self { every }
    }

    pub fn every(&self) -> u32 {
        self.every
    }

    /// 0 and 1 always capture. A failed draw captures too.
    pub fn should_capture(&self, rng: &mut dyn RandomSource) -> bool {
        if self.every <= 1 {
            return true;
        }
        match rng.draw() {
            // Multiply-shift maps the draw onto 0..every.
            Ok(value) => (u64::from(value) * u64::from(self.every)) >> 32 == 0,
            Err(e) => {
                tracing::debug!(error = %e, "random source failed, capturing");
                true
            }
        }
    }
}
