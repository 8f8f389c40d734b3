//! Synthesis configuration.

use crate::SynthError;

/// Tunables for contract synthesis.
///
/// The hash combine is `acc = acc * hash_multiplier + h` in wrapping 32-bit
/// arithmetic, starting from `hash_seed`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SynthOptions {
    pub hash_multiplier: i32,
    pub hash_seed: i32,
    /// Synthesize independent declarations on worker threads.
    pub parallel: bool,
}

impl Default for SynthOptions {
    fn default() -> Self {
        Self {
            hash_multiplier: 31,
            hash_seed: 0,
            parallel: false,
        }
    }
}

impl SynthOptions {
    #[must_use]
    pub fn with_hash_multiplier(mut self, multiplier: i32) -> Self {
        self.hash_multiplier = multiplier;
        self
    }

    #[must_use]
    pub fn with_hash_seed(mut self, seed: i32) -> Self {
        self.hash_seed = seed;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject settings that would make the hash degenerate.
    pub fn validate(&self) -> Result<(), SynthError> {
        // An even multiplier shifts early properties out of the low bits.
        if self.hash_multiplier % 2 == 0 {
            return Err(SynthError::InvalidOptions {
                reason: "hash multiplier must be odd",
            });
        }
        Ok(())
    }
}
