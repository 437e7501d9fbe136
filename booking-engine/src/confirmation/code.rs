//! Confirmation code sources

use rand::SeedableRng;
use rand::rngs::StdRng;
use shared::models::ConfirmationCode;
use std::collections::VecDeque;

/// Supplies a fresh code for every send and resend
pub trait CodeSource: Send {
    fn next_code(&mut self) -> ConfirmationCode;
}

/// Uniform random codes in `100000..=999999`
pub struct RandomCodeSource {
    rng: StdRng,
}

impl RandomCodeSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for reproducible demos
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomCodeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeSource for RandomCodeSource {
    fn next_code(&mut self) -> ConfirmationCode {
        ConfirmationCode::generate(&mut self.rng)
    }
}

/// Hands out a fixed list of codes in order, then falls back to random ones
pub struct ScriptedCodes {
    queue: VecDeque<ConfirmationCode>,
    fallback: RandomCodeSource,
}

impl ScriptedCodes {
    pub fn new(codes: impl IntoIterator<Item = ConfirmationCode>) -> Self {
        Self {
            queue: codes.into_iter().collect(),
            fallback: RandomCodeSource::seeded(0),
        }
    }

    /// Parse codes from strings; `None` if any is not six digits
    pub fn from_strs(codes: &[&str]) -> Option<Self> {
        let parsed = codes
            .iter()
            .map(|c| ConfirmationCode::parse(c))
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(parsed))
    }
}

impl CodeSource for ScriptedCodes {
    fn next_code(&mut self) -> ConfirmationCode {
        self.queue
            .pop_front()
            .unwrap_or_else(|| self.fallback.next_code())
    }
}
