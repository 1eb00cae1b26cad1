//! Injectable randomness for backoff selection
//!
//! The uniform draw sits behind a trait so tests can replay fixed
//! sequences and check the contention-window bounds exactly.

use std::collections::VecDeque;

use rand::Rng;

/// Source of random backoff values
pub trait BackoffSource {
    /// Draw a backoff uniformly from `[0, cw]`
    fn draw(&mut self, cw: u32) -> u32;
}

/// Production source backed by any [`rand::Rng`]
#[derive(Debug)]
pub struct UniformBackoff<R: Rng>(pub R);

impl<R: Rng> BackoffSource for UniformBackoff<R> {
    fn draw(&mut self, cw: u32) -> u32 {
        self.0.gen_range(0..=cw)
    }
}

/// Test source replaying a scripted sequence
///
/// Values are clamped to the requested window so a script written for
/// one window shape stays valid for another. An exhausted script
/// yields zero.
#[derive(Debug, Default)]
pub struct ScriptedBackoff(pub VecDeque<u32>);

impl ScriptedBackoff {
    /// Build a script from a value list
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self(values.into_iter().collect())
    }
}

impl BackoffSource for ScriptedBackoff {
    fn draw(&mut self, cw: u32) -> u32 {
        self.0.pop_front().unwrap_or(0).min(cw)
    }
}
