//! Error types for simulation setup

use thiserror::Error;

use crate::config::ARRIVAL_RATES;

/// Errors that can occur while configuring a run
///
/// The slot loop itself is infallible; everything that can go wrong is
/// rejected before the first slot.
#[derive(Debug, Error)]
pub enum SimError {
    /// Arrival rate outside the supported set
    #[error("unsupported arrival rate: {0} frames/sec (expected one of {ARRIVAL_RATES:?})")]
    UnsupportedRate(u32),

    /// Simulated duration of zero slots
    #[error("simulation duration must cover at least one slot")]
    ZeroDuration,

    /// Degenerate timing or sizing parameter
    #[error("invalid parameters: {0}")]
    InvalidParams(&'static str),
}
