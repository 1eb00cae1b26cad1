//! Synthetic traffic generation
//!
//! Each station is paired with one traffic source producing frame
//! arrivals with exponentially distributed inter-arrival gaps (mean
//! 1/λ), sampled by inverse transform from a uniform source and scaled
//! into slot units. The sequence is finite and non-restartable;
//! running out of frames is not an error.

use std::collections::VecDeque;

use rand::Rng;

use crate::frame::Frame;
use crate::params::SlotParams;

/// A finite schedule of frame arrivals for one station
#[derive(Debug)]
pub struct TrafficSource {
    /// Absolute arrival slots, non-decreasing
    arrivals: VecDeque<u64>,
    frame_bits: u32,
    emitted: u64,
}

impl TrafficSource {
    /// Sample an arrival schedule for `rate` frames/sec over the whole
    /// simulated duration
    pub fn generate(rate: u32, params: &SlotParams, rng: &mut impl Rng) -> Self {
        let count = rate as u64 * params.sim_secs as u64;
        let slot_secs = params.slot_secs();

        let mut arrivals = VecDeque::with_capacity(count as usize);
        let mut at: u64 = 0;
        for _ in 0..count {
            let u: f64 = rng.gen_range(0.0..1.0);
            // Inverse-transform sample of Exp(rate), in seconds
            let gap_secs = -(1.0 - u).ln() / rate as f64;
            at += (gap_secs / slot_secs).round() as u64;
            arrivals.push_back(at);
        }

        Self {
            arrivals,
            frame_bits: params.frame_bits,
            emitted: 0,
        }
    }

    /// Scripted schedule of absolute arrival slots, for tests and
    /// custom workloads. Slots must be non-decreasing.
    pub fn from_schedule(arrivals: impl IntoIterator<Item = u64>, frame_bits: u32) -> Self {
        let arrivals: VecDeque<u64> = arrivals.into_iter().collect();
        debug_assert!(arrivals.iter().is_sorted());
        Self {
            arrivals,
            frame_bits,
            emitted: 0,
        }
    }

    /// A source that never produces a frame
    pub fn silent(frame_bits: u32) -> Self {
        Self::from_schedule([], frame_bits)
    }

    /// Emit at most one frame whose arrival slot has been reached.
    ///
    /// Arrivals that pile up in the same slot drain one per slot.
    pub fn poll(&mut self, slot: u64) -> Option<Frame> {
        if self.arrivals.front().is_some_and(|&at| at <= slot) {
            self.arrivals.pop_front();
            self.emitted += 1;
            Some(Frame {
                bits: self.frame_bits,
            })
        } else {
            None
        }
    }

    /// Frames handed to the station so far
    pub fn frames_emitted(&self) -> u64 {
        self.emitted
    }

    /// Frames still scheduled
    pub fn frames_pending(&self) -> usize {
        self.arrivals.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_schedule_is_monotonic() {
        let params = SlotParams::default();
        let mut rng = StdRng::seed_from_u64(11);
        let source = TrafficSource::generate(100, &params, &mut rng);
        assert_eq!(source.frames_pending(), 1000);
        assert!(source.arrivals.iter().is_sorted());
    }

    #[test]
    fn emits_one_frame_per_slot_at_most() {
        let mut source = TrafficSource::from_schedule([5, 5, 5], 120);
        assert!(source.poll(4).is_none());
        assert!(source.poll(5).is_some());
        assert!(source.poll(5).is_some());
        assert!(source.poll(6).is_some());
        assert!(source.poll(7).is_none());
        assert_eq!(source.frames_emitted(), 3);
    }

    #[test]
    fn late_polls_still_drain() {
        // A slow consumer must not wedge the schedule.
        let mut source = TrafficSource::from_schedule([1, 2], 120);
        assert!(source.poll(10).is_some());
        assert!(source.poll(11).is_some());
        assert!(source.poll(12).is_none());
    }

    #[test]
    fn exhaustion_is_silent() {
        let mut source = TrafficSource::silent(120);
        assert!(source.poll(0).is_none());
        assert_eq!(source.frames_emitted(), 0);
    }

    #[test]
    fn mean_gap_tracks_rate() {
        let params = SlotParams::default();
        let mut rng = StdRng::seed_from_u64(3);
        let source = TrafficSource::generate(1000, &params, &mut rng);
        let last = *source.arrivals.back().unwrap();
        let mean_gap = last as f64 / source.frames_pending() as f64;
        // Expected mean gap: 1/1000 s = 100 slots. Allow sampling slack.
        assert!((60.0..140.0).contains(&mean_gap), "mean gap {mean_gap}");
    }
}
