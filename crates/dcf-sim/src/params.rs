//! Protocol timing parameters
//!
//! All durations are expressed in slots, the simulation's unit of time
//! advancement. The defaults reproduce the reference scenario: 10 µs
//! slots on a 12 bit/µs channel carrying 1500-byte frames.

use serde::{Deserialize, Serialize};

/// Timing and sizing parameters for one simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotParams {
    /// Slot duration in microseconds
    pub slot_us: u32,
    /// Channel bandwidth in bits per microsecond
    pub bandwidth_bits_per_us: u32,
    /// Frame payload size in bits
    pub frame_bits: u32,
    /// Base contention window
    pub cw_base: u32,
    /// Contention window ceiling
    pub cw_max: u32,
    /// Distributed interframe space, in slots
    pub difs_slots: u32,
    /// Short interframe space, in slots
    pub sifs_slots: u32,
    /// Acknowledgment duration, in slots
    pub ack_slots: u32,
    /// Request-to-send duration, in slots
    pub rts_slots: u32,
    /// Clear-to-send duration, in slots
    pub cts_slots: u32,
    /// Simulated duration in seconds
    pub sim_secs: u32,
}

impl Default for SlotParams {
    fn default() -> Self {
        Self {
            slot_us: 10,
            bandwidth_bits_per_us: 12,
            frame_bits: 1500 * 8,
            cw_base: 8,
            cw_max: 1024,
            difs_slots: 4,
            sifs_slots: 2,
            ack_slots: 3,
            rts_slots: 3,
            cts_slots: 3,
            sim_secs: 10,
        }
    }
}

impl SlotParams {
    /// Bits the channel carries in one slot
    pub fn bits_per_slot(&self) -> u32 {
        self.bandwidth_bits_per_us * self.slot_us
    }

    /// Slots per simulated second
    pub fn slots_per_sec(&self) -> u64 {
        1_000_000 / self.slot_us as u64
    }

    /// Total slot budget for a run
    pub fn total_slots(&self) -> u64 {
        self.sim_secs as u64 * self.slots_per_sec()
    }

    /// Length of one slot in seconds
    pub fn slot_secs(&self) -> f64 {
        self.slot_us as f64 * 1e-6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_arithmetic() {
        let p = SlotParams::default();
        assert_eq!(p.bits_per_slot(), 120);
        assert_eq!(p.slots_per_sec(), 100_000);
        assert_eq!(p.total_slots(), 1_000_000);
        assert!((p.slot_secs() - 1e-5).abs() < 1e-12);
    }
}
