//! Frames queued for transmission

use serde::{Deserialize, Serialize};

use crate::params::SlotParams;

/// A frame waiting in a station's buffer
///
/// The payload is opaque; only its size matters, since the channel
/// occupancy of a transmission is derived from size over bandwidth.
/// A frame leaves the buffer only on a confirmed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Payload size in bits
    pub bits: u32,
}

impl Frame {
    /// Slots the payload alone occupies the channel
    pub fn airtime_slots(&self, params: &SlotParams) -> u32 {
        self.bits.div_ceil(params.bits_per_slot())
    }

    /// Slots the full exchange reserves the channel for: payload,
    /// then SIFS, then the acknowledgment
    pub fn occupancy_slots(&self, params: &SlotParams) -> u32 {
        self.airtime_slots(params) + params.sifs_slots + params.ack_slots
    }
}
