//! Per-run statistics
//!
//! One record per station per run, in the shape the external
//! reporting/plotting collaborator consumes.

use serde::{Deserialize, Serialize};

use crate::station::StationId;

/// Outcome record for one station over one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationStats {
    /// Which station
    pub station: StationId,
    /// Configured arrival rate, frames/sec
    pub arrival_rate: u32,
    /// Topology label, e.g. `ht_t_vcs_f`
    pub topology: String,
    /// Delivered bits over cumulative channel occupancy
    pub throughput_bps: f64,
    /// Collisions observed from the access point's vantage point
    pub ap_collisions: u64,
    /// Collisions observed by the station itself
    pub collisions: u64,
    /// This station's attempts over the peer's
    pub fairness: f64,
    /// Confirmed deliveries
    pub successes: u64,
    /// Frames the traffic source handed to the station
    pub frames_offered: u64,
}

/// Both stations' records for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Station A first, station B second
    pub stations: Vec<StationStats>,
}

/// Delivered bits over occupied airtime, in bits per second
///
/// A station that never transmitted is a valid outcome, so a zero
/// denominator yields 0.0 rather than a division error.
pub fn throughput_bps(bits: u64, airtime_slots: u64, slot_secs: f64) -> f64 {
    if airtime_slots == 0 {
        return 0.0;
    }
    bits as f64 / (airtime_slots as f64 * slot_secs)
}

/// Ratio of this station's attempts to the peer's, 0.0 when the peer
/// never attempted
pub fn fairness_ratio(own_attempts: u64, peer_attempts: u64) -> f64 {
    if peer_attempts == 0 {
        return 0.0;
    }
    own_attempts as f64 / peer_attempts as f64
}
