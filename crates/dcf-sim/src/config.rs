//! Run configuration

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::params::SlotParams;

/// Arrival rates the reference scenario sweeps, in frames per second
pub const ARRIVAL_RATES: [u32; 6] = [100, 200, 300, 500, 700, 1000];

/// Configuration for a single simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Frame arrival rate per station, frames/sec
    pub arrival_rate: u32,
    /// Split the stations into disjoint collision domains
    pub hidden_terminals: bool,
    /// Enable the RTS/CTS reservation handshake
    pub virtual_carrier_sensing: bool,
    /// Seed for all per-entity random sources
    pub seed: u64,
    /// Timing parameters
    pub params: SlotParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arrival_rate: ARRIVAL_RATES[0],
            hidden_terminals: false,
            virtual_carrier_sensing: false,
            seed: 0,
            params: SlotParams::default(),
        }
    }
}

impl SimConfig {
    /// Reject configurations the model cannot run
    pub fn validate(&self) -> Result<(), SimError> {
        if !ARRIVAL_RATES.contains(&self.arrival_rate) {
            return Err(SimError::UnsupportedRate(self.arrival_rate));
        }
        if self.params.total_slots() == 0 {
            return Err(SimError::ZeroDuration);
        }
        if self.params.bits_per_slot() == 0 {
            return Err(SimError::InvalidParams("channel carries zero bits per slot"));
        }
        if self.params.frame_bits == 0 {
            return Err(SimError::InvalidParams("frame size must be nonzero"));
        }
        Ok(())
    }

    /// Topology label used by the reporting layer, e.g. `ht_f_vcs_t`
    pub fn topology_label(&self) -> String {
        format!(
            "ht_{}_vcs_{}",
            if self.hidden_terminals { 't' } else { 'f' },
            if self.virtual_carrier_sensing { 't' } else { 'f' },
        )
    }
}
