//! Simulation driver
//!
//! Owns the whole topology and advances every actor by exactly one
//! slot per iteration. The per-slot order is fixed: buffer newly
//! arrived frames, step station A then station B, let the access point
//! observe the slot, then zero every domain's transient counters.
//! Writes a station makes during its turn are visible to every later
//! participant of the same slot, which is what collision detection
//! relies on.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::access_point::AccessPoint;
use crate::backoff::UniformBackoff;
use crate::config::SimConfig;
use crate::domain::{new_domain, DomainHandle};
use crate::error::SimError;
use crate::station::{Station, StationId};
use crate::stats::{fairness_ratio, throughput_bps, RunStats, StationStats};
use crate::traffic::TrafficSource;

/// One fully wired simulation run
pub struct Simulation {
    config: SimConfig,
    traffic: [TrafficSource; 2],
    stations: [Station; 2],
    ap: AccessPoint,
    /// Every domain in the topology; aliases appear once
    domains: Vec<DomainHandle>,
    slot: u64,
}

impl Simulation {
    /// Build a run with generated traffic for both stations
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        let params = config.params;
        let mut traffic_rng_a = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let mut traffic_rng_b = StdRng::seed_from_u64(config.seed.wrapping_add(2));
        let traffic = [
            TrafficSource::generate(config.arrival_rate, &params, &mut traffic_rng_a),
            TrafficSource::generate(config.arrival_rate, &params, &mut traffic_rng_b),
        ];
        Self::with_traffic(config, traffic)
    }

    /// Build a run with caller-supplied traffic sources
    pub fn with_traffic(
        config: SimConfig,
        traffic: [TrafficSource; 2],
    ) -> Result<Self, SimError> {
        config.validate()?;
        let params = config.params;
        let vcs = config.virtual_carrier_sensing;

        // One shared medium, or split collision domains when the
        // stations are hidden from each other. Either way the access
        // point's domain is the one transmissions funnel into.
        let (domain_a, domain_b, domain_ap, domains) = if config.hidden_terminals {
            let a = new_domain();
            let b = new_domain();
            let ap = new_domain();
            (a.clone(), b.clone(), ap.clone(), vec![a, b, ap])
        } else {
            let shared = new_domain();
            (
                shared.clone(),
                shared.clone(),
                shared.clone(),
                vec![shared],
            )
        };

        let backoff_a = UniformBackoff(StdRng::seed_from_u64(config.seed.wrapping_add(3)));
        let backoff_b = UniformBackoff(StdRng::seed_from_u64(config.seed.wrapping_add(4)));

        let stations = [
            Station::new(
                StationId::A,
                domain_a,
                domain_ap.clone(),
                params,
                vcs,
                Box::new(backoff_a),
            ),
            Station::new(
                StationId::B,
                domain_b,
                domain_ap.clone(),
                params,
                vcs,
                Box::new(backoff_b),
            ),
        ];
        let ap = AccessPoint::new(domain_ap, params, vcs);

        Ok(Self {
            config,
            traffic,
            stations,
            ap,
            domains,
            slot: 0,
        })
    }

    /// The run's configuration
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Slots advanced so far
    pub fn current_slot(&self) -> u64 {
        self.slot
    }

    /// A station's state
    pub fn station(&self, id: StationId) -> &Station {
        &self.stations[id.index()]
    }

    /// Mutable access to a station, for seeding test scenarios
    pub fn station_mut(&mut self, id: StationId) -> &mut Station {
        &mut self.stations[id.index()]
    }

    /// The access point's state
    pub fn access_point(&self) -> &AccessPoint {
        &self.ap
    }

    /// Frames offered to a station by its traffic source so far
    pub fn frames_offered(&self, id: StationId) -> u64 {
        self.traffic[id.index()].frames_emitted()
    }

    /// Advance every actor by one slot
    pub fn step(&mut self) {
        self.slot += 1;

        for (source, station) in self.traffic.iter_mut().zip(self.stations.iter_mut()) {
            if let Some(frame) = source.poll(self.slot) {
                station.buffer.push_back(frame);
            }
        }

        for station in self.stations.iter_mut() {
            station.step(&mut self.ap);
        }

        self.ap.observe_slot();

        for domain in &self.domains {
            domain.borrow_mut().reset();
        }
    }

    /// Drive the full slot budget and produce the run's statistics
    pub fn run(mut self) -> RunStats {
        let total = self.config.params.total_slots();
        info!(
            rate = self.config.arrival_rate,
            topology = %self.config.topology_label(),
            total_slots = total,
            "run starting"
        );
        while self.slot < total {
            self.step();
        }
        self.into_stats()
    }

    /// Fold the cumulative counters into per-station records
    pub fn into_stats(self) -> RunStats {
        let slot_secs = self.config.params.slot_secs();
        let attempts = [self.stations[0].attempts(), self.stations[1].attempts()];

        let stations = self
            .stations
            .iter()
            .enumerate()
            .map(|(i, station)| StationStats {
                station: station.id(),
                arrival_rate: self.config.arrival_rate,
                topology: self.config.topology_label(),
                throughput_bps: throughput_bps(
                    station.total_bits,
                    station.total_airtime_slots,
                    slot_secs,
                ),
                ap_collisions: self.ap.total_collisions,
                collisions: station.total_collisions,
                fairness: fairness_ratio(attempts[i], attempts[1 - i]),
                successes: station.total_successes,
                frames_offered: self.traffic[i].frames_emitted(),
            })
            .collect();

        debug!("run finished");
        RunStats { stations }
    }
}

impl StationId {
    /// Index into driver-side per-station arrays
    pub fn index(self) -> usize {
        match self {
            StationId::A => 0,
            StationId::B => 1,
        }
    }
}
