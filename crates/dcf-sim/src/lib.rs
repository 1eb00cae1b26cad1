//! IEEE 802.11 DCF Simulation Library
//!
//! This crate simulates the Distributed Coordination Function, the
//! CSMA/CA contention-resolution protocol, at discrete slot
//! granularity. Two stations share (or, with hidden terminals,
//! partially share) a medium, contend for access with binary
//! exponential backoff, optionally reserve the channel with RTS/CTS,
//! and receive acknowledgments from an access point. It includes:
//!
//! - **Station**: the per-slot contention state machine
//! - **AccessPoint**: acknowledgment and clear-to-send authority
//! - **CollisionDomain**: transient shared-medium state
//! - **TrafficSource**: exponential frame arrivals
//! - **Simulation**: the lockstep slot driver and statistics readout
//!
//! # Example
//!
//! ```rust
//! use dcf_sim::{SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     arrival_rate: 300,
//!     hidden_terminals: true,
//!     virtual_carrier_sensing: false,
//!     seed: 7,
//!     ..Default::default()
//! };
//!
//! let stats = Simulation::new(config).unwrap().run();
//! for record in &stats.stations {
//!     println!(
//!         "station {:?}: {} delivered, {} collisions",
//!         record.station, record.successes, record.collisions
//!     );
//! }
//! ```
//!
//! Everything is single-threaded and lockstep: all actors advance once
//! per slot, and a run with the same seed reproduces the same
//! statistics exactly. Distinct runs are independent and can be
//! parallelised by the caller.

pub mod access_point;
pub mod backoff;
pub mod config;
pub mod domain;
pub mod driver;
pub mod error;
pub mod frame;
pub mod params;
pub mod station;
pub mod stats;
pub mod traffic;

pub use access_point::{AccessPoint, AckOutcome};
pub use backoff::{BackoffSource, ScriptedBackoff, UniformBackoff};
pub use config::{SimConfig, ARRIVAL_RATES};
pub use domain::{new_domain, CollisionDomain, DomainHandle, SignalSource};
pub use driver::Simulation;
pub use error::SimError;
pub use frame::Frame;
pub use params::SlotParams;
pub use station::{SlotAction, Station, StationId};
pub use stats::{RunStats, StationStats};
pub use traffic::TrafficSource;
