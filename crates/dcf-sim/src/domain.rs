//! Shared-medium state for one collision domain
//!
//! A domain is the only channel through which participants observe each
//! other. Its counters are transient: they are written during a slot's
//! evaluation pass, read by every later participant of the same pass,
//! and zeroed by the driver at the slot boundary. Reading them across
//! slot boundaries is meaningless.

use std::cell::RefCell;
use std::rc::Rc;

use crate::station::StationId;

/// Who asserted a signal into a domain during the current slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    /// A station starting a frame transmission
    Station(StationId),
    /// The access point transmitting a clear-to-send
    AccessPoint,
}

impl SignalSource {
    fn bit(self) -> u8 {
        match self {
            SignalSource::Station(StationId::A) => 0b001,
            SignalSource::Station(StationId::B) => 0b010,
            SignalSource::AccessPoint => 0b100,
        }
    }
}

/// Per-slot state of one shared medium
#[derive(Debug, Default)]
pub struct CollisionDomain {
    /// Signals asserted into this domain during the current slot.
    /// A transmit start asserts into both the sender's own domain and
    /// the access point's; when those alias the same object a single
    /// start reads as 2, which is what peers key their busy/collision
    /// checks off.
    pub transmissions: u32,
    /// Remaining busy duration signalled into the domain, in slots
    pub nav: u32,
    /// Station currently holding virtual-carrier-sensing clearance.
    /// Unlike the counters above, this survives the end-of-slot reset.
    pub cleared: Option<StationId>,
    /// Distinct writers this slot, for the access point's aggregate
    /// collision check
    writers: u8,
}

impl CollisionDomain {
    /// Record one signal from `source` for the current slot
    pub fn mark(&mut self, source: SignalSource, nav: u32) {
        self.transmissions += 1;
        self.nav = nav;
        self.writers |= source.bit();
    }

    /// Number of distinct participants that signalled this slot
    pub fn distinct_writers(&self) -> u32 {
        self.writers.count_ones()
    }

    /// Drop the frame's reservation after a confirmed delivery
    pub fn clear_reservation(&mut self) {
        self.transmissions = 0;
        self.nav = 0;
        self.writers = 0;
    }

    /// End-of-slot reset of the transient counters; clearance persists
    pub fn reset(&mut self) {
        self.transmissions = 0;
        self.nav = 0;
        self.writers = 0;
    }
}

/// Shared handle to a collision domain
///
/// Stations and the access point hold handles, not copies, so a write
/// is visible to every holder within the same slot's evaluation pass.
pub type DomainHandle = Rc<RefCell<CollisionDomain>>;

/// Create a fresh, idle domain
pub fn new_domain() -> DomainHandle {
    Rc::new(RefCell::new(CollisionDomain::default()))
}
