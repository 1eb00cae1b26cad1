//! Station contention state machine
//!
//! A station owns a FIFO of pending frames and the DCF contention
//! state: DIFS and backoff countdowns, a latched NAV for freezing, the
//! contention window, and the sending/awaiting-ack flags. Exactly one
//! ladder rung fires per slot, evaluated in priority order; the rung
//! chosen is a pure function of the station's state and its domain's
//! counters at that point in the slot's evaluation pass.

use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace};

use crate::access_point::{AccessPoint, AckOutcome};
use crate::backoff::BackoffSource;
use crate::domain::{DomainHandle, SignalSource};
use crate::frame::Frame;
use crate::params::SlotParams;

/// Station identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum StationId {
    A,
    B,
}

impl StationId {
    /// The other station
    pub fn peer(self) -> StationId {
        match self {
            StationId::A => StationId::B,
            StationId::B => StationId::A,
        }
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationId::A => write!(f, "A"),
            StationId::B => write!(f, "B"),
        }
    }
}

/// The single action a station takes in one slot
///
/// Variants are listed in evaluation priority order; [`Station::classify`]
/// returns the first whose guard holds, which makes the mutual
/// exclusivity of the rungs explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotAction {
    /// More than one signal in the domain: back off exponentially
    CollisionDetected,
    /// Exactly one signal, not ours: freeze on the medium's NAV
    Freeze,
    /// DIFS quiet interval still running
    DifsCountdown,
    /// Random backoff still running
    BackoffCountdown,
    /// Transmission done, waiting on the access point's acknowledgment
    AwaitAck,
    /// Frame buffered and the medium clear: handshake or transmit
    Contend,
    /// Nothing to do
    Idle,
}

/// One contending wireless station
pub struct Station {
    id: StationId,
    /// What this station can sense
    domain: DomainHandle,
    /// What the access point senses; the same object as `domain`
    /// unless hidden terminals split the topology
    ap_domain: DomainHandle,
    params: SlotParams,
    virtual_cs: bool,
    backoff_source: Box<dyn BackoffSource>,

    /// Pending frames, arrival order = transmission order
    pub buffer: VecDeque<Frame>,
    /// DIFS slots left before contention may resume
    pub difs: u32,
    /// Random backoff slots left
    pub backoff: u32,
    /// Latched NAV while frozen on a busy medium
    pub freeze: u32,
    /// Slots left of the in-flight transmission
    pub transmission: u32,
    /// Contention window the current backoff was drawn from
    pub cw: u32,
    /// Collisions suffered by the head frame; reset on delivery
    pub collisions: u32,
    /// Request-to-send quota for the current handshake
    pub rts: u32,
    /// A transmission is in flight
    pub sending: bool,
    /// Waiting for the access point's acknowledgment
    pub awaiting_ack: bool,

    /// Delivered payload bits
    pub total_bits: u64,
    /// Channel occupancy of delivered exchanges, in slots
    pub total_airtime_slots: u64,
    /// Confirmed deliveries
    pub total_successes: u64,
    /// Collisions observed over the whole run
    pub total_collisions: u64,
}

impl Station {
    /// Wire up a station to its own and the access point's domain
    pub fn new(
        id: StationId,
        domain: DomainHandle,
        ap_domain: DomainHandle,
        params: SlotParams,
        virtual_cs: bool,
        mut backoff_source: Box<dyn BackoffSource>,
    ) -> Self {
        let cw = params.cw_base;
        let backoff = backoff_source.draw(cw);
        Self {
            id,
            domain,
            ap_domain,
            params,
            virtual_cs,
            backoff_source,
            buffer: VecDeque::new(),
            difs: params.difs_slots,
            backoff,
            freeze: 0,
            transmission: 0,
            cw,
            collisions: 0,
            rts: params.rts_slots,
            sending: false,
            awaiting_ack: false,
            total_bits: 0,
            total_airtime_slots: 0,
            total_successes: 0,
            total_collisions: 0,
        }
    }

    /// This station's identity
    pub fn id(&self) -> StationId {
        self.id
    }

    /// Whether the RTS/CTS handshake is enabled
    pub fn virtual_cs(&self) -> bool {
        self.virtual_cs
    }

    /// Handle to the domain this station senses
    pub fn domain(&self) -> DomainHandle {
        self.domain.clone()
    }

    /// Handle to the access point's domain as seen from this station
    pub fn ap_domain(&self) -> DomainHandle {
        self.ap_domain.clone()
    }

    /// Transmission attempts: deliveries plus collisions
    pub fn attempts(&self) -> u64 {
        self.total_successes + self.total_collisions
    }

    /// Whether this station currently holds the clear-to-send grant
    pub fn has_clearance(&self) -> bool {
        self.ap_domain.borrow().cleared == Some(self.id)
    }

    /// Pick the one ladder rung that fires this slot
    pub fn classify(&self) -> SlotAction {
        let transmissions = self.domain.borrow().transmissions;
        if transmissions > 1 {
            SlotAction::CollisionDetected
        } else if transmissions == 1 && !self.sending {
            SlotAction::Freeze
        } else if self.difs > 0 {
            SlotAction::DifsCountdown
        } else if self.backoff > 0 {
            SlotAction::BackoffCountdown
        } else if self.awaiting_ack {
            SlotAction::AwaitAck
        } else if !self.buffer.is_empty() {
            SlotAction::Contend
        } else {
            SlotAction::Idle
        }
    }

    /// Advance the state machine by one slot
    pub fn step(&mut self, ap: &mut AccessPoint) {
        match self.classify() {
            SlotAction::CollisionDetected => {
                trace!(station = %self.id, "domain collision, backing off");
                self.double_cw();
            }
            SlotAction::Freeze => self.freeze(),
            SlotAction::DifsCountdown => self.difs -= 1,
            SlotAction::BackoffCountdown => self.backoff -= 1,
            SlotAction::AwaitAck => {
                if ap.try_ack(self) == AckOutcome::Collision {
                    // The exchange was stepped on while we waited for
                    // the acknowledgment: treat as a timeout collision
                    // with one extra SIFS of backoff before the retry.
                    trace!(station = %self.id, "ack timeout collision");
                    self.double_cw();
                    self.backoff += self.params.sifs_slots;
                }
            }
            SlotAction::Contend => self.contend(ap),
            SlotAction::Idle => {}
        }
    }

    /// Binary exponential backoff
    ///
    /// Recomputes `cw = min(cw_base * 2^collisions, cw_max)`, draws a
    /// fresh backoff from `[0, cw]`, and aborts the in-flight exchange
    /// so the head frame is retried whole on the next opportunity.
    pub fn double_cw(&mut self) {
        self.sending = false;
        self.awaiting_ack = false;
        self.transmission = 0;
        self.collisions += 1;
        self.total_collisions += 1;
        self.cw = self
            .params
            .cw_base
            .checked_shl(self.collisions)
            .unwrap_or(self.params.cw_max)
            .min(self.params.cw_max);
        self.backoff = self.backoff_source.draw(self.cw);
        debug!(
            station = %self.id,
            collisions = self.collisions,
            cw = self.cw,
            backoff = self.backoff,
            "contention window doubled"
        );
    }

    /// Defer on a busy medium: run down the latched NAV, or latch it
    /// and re-arm DIFS so contention restarts once the medium clears
    fn freeze(&mut self) {
        if self.freeze > 0 {
            self.freeze -= 1;
        } else {
            // Under virtual carrier sensing the reservation is read
            // from the access point's domain, where the CTS landed.
            let nav = if self.virtual_cs {
                self.ap_domain.borrow().nav
            } else {
                self.domain.borrow().nav
            };
            self.freeze = nav;
            self.difs = self.params.difs_slots;
        }
    }

    /// Contend for the medium: RTS/CTS first when enabled, then data
    fn contend(&mut self, ap: &mut AccessPoint) {
        if self.virtual_cs && !self.has_clearance() {
            if self.rts > 0 {
                // One slot of request-to-send airtime per tick
                self.rts -= 1;
                return;
            }
            ap.try_clear(self);
            return;
        }
        self.transmit(ap);
    }

    /// Drive one slot of the data transmission
    fn transmit(&mut self, ap: &mut AccessPoint) {
        if !self.sending {
            let Some(frame) = self.buffer.front().copied() else {
                return;
            };
            self.sending = true;
            self.transmission = frame.occupancy_slots(&self.params);
            let nav = self.transmission;
            // Assert the signal into both domains. Under hidden
            // terminals these are distinct objects and the access
            // point's domain aggregates both stations; in the shared
            // topology the handles alias and peers read the combined
            // count as busy.
            self.domain
                .borrow_mut()
                .mark(SignalSource::Station(self.id), nav);
            self.ap_domain
                .borrow_mut()
                .mark(SignalSource::Station(self.id), nav);
            debug!(station = %self.id, occupancy = nav, "transmission started");
        }

        if self.transmission > 0 {
            self.transmission -= 1;
        } else {
            ap.arm_ack();
            self.awaiting_ack = true;
            trace!(station = %self.id, "transmission complete, awaiting ack");
        }
    }
}
