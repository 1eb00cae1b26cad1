//! Access point
//!
//! The access point is the sole authority for acknowledgments and,
//! under virtual carrier sensing, for the clear-to-send grant. It
//! observes the medium from its own vantage point: under hidden
//! terminals its domain aggregates signals from both stations even
//! though neither station can sense the other.

use tracing::{debug, trace};

use crate::domain::{DomainHandle, SignalSource};
use crate::params::SlotParams;
use crate::station::Station;

/// Result of one acknowledgment-check slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// The domain carried more than one signal this slot; the exchange
    /// made no progress
    Collision,
    /// SIFS or ACK countdown advanced
    Pending,
    /// The frame was delivered and confirmed
    Delivered,
}

/// The shared access point both stations transmit toward
pub struct AccessPoint {
    domain: DomainHandle,
    params: SlotParams,
    virtual_cs: bool,
    /// SIFS slots left before the acknowledgment starts
    pub sifs: u32,
    /// Acknowledgment slots left
    pub ack: u32,
    /// Clear-to-send quota for the current contention round
    pub cts: u32,
    /// Aggregate collisions observed from this vantage point
    pub total_collisions: u64,
}

impl AccessPoint {
    /// Create an access point sensing `domain`
    pub fn new(domain: DomainHandle, params: SlotParams, virtual_cs: bool) -> Self {
        Self {
            domain,
            params,
            virtual_cs,
            sifs: 0,
            ack: 0,
            cts: params.cts_slots,
            total_collisions: 0,
        }
    }

    /// Handle to the domain this access point senses
    pub fn domain(&self) -> DomainHandle {
        self.domain.clone()
    }

    /// Arm the SIFS and ACK countdowns for a completed transmission
    pub fn arm_ack(&mut self) {
        self.sifs = self.params.sifs_slots;
        self.ack = self.params.ack_slots;
    }

    /// One slot of the acknowledgment exchange for `station`
    ///
    /// Called only while the station is awaiting the acknowledgment.
    /// A domain collision stalls the countdown; otherwise SIFS runs
    /// down, then the ACK, and finally the head frame is delivered:
    /// reservations dropped, flags cleared, counters credited, and
    /// under virtual carrier sensing the clearance released and the
    /// station's RTS quota replenished.
    pub fn try_ack(&mut self, station: &mut Station) -> AckOutcome {
        if self.domain.borrow().transmissions > 1 {
            trace!(station = %station.id(), "ack stalled by collision");
            return AckOutcome::Collision;
        }

        if self.sifs > 0 {
            self.sifs -= 1;
            return AckOutcome::Pending;
        }
        if self.ack > 0 {
            self.ack -= 1;
            return AckOutcome::Pending;
        }

        self.domain.borrow_mut().clear_reservation();
        station.domain().borrow_mut().clear_reservation();

        station.sending = false;
        station.awaiting_ack = false;
        station.collisions = 0;
        if let Some(frame) = station.buffer.pop_front() {
            station.total_bits += frame.bits as u64;
            station.total_airtime_slots += frame.occupancy_slots(&self.params) as u64;
            station.total_successes += 1;
        }

        if self.virtual_cs {
            self.domain.borrow_mut().cleared = None;
            station.rts = self.params.rts_slots;
        }

        debug!(station = %station.id(), successes = station.total_successes, "frame delivered");
        AckOutcome::Delivered
    }

    /// One slot of the clear-to-send grant path for a deferring station
    ///
    /// Spends the CTS quota one slot at a time, then grants clearance
    /// if nobody holds it: the grant is recorded in the domain, the
    /// CTS asserted as a signal reserving the pending exchange plus
    /// one SIFS, and the quota reset for the next contention round.
    pub fn try_clear(&mut self, station: &Station) {
        if self.cts > 0 {
            self.cts -= 1;
            return;
        }

        let mut domain = self.domain.borrow_mut();
        if domain.cleared.is_none() {
            let reservation = station
                .buffer
                .front()
                .map(|frame| frame.occupancy_slots(&self.params))
                .unwrap_or(0)
                + self.params.sifs_slots;
            domain.mark(SignalSource::AccessPoint, reservation);
            domain.cleared = Some(station.id());
            self.cts = self.params.cts_slots;
            debug!(station = %station.id(), reservation, "clearance granted");
        }
    }

    /// End-of-slot aggregate collision check
    ///
    /// Counts slots in which more than one distinct participant
    /// signalled into this domain. Under hidden terminals this is the
    /// only observer that sees both stations' same-slot starts.
    pub fn observe_slot(&mut self) {
        if self.domain.borrow().distinct_writers() > 1 {
            self.total_collisions += 1;
            trace!(total = self.total_collisions, "aggregate collision observed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::ScriptedBackoff;
    use crate::domain::new_domain;
    use crate::frame::Frame;
    use crate::station::StationId;

    fn vcs_setup() -> (Station, Station, AccessPoint) {
        let params = SlotParams::default();
        let domain = new_domain();
        let a = Station::new(
            StationId::A,
            domain.clone(),
            domain.clone(),
            params,
            true,
            Box::new(ScriptedBackoff::default()),
        );
        let b = Station::new(
            StationId::B,
            domain.clone(),
            domain.clone(),
            params,
            true,
            Box::new(ScriptedBackoff::default()),
        );
        let ap = AccessPoint::new(domain, params, true);
        (a, b, ap)
    }

    fn awaiting_station(domain: DomainHandle, params: SlotParams) -> Station {
        let mut station = Station::new(
            StationId::A,
            domain.clone(),
            domain,
            params,
            false,
            Box::new(ScriptedBackoff::default()),
        );
        station.buffer.push_back(Frame { bits: 12_000 });
        station.sending = true;
        station.awaiting_ack = true;
        station
    }

    #[test]
    fn ack_counts_down_then_delivers() {
        let params = SlotParams::default();
        let domain = new_domain();
        let mut ap = AccessPoint::new(domain.clone(), params, false);
        let mut station = awaiting_station(domain, params);
        ap.arm_ack();

        // SIFS twice, ACK three times, then delivery.
        for _ in 0..5 {
            assert_eq!(ap.try_ack(&mut station), AckOutcome::Pending);
        }
        assert_eq!(ap.try_ack(&mut station), AckOutcome::Delivered);
        assert!(station.buffer.is_empty());
        assert!(!station.sending);
        assert!(!station.awaiting_ack);
        assert_eq!(station.collisions, 0);
        assert_eq!(station.total_successes, 1);
        assert_eq!(station.total_bits, 12_000);
        assert_eq!(station.total_airtime_slots, 105);
    }

    #[test]
    fn collision_stalls_the_countdown() {
        let params = SlotParams::default();
        let domain = new_domain();
        let mut ap = AccessPoint::new(domain.clone(), params, false);
        let mut station = awaiting_station(domain.clone(), params);
        ap.arm_ack();

        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::A), 105);
        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::B), 105);
        assert_eq!(ap.try_ack(&mut station), AckOutcome::Collision);
        assert_eq!(ap.sifs, params.sifs_slots, "no SIFS progress");
        assert_eq!(station.buffer.len(), 1);
    }

    #[test]
    fn clearance_is_exclusive() {
        let (mut a, mut b, mut ap) = vcs_setup();
        a.buffer.push_back(Frame { bits: 12_000 });
        b.buffer.push_back(Frame { bits: 12_000 });
        ap.cts = 0;

        ap.try_clear(&a);
        assert!(a.has_clearance());
        assert_eq!(ap.cts, SlotParams::default().cts_slots, "quota reset on grant");

        // The second contender keeps deferring while the grant stands.
        ap.cts = 0;
        ap.try_clear(&b);
        assert!(!b.has_clearance());
        assert!(a.has_clearance());
    }

    #[test]
    fn delivery_releases_clearance_and_replenishes_rts() {
        let (mut a, _b, mut ap) = vcs_setup();
        a.buffer.push_back(Frame { bits: 12_000 });
        ap.cts = 0;
        ap.try_clear(&a);
        assert!(a.has_clearance());

        a.rts = 0;
        a.sending = true;
        a.awaiting_ack = true;
        ap.sifs = 0;
        ap.ack = 0;
        assert_eq!(ap.try_ack(&mut a), AckOutcome::Delivered);
        assert!(!a.has_clearance());
        assert_eq!(a.rts, SlotParams::default().rts_slots);
    }

    #[test]
    fn observe_counts_distinct_writers_only() {
        let params = SlotParams::default();
        let domain = new_domain();
        let mut ap = AccessPoint::new(domain.clone(), params, false);

        // One station double-asserting (shared-topology alias) is not
        // an aggregate collision.
        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::A), 105);
        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::A), 105);
        ap.observe_slot();
        assert_eq!(ap.total_collisions, 0);

        domain.borrow_mut().reset();
        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::A), 105);
        domain
            .borrow_mut()
            .mark(SignalSource::Station(StationId::B), 105);
        ap.observe_slot();
        assert_eq!(ap.total_collisions, 1);
    }
}
