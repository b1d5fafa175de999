//! Availability resolution
//!
//! Pure precedence rules over the ACTIVE claim records of one
//! (seat, venue-local day). No store access and no mutation here: callers
//! query the records, this module only decides.
//!
//! Precedence (first match wins unless stated otherwise):
//!
//! 1. No booking, no lock → `AVAILABLE`
//! 2. Own booking → `SELF_TEMP_AVAILABLE`
//! 3. Someone else's booking: usable until `arrival − grace`, afterwards
//!    `LOCKED_UNAVAILABLE` and locks are not consulted at all
//! 4. Someone else's lock → `LOCKED_UNAVAILABLE`, overriding any
//!    temp-available result from step 2–3; own lock upgrades `AVAILABLE`
//!    to `SELF_TEMP_AVAILABLE`

use shared::models::{Availability, SeatBooking, SeatLock, SeatStatus};
use tracing::warn;

/// Resolve the status of one seat/day for a requesting holder.
///
/// `now` is the evaluation instant (Unix millis); `grace_ms` is the courtesy
/// window before the reserved arrival during which the seat stays usable by
/// others.
pub fn resolve(
    bookings: &[SeatBooking],
    locks: &[SeatLock],
    holder_id: &str,
    now: i64,
    grace_ms: i64,
) -> Availability {
    let booking = pick_booking(bookings, holder_id);
    let lock = pick_lock(locks, holder_id);

    let mut result = Availability::available();

    if let Some(b) = booking {
        let vacate_at = b.arrival_time - grace_ms;
        if b.holder_id == holder_id {
            // Own booking: usable now, times returned for display only
            result = Availability {
                status: SeatStatus::SelfTempAvailable,
                arrival_time: Some(b.arrival_time),
                vacate_at: Some(vacate_at),
            };
        } else if now < vacate_at {
            result = Availability {
                status: SeatStatus::OtherTempAvailable,
                arrival_time: Some(b.arrival_time),
                vacate_at: Some(vacate_at),
            };
        } else {
            // Exclusivity window has begun — terminal for this seat/day,
            // locks are not consulted
            return Availability {
                status: SeatStatus::LockedUnavailable,
                arrival_time: Some(b.arrival_time),
                vacate_at: Some(vacate_at),
            };
        }
    }

    if let Some(l) = lock {
        if l.holder_id != holder_id {
            // A live lock is a stronger claim than a distant reservation's
            // grace window
            return Availability {
                status: SeatStatus::LockedUnavailable,
                arrival_time: None,
                vacate_at: None,
            };
        }
        if result.status == SeatStatus::Available {
            result.status = SeatStatus::SelfTempAvailable;
        }
    }

    result
}

/// Deterministic choice when the store holds more than one ACTIVE booking
/// for the key: the requesting holder's record first, else the most recent.
fn pick_booking<'a>(bookings: &'a [SeatBooking], holder_id: &str) -> Option<&'a SeatBooking> {
    if bookings.len() > 1 {
        warn!(
            count = bookings.len(),
            seat_id = bookings[0].seat_id,
            date_bucket = %bookings[0].date_bucket,
            "Multiple active bookings for one seat/day, store is inconsistent"
        );
    }
    bookings
        .iter()
        .find(|b| b.holder_id == holder_id)
        .or_else(|| bookings.iter().max_by_key(|b| b.created_at))
}

fn pick_lock<'a>(locks: &'a [SeatLock], holder_id: &str) -> Option<&'a SeatLock> {
    if locks.len() > 1 {
        warn!(
            count = locks.len(),
            seat_id = locks[0].seat_id,
            date_bucket = %locks[0].date_bucket,
            "Multiple active locks for one seat/day"
        );
    }
    locks
        .iter()
        .find(|l| l.holder_id == holder_id)
        .or_else(|| locks.iter().max_by_key(|l| l.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ClaimStatus;

    const GRACE: i64 = 2 * 60 * 60 * 1000;
    const HOUR: i64 = 60 * 60 * 1000;

    fn booking(holder: &str, arrival: i64, created: i64) -> SeatBooking {
        SeatBooking {
            id: created,
            seat_id: 1,
            holder_id: holder.to_string(),
            arrival_time: arrival,
            date_bucket: "2025-10-22".to_string(),
            status: ClaimStatus::Active,
            created_at: created,
            updated_at: created,
        }
    }

    fn lock(holder: &str, created: i64) -> SeatLock {
        SeatLock {
            id: created,
            seat_id: 1,
            holder_id: holder.to_string(),
            date_bucket: "2025-10-22".to_string(),
            status: ClaimStatus::Active,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn empty_seat_is_available() {
        let r = resolve(&[], &[], "u1", 0, GRACE);
        assert_eq!(r.status, SeatStatus::Available);
        assert_eq!(r.arrival_time, None);
        assert_eq!(r.vacate_at, None);
    }

    #[test]
    fn other_booking_outside_grace_is_temp_available_with_vacate_time() {
        let arrival = 10 * HOUR;
        let r = resolve(&[booking("a", arrival, 1)], &[], "b", arrival - 3 * HOUR, GRACE);
        assert_eq!(r.status, SeatStatus::OtherTempAvailable);
        assert_eq!(r.vacate_at, Some(arrival - GRACE));
        assert_eq!(r.arrival_time, Some(arrival));
    }

    #[test]
    fn other_booking_inside_grace_is_unavailable() {
        let arrival = 10 * HOUR;
        let r = resolve(&[booking("a", arrival, 1)], &[], "b", arrival - HOUR, GRACE);
        assert_eq!(r.status, SeatStatus::LockedUnavailable);
    }

    #[test]
    fn grace_boundary_is_exclusive() {
        // now == vacate_at is already inside the exclusivity window
        let arrival = 10 * HOUR;
        let r = resolve(&[booking("a", arrival, 1)], &[], "b", arrival - GRACE, GRACE);
        assert_eq!(r.status, SeatStatus::LockedUnavailable);
    }

    #[test]
    fn own_booking_overrides_grace_math() {
        let arrival = 10 * HOUR;
        for now in [0, arrival - 3 * HOUR, arrival - HOUR, arrival - 1] {
            let r = resolve(&[booking("a", arrival, 1)], &[], "a", now, GRACE);
            assert_eq!(r.status, SeatStatus::SelfTempAvailable, "now={now}");
        }
    }

    #[test]
    fn inside_grace_short_circuits_before_locks() {
        // Even the requester's own lock is not consulted once the
        // exclusivity window of someone else's booking has begun
        let arrival = 10 * HOUR;
        let r = resolve(
            &[booking("a", arrival, 1)],
            &[lock("b", 2)],
            "b",
            arrival - HOUR,
            GRACE,
        );
        assert_eq!(r.status, SeatStatus::LockedUnavailable);
        assert_eq!(r.arrival_time, Some(arrival));
    }

    #[test]
    fn foreign_lock_overrides_distant_booking() {
        // Booking far in the future (grace not started) + someone else's
        // lock → unavailable for a third holder
        let arrival = 100 * HOUR;
        let r = resolve(&[booking("a", arrival, 1)], &[lock("b", 2)], "c", 0, GRACE);
        assert_eq!(r.status, SeatStatus::LockedUnavailable);
    }

    #[test]
    fn foreign_lock_alone_blocks() {
        let r = resolve(&[], &[lock("a", 1)], "b", 0, GRACE);
        assert_eq!(r.status, SeatStatus::LockedUnavailable);
    }

    #[test]
    fn own_lock_upgrades_available() {
        let r = resolve(&[], &[lock("a", 1)], "a", 0, GRACE);
        assert_eq!(r.status, SeatStatus::SelfTempAvailable);
    }

    #[test]
    fn own_lock_keeps_other_temp_available_status() {
        // Own lock + someone else's distant booking: booking status stands
        let arrival = 100 * HOUR;
        let r = resolve(&[booking("a", arrival, 1)], &[lock("b", 2)], "b", 0, GRACE);
        assert_eq!(r.status, SeatStatus::OtherTempAvailable);
        assert_eq!(r.vacate_at, Some(arrival - GRACE));
    }

    #[test]
    fn duplicate_bookings_prefer_requesting_holder() {
        let arrival = 10 * HOUR;
        let r = resolve(
            &[booking("a", arrival, 5), booking("b", arrival, 1)],
            &[],
            "b",
            0,
            GRACE,
        );
        assert_eq!(r.status, SeatStatus::SelfTempAvailable);
    }

    #[test]
    fn duplicate_bookings_fall_back_to_most_recent() {
        let r = resolve(
            &[booking("a", 10 * HOUR, 1), booking("b", 100 * HOUR, 5)],
            &[],
            "c",
            9 * HOUR,
            GRACE,
        );
        // Most recent is b's distant booking → grace not started yet
        assert_eq!(r.status, SeatStatus::OtherTempAvailable);
        assert_eq!(r.arrival_time, Some(100 * HOUR));
    }
}
