//! The availability and booking consistency engine.
//!
//! [`ReservationManager`] is the sole owner and mutator of the room and
//! booking collections. Every public operation runs to completion on the
//! calling thread; exclusive access is enforced by `&mut self`.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    models::{Booking, Room},
    store::JsonStore,
};

/// Failures a reservation operation can report to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReservationError {
    /// The requested dates conflict with an existing booking.
    #[error("room {room_number} is not available for the requested dates")]
    RoomUnavailable {
        /// Number of the room that was requested.
        room_number: u32,
    },
    /// No booking carries the given id.
    #[error("booking {booking_id} not found")]
    BookingNotFound {
        /// Identifier the caller asked to cancel.
        booking_id: u64,
    },
    /// Check-in does not fall strictly before check-out.
    #[error("check-in {check_in} must fall before check-out {check_out}")]
    InvalidDateRange {
        /// Requested first night.
        check_in: NaiveDate,
        /// Requested departure day.
        check_out: NaiveDate,
    },
}

/// Owns the in-memory inventory and orchestrates persistence.
pub struct ReservationManager {
    store: JsonStore,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    next_booking_id: u64,
}

impl ReservationManager {
    /// Load both collections through the persistence gateway.
    ///
    /// Missing or unreadable source data yields empty collections; no
    /// error reaches the caller. The id counter resumes past the highest
    /// id on record, so cancelled bookings never free an id for reuse
    /// within the surviving history.
    pub fn load(store: JsonStore) -> Self {
        let (rooms, bookings) = store.load();
        let next_booking_id = bookings
            .iter()
            .map(|booking| booking.booking_id)
            .max()
            .unwrap_or(0)
            + 1;
        info!(
            "loaded {} rooms and {} bookings; next booking id {}",
            rooms.len(),
            bookings.len(),
            next_booking_id
        );
        Self {
            store,
            rooms,
            bookings,
            next_booking_id,
        }
    }

    /// Every room paired with whether any booking references it.
    ///
    /// The flag is not date-aware: a room shows as booked while any
    /// booking for it exists, past or future.
    pub fn list_rooms(&self) -> Vec<(&Room, bool)> {
        self.rooms
            .iter()
            .map(|room| (room, self.room_has_booking(room.number)))
            .collect()
    }

    /// True when no existing booking on the room overlaps the half-open
    /// range `[check_in, check_out)`.
    pub fn is_available(&self, room_number: u32, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        !self.bookings.iter().any(|booking| {
            booking.room_number == room_number && booking.conflicts_with(check_in, check_out)
        })
    }

    /// Book a room for a guest over `[check_in, check_out)`.
    ///
    /// On success the booking is appended, the room's cached flag is
    /// refreshed, and both collections are persisted. A persistence
    /// failure is logged but does not roll back the in-memory booking;
    /// memory and disk re-converge on the next successful save.
    pub fn reserve(
        &mut self,
        guest_name: impl Into<String>,
        room_number: u32,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Booking, ReservationError> {
        if check_in >= check_out {
            return Err(ReservationError::InvalidDateRange {
                check_in,
                check_out,
            });
        }
        if !self.is_available(room_number, check_in, check_out) {
            warn!("room {room_number} is not available for {check_in}..{check_out}");
            return Err(ReservationError::RoomUnavailable { room_number });
        }

        let booking = Booking {
            booking_id: self.next_booking_id,
            guest_name: guest_name.into(),
            room_number,
            check_in,
            check_out,
        };
        self.next_booking_id += 1;
        self.bookings.push(booking.clone());
        // Booking a room number with no matching room is a silent no-op
        // on the flag side; the booking itself still stands.
        self.refresh_room_flag(room_number);

        info!(
            "room {room_number} booked for {} ({check_in}..{check_out}), booking id {}",
            booking.guest_name, booking.booking_id
        );
        self.persist();
        Ok(booking)
    }

    /// Cancel the booking with the given id and hard-delete it.
    ///
    /// The room's cached flag is recomputed from the remaining bookings,
    /// so cancelling one of several stays leaves the room marked booked.
    pub fn cancel(&mut self, booking_id: u64) -> Result<(), ReservationError> {
        let index = self
            .bookings
            .iter()
            .position(|booking| booking.booking_id == booking_id)
            .ok_or(ReservationError::BookingNotFound { booking_id })?;

        let removed = self.bookings.remove(index);
        self.refresh_room_flag(removed.room_number);

        info!(
            "booking {booking_id} cancelled (room {}, guest {})",
            removed.room_number, removed.guest_name
        );
        self.persist();
        Ok(())
    }

    /// All bookings for one room, in collection order, no date filtering.
    pub fn bookings_for_room(&self, room_number: u32) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|booking| booking.room_number == room_number)
            .collect()
    }

    /// Full booking snapshot in collection order.
    pub fn all_bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Current room inventory.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    fn room_has_booking(&self, room_number: u32) -> bool {
        self.bookings
            .iter()
            .any(|booking| booking.room_number == room_number)
    }

    fn refresh_room_flag(&mut self, room_number: u32) {
        let booked = self.room_has_booking(room_number);
        if let Some(room) = self.rooms.iter_mut().find(|room| room.number == room_number) {
            room.is_booked = booked;
        }
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.rooms, &self.bookings) {
            // Reported, non-fatal: the in-memory state stays ahead of
            // disk until the next save succeeds.
            error!("failed to persist reservation state: {err:#}");
        }
    }
}
