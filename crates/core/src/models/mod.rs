//! Shared domain records.
//!
//! Field names are serde-renamed to match the legacy JSON files, so a
//! store written by the original tool loads unchanged.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A rentable unit of the hotel's inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room number, unique within the inventory.
    pub number: u32,
    /// Short descriptive label (e.g. `Single`, `Suite`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Nightly price; non-negative.
    pub price: f64,
    /// Cached "has any booking" flag, kept in step with the booking
    /// collection by the reservation manager. Not date-aware.
    #[serde(rename = "isBooked", default)]
    pub is_booked: bool,
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Room {}: {} at {:.2}/night{}",
            self.number,
            self.kind,
            self.price,
            if self.is_booked { " (booked)" } else { "" }
        )
    }
}

/// A reservation of one room over the half-open range
/// `[check_in, check_out)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique, monotonically assigned identifier.
    #[serde(rename = "bookingId")]
    pub booking_id: u64,
    /// Guest the room is held for; may be empty.
    #[serde(rename = "guestName", default)]
    pub guest_name: String,
    /// Number of the reserved room.
    #[serde(rename = "roomNumber")]
    pub room_number: u32,
    /// First night of the stay. Serialized as `yyyy-MM-dd`.
    #[serde(rename = "checkInDate")]
    pub check_in: NaiveDate,
    /// Departure day, exclusive. Serialized as `yyyy-MM-dd`.
    #[serde(rename = "checkOutDate")]
    pub check_out: NaiveDate,
}

impl Booking {
    /// True when the given half-open range overlaps this booking's stay.
    ///
    /// Covers every overlap shape, including a range that fully contains
    /// the existing stay.
    pub fn conflicts_with(&self, check_in: NaiveDate, check_out: NaiveDate) -> bool {
        check_in < self.check_out && check_out > self.check_in
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Booking {}: {} in room {}, {} to {}",
            self.booking_id, self.guest_name, self.room_number, self.check_in, self.check_out
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid test date")
    }

    fn booking(check_in: &str, check_out: &str) -> Booking {
        Booking {
            booking_id: 1,
            guest_name: "Alice".to_string(),
            room_number: 101,
            check_in: date(check_in),
            check_out: date(check_out),
        }
    }

    #[test]
    fn ranges_sharing_a_boundary_do_not_conflict() {
        let existing = booking("2024-01-10", "2024-01-12");
        assert!(!existing.conflicts_with(date("2024-01-12"), date("2024-01-14")));
        assert!(!existing.conflicts_with(date("2024-01-08"), date("2024-01-10")));
    }

    #[test]
    fn overlapping_and_containing_ranges_conflict() {
        let existing = booking("2024-01-10", "2024-01-12");
        assert!(existing.conflicts_with(date("2024-01-11"), date("2024-01-13")));
        assert!(existing.conflicts_with(date("2024-01-09"), date("2024-01-11")));
        // Full containment in either direction.
        assert!(existing.conflicts_with(date("2024-01-09"), date("2024-01-13")));
        assert!(existing.conflicts_with(date("2024-01-10"), date("2024-01-11")));
    }

    #[test]
    fn legacy_field_names_round_trip() {
        let json = r#"{
            "bookingId": 7,
            "guestName": "Bob",
            "roomNumber": 204,
            "checkInDate": "2024-03-01",
            "checkOutDate": "2024-03-04"
        }"#;
        let parsed: Booking = serde_json::from_str(json).expect("legacy booking parses");
        assert_eq!(parsed.booking_id, 7);
        assert_eq!(parsed.check_in, date("2024-03-01"));

        let serialized = serde_json::to_string(&parsed).expect("booking serializes");
        assert!(serialized.contains("\"checkOutDate\":\"2024-03-04\""));
    }

    #[test]
    fn room_type_field_keeps_legacy_name() {
        let room = Room {
            number: 101,
            kind: "Single".to_string(),
            price: 100.0,
            is_booked: false,
        };
        let serialized = serde_json::to_string(&room).expect("room serializes");
        assert!(serialized.contains("\"type\":\"Single\""));
        assert!(serialized.contains("\"isBooked\":false"));
    }
}
