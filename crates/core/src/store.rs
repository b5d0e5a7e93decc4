//! Flat-file JSON persistence gateway.
//!
//! Rooms and bookings live in two pretty-printed JSON arrays. A missing
//! or unreadable file degrades to an empty collection so a fresh install
//! starts cleanly; save failures surface to the caller but never panic.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use tracing::warn;

use crate::models::{Booking, Room};

/// Load/save boundary between in-memory state and the two JSON files.
///
/// Stateless aside from the configured paths.
pub struct JsonStore {
    rooms_path: PathBuf,
    bookings_path: PathBuf,
}

impl JsonStore {
    /// Create a store backed by the given room and booking files.
    pub fn new(rooms_path: impl Into<PathBuf>, bookings_path: impl Into<PathBuf>) -> Self {
        Self {
            rooms_path: rooms_path.into(),
            bookings_path: bookings_path.into(),
        }
    }

    /// Path of the rooms file.
    pub fn rooms_path(&self) -> &Path {
        &self.rooms_path
    }

    /// Path of the bookings file.
    pub fn bookings_path(&self) -> &Path {
        &self.bookings_path
    }

    /// Read both collections from disk.
    ///
    /// Never fails: a missing file means an empty collection, and a
    /// corrupt one is logged and treated the same way.
    pub fn load(&self) -> (Vec<Room>, Vec<Booking>) {
        (
            read_collection(&self.rooms_path, "rooms"),
            read_collection(&self.bookings_path, "bookings"),
        )
    }

    /// Write both collections back to their configured paths.
    ///
    /// Each file is written to a temporary sibling and renamed into
    /// place, so a crash mid-write cannot truncate the store.
    pub fn save(&self, rooms: &[Room], bookings: &[Booking]) -> Result<()> {
        write_collection(&self.rooms_path, rooms)?;
        write_collection(&self.bookings_path, bookings)
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path, label: &str) -> Vec<T> {
    if !path.exists() {
        warn!(
            "{label} file {} not found; starting with an empty collection",
            path.display()
        );
        return Vec::new();
    }

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!("failed to read {}: {err}; treating as empty", path.display());
            return Vec::new();
        }
    };

    match serde_json::from_str(&contents) {
        Ok(items) => items,
        Err(err) => {
            warn!("failed to parse {}: {err}; treating as empty", path.display());
            Vec::new()
        }
    }
}

fn write_collection<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let serialized = serde_json::to_vec_pretty(items).context("failed to serialize collection")?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, serialized)
        .with_context(|| format!("failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("failed to replace {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid test date")
    }

    fn sample_state() -> (Vec<Room>, Vec<Booking>) {
        let rooms = vec![
            Room {
                number: 101,
                kind: "Single".to_string(),
                price: 100.0,
                is_booked: true,
            },
            Room {
                number: 102,
                kind: "Double".to_string(),
                price: 150.0,
                is_booked: false,
            },
        ];
        let bookings = vec![Booking {
            booking_id: 1,
            guest_name: "Alice".to_string(),
            room_number: 101,
            check_in: date("2024-01-10"),
            check_out: date("2024-01-12"),
        }];
        (rooms, bookings)
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().join("rooms.json"), dir.path().join("bookings.json"));
        let (rooms, bookings) = sample_state();

        store.save(&rooms, &bookings)?;
        let (loaded_rooms, loaded_bookings) = store.load();

        assert_eq!(loaded_rooms, rooms);
        assert_eq!(loaded_bookings, bookings);
        Ok(())
    }

    #[test]
    fn missing_files_load_as_empty() {
        let dir = tempdir().expect("tempdir");
        let store = JsonStore::new(dir.path().join("rooms.json"), dir.path().join("bookings.json"));

        let (rooms, bookings) = store.load();
        assert!(rooms.is_empty());
        assert!(bookings.is_empty());
    }

    #[test]
    fn corrupt_file_degrades_to_empty() -> Result<()> {
        let dir = tempdir()?;
        let rooms_path = dir.path().join("rooms.json");
        fs::write(&rooms_path, "{ not json")?;
        let store = JsonStore::new(&rooms_path, dir.path().join("bookings.json"));

        let (rooms, bookings) = store.load();
        assert!(rooms.is_empty());
        assert!(bookings.is_empty());
        Ok(())
    }

    #[test]
    fn dates_are_written_as_plain_days() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(dir.path().join("rooms.json"), dir.path().join("bookings.json"));
        let (rooms, bookings) = sample_state();

        store.save(&rooms, &bookings)?;
        let raw = fs::read_to_string(store.bookings_path())?;
        assert!(raw.contains("\"checkInDate\": \"2024-01-10\""));
        assert!(raw.contains("\"checkOutDate\": \"2024-01-12\""));
        // Pretty-printed, not a single line.
        assert!(raw.lines().count() > 1);
        Ok(())
    }

    #[test]
    fn save_creates_missing_parent_directories() -> Result<()> {
        let dir = tempdir()?;
        let store = JsonStore::new(
            dir.path().join("data/rooms.json"),
            dir.path().join("data/bookings.json"),
        );

        store.save(&[], &[])?;
        assert!(store.rooms_path().exists());
        assert!(store.bookings_path().exists());
        Ok(())
    }

    #[test]
    fn save_into_unwritable_location_reports_an_error() -> Result<()> {
        let dir = tempdir()?;
        // A file where a directory is expected makes create_dir_all fail.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "")?;
        let store = JsonStore::new(blocker.join("rooms.json"), blocker.join("bookings.json"));

        assert!(store.save(&[], &[]).is_err());
        Ok(())
    }
}
