#![warn(clippy::all, missing_docs)]

//! Core domain logic for the innkeep hotel reservation system.
//!
//! This crate hosts the data records, configuration handling,
//! the flat-file persistence gateway, and the reservation manager
//! used by the terminal UI and any future frontends.

pub mod config;
pub mod manager;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use manager::{ReservationError, ReservationManager};
pub use models::{Booking, Room};
pub use store::JsonStore;
