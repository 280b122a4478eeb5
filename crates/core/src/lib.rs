//! # CareSlot Core
//!
//! Domain types and booking logic for the CareSlot appointment service: the slot
//! generator, the availability resolver, the booking service and its state
//! machine, the provider catalog and symptom triage.
//!
//! Storage, time and notifications are reached through the [`store::BookingStore`],
//! [`clock::Clock`] and [`notify::NotificationSink`] traits so each can be swapped
//! without touching the booking rules.

pub mod availability;
pub mod booking;
pub mod catalog;
pub mod clock;
pub mod errors;
pub mod models;
pub mod notify;
pub mod slots;
pub mod store;
pub mod symptoms;
