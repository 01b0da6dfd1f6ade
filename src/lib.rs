//! Sling shift to Google Calendar sync engine.
//!
//! Walks the chain of upcoming shifts exposed by the Sling API, maps
//! position ids to display labels, and reconciles each shift against the
//! calendar so repeated runs never create duplicate events.

pub mod calendar_client;
pub mod config;
pub mod notifier;
pub mod positions;
pub mod service;
pub mod sling_client;
pub mod sync;
