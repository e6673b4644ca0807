//! services/app/src/lib.rs
//!
//! The PawTrack client: backend and device adapters plus the view-models
//! that drive the report, sighting, feed and match screens.

pub mod adapters;
pub mod config;
pub mod error;
pub mod viewmodels;
