//! FoodFest End-to-End Testing Framework
//!
//! Drives the service worker and the page controllers together against an
//! in-memory cache store and a scripted network.

pub mod fixtures;
pub mod harness;

pub use fixtures::{RecordingNetwork, SiteFixtures};
pub use harness::OfflineSite;
