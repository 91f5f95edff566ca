//! Test fixtures for route-editor.
//!
//! Provides:
//! - A scripted `DirectionsClient` that records every request
//! - Real Monaco locations (from OpenStreetMap) for OSRM runs
//! - OSRM dataset preparation for the container-backed tests

#![allow(dead_code)]

pub mod mock_directions;
pub mod monaco_locations;
pub mod osrm_dataset;

pub use mock_directions::*;
