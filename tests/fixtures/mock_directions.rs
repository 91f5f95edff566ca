//! Scripted directions client.

use std::collections::VecDeque;
use std::sync::Mutex;

use route_editor::{Coordinate, DirectionsClient, DirectionsError, DirectionsResponse, Polyline};

/// Meters per degree of longitude on the equator for the haversine radius used by the crate.
pub const METERS_PER_DEGREE: f64 = 6_371_008.8 * std::f64::consts::PI / 180.0;

/// A point on the equator `meters` east of the origin.
pub fn east(meters: f64) -> Coordinate {
    Coordinate::new(meters / METERS_PER_DEGREE, 0.0)
}

pub fn response(
    snapped: &[Coordinate],
    polyline: &[Coordinate],
    distance_meters: f64,
) -> DirectionsResponse {
    DirectionsResponse {
        snapped_waypoints: snapped.to_vec(),
        polyline: Polyline::new(polyline.to_vec()),
        distance_meters,
        waypoint_indices: None,
    }
}

/// Replays queued results in order and records the requests it saw.
#[derive(Default)]
pub struct MockDirections {
    script: Mutex<VecDeque<Result<DirectionsResponse, DirectionsError>>>,
    requests: Mutex<Vec<Vec<Coordinate>>>,
}

impl MockDirections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, result: Result<DirectionsResponse, DirectionsError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn requests(&self) -> Vec<Vec<Coordinate>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl DirectionsClient for MockDirections {
    fn route(&self, waypoints: &[Coordinate]) -> Result<DirectionsResponse, DirectionsError> {
        self.requests.lock().unwrap().push(waypoints.to_vec());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DirectionsError::Service("mock script exhausted".to_string())))
    }
}
