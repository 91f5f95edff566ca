//! Haversine distances and a straight-line directions fallback.
//!
//! Great-circle distance ignores the road network, so the fallback client is
//! less accurate than OSRM but always available.

use crate::error::DirectionsError;
use crate::polyline::{Coordinate, Polyline};
use crate::traits::{DirectionsClient, DirectionsResponse};

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates in meters.
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Directions client that connects waypoints with straight lines.
///
/// Waypoints are returned unsnapped and the reported distance is exactly the
/// geometric length of the returned polyline.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineDirections;

impl DirectionsClient for StraightLineDirections {
    fn route(&self, waypoints: &[Coordinate]) -> Result<DirectionsResponse, DirectionsError> {
        if waypoints.is_empty() {
            return Err(DirectionsError::Service("no waypoints to route".to_string()));
        }

        let polyline = Polyline::new(waypoints.to_vec());
        let distance_meters = polyline.length_meters();

        Ok(DirectionsResponse {
            snapped_waypoints: waypoints.to_vec(),
            polyline,
            distance_meters,
            waypoint_indices: Some((0..waypoints.len()).collect()),
        })
    }
}
