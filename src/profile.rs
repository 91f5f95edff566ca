//! Cumulative distance/elevation projection of a route.
//!
//! Read-only view consumed by elevation charts; it never mutates the route.

use serde::Serialize;

use crate::model::RouteModel;
use crate::polyline::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfilePoint {
    /// Along-path distance from the route start in meters.
    pub distance_meters: f64,
    pub coordinate: Coordinate,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ElevationProfile {
    pub points: Vec<ProfilePoint>,
}

impl ElevationProfile {
    pub fn total_distance(&self) -> f64 {
        self.points.last().map_or(0.0, |point| point.distance_meters)
    }

    /// Summed climb and descent in meters over points that carry elevation.
    pub fn gain_loss(&self) -> (f64, f64) {
        let elevations: Vec<f64> = self
            .points
            .iter()
            .filter_map(|point| point.coordinate.elevation)
            .collect();

        elevations
            .windows(2)
            .fold((0.0, 0.0), |(gain, loss), pair| {
                let delta = pair[1] - pair[0];
                if delta > 0.0 {
                    (gain + delta, loss)
                } else {
                    (gain, loss - delta)
                }
            })
    }
}

impl RouteModel {
    /// Projects the route onto cumulative distance.
    pub fn profile(&self) -> ElevationProfile {
        let path = self.full_path();
        let mut points = Vec::with_capacity(path.len());
        let mut travelled = 0.0;
        let mut previous: Option<&Coordinate> = None;

        for coordinate in path.points() {
            if let Some(prev) = previous {
                travelled += prev.distance_to(coordinate);
            }
            points.push(ProfilePoint {
                distance_meters: travelled,
                coordinate: *coordinate,
            });
            previous = Some(coordinate);
        }

        ElevationProfile { points }
    }
}
