//! OSRM HTTP adapter for directions.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::error::DirectionsError;
use crate::polyline::{Coordinate, Polyline};
use crate::traits::{DirectionsClient, DirectionsResponse};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Reads `OSRM_BASE_URL`, `OSRM_PROFILE` and `OSRM_TIMEOUT_SECS`,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("OSRM_BASE_URL").unwrap_or(defaults.base_url),
            profile: lookup("OSRM_PROFILE").unwrap_or(defaults.profile),
            timeout_secs: lookup("OSRM_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    fn route_url(&self, waypoints: &[Coordinate]) -> String {
        let coords = waypoints
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=false&steps=true&geometries=geojson",
            self.base_url.trim_end_matches('/'),
            self.profile,
            coords
        )
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }
}

impl DirectionsClient for OsrmClient {
    fn route(&self, waypoints: &[Coordinate]) -> Result<DirectionsResponse, DirectionsError> {
        if waypoints.len() < 2 {
            return Err(DirectionsError::Service(
                "OSRM needs at least two coordinates".to_string(),
            ));
        }

        let url = self.config.route_url(waypoints);
        tracing::debug!(%url, waypoints = waypoints.len(), "requesting OSRM route");

        let response = self.client.get(url).send()?;
        let status = response.status();
        // OSRM reports routing failures (NoRoute, NoSegment) as 400 with a JSON body
        let body = response.json::<OsrmRouteResponse>().map_err(|err| {
            if status.is_success() {
                DirectionsError::Service(format!("undecodable OSRM response: {}", err))
            } else {
                DirectionsError::Service(format!("OSRM returned {}", status))
            }
        })?;

        body.into_directions()
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
    #[serde(default)]
    waypoints: Vec<OsrmWaypoint>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct OsrmWaypoint {
    location: [f64; 2],
}

impl OsrmRouteResponse {
    fn into_directions(self) -> Result<DirectionsResponse, DirectionsError> {
        if self.code != "Ok" {
            let message = self.message.unwrap_or_default();
            return Err(DirectionsError::Service(format!("{}: {}", self.code, message)));
        }

        let route = self
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| DirectionsError::Service("OSRM returned no routes".to_string()))?;

        let snapped_waypoints = self
            .waypoints
            .iter()
            .map(|waypoint| Coordinate::new(waypoint.location[0], waypoint.location[1]))
            .collect::<Vec<_>>();

        let (points, indices) = join_legs(&route.legs);
        let waypoint_indices = (indices.len() == snapped_waypoints.len()).then_some(indices);

        Ok(DirectionsResponse {
            snapped_waypoints,
            polyline: Polyline::new(points),
            distance_meters: route.distance,
            waypoint_indices,
        })
    }
}

/// Concatenates step geometries into one polyline, recording the vertex at
/// which each leg starts plus the final vertex.
fn join_legs(legs: &[OsrmLeg]) -> (Vec<Coordinate>, Vec<usize>) {
    let mut points: Vec<Coordinate> = Vec::new();
    let mut indices = Vec::with_capacity(legs.len() + 1);

    for leg in legs {
        let mut leg_started = false;
        for position in leg.steps.iter().flat_map(|step| &step.geometry.coordinates) {
            let Some(coordinate) = to_coordinate(position) else {
                continue;
            };
            if points.last() != Some(&coordinate) {
                points.push(coordinate);
            }
            if !leg_started {
                indices.push(points.len() - 1);
                leg_started = true;
            }
        }
    }
    if !points.is_empty() {
        indices.push(points.len() - 1);
    }

    (points, indices)
}

fn to_coordinate(position: &[f64]) -> Option<Coordinate> {
    match position {
        [lng, lat] => Some(Coordinate::new(*lng, *lat)),
        [lng, lat, elevation, ..] => Some(Coordinate::with_elevation(*lng, *lat, *elevation)),
        _ => None,
    }
}
