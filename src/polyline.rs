//! Coordinates and polylines for route geometry.
//!
//! A `Polyline` is the dense geometry connecting two consecutive waypoints,
//! stored as decoded coordinates. Any wire encoding belongs at the client
//! boundary (see `osrm`), not here.

use serde::{Deserialize, Serialize};

use crate::haversine::haversine_meters;

/// A longitude/latitude pair with an optional elevation in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: None,
        }
    }

    pub const fn with_elevation(lng: f64, lat: f64, elevation: f64) -> Self {
        Self {
            lng,
            lat,
            elevation: Some(elevation),
        }
    }

    /// Great-circle distance to `other` in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_meters(self, other)
    }
}

/// Dense geometry of one route segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    /// Geometric length along the polyline in meters.
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| haversine_meters(&pair[0], &pair[1]))
            .sum()
    }

    /// Same geometry, traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Splits at vertex `index`, which ends the first half and starts the second.
    ///
    /// Returns `None` when `index` is not a vertex of this polyline.
    pub fn split_at_vertex(&self, index: usize) -> Option<(Polyline, Polyline)> {
        if index >= self.points.len() {
            return None;
        }
        let head = self.points[..=index].to_vec();
        let tail = self.points[index..].to_vec();
        Some((Polyline::new(head), Polyline::new(tail)))
    }

    /// Indices of every vertex lying within `tolerance_meters` of `target`.
    ///
    /// A path that loops back past `target` yields more than one.
    pub fn vertices_near<'a>(
        &'a self,
        target: &'a Coordinate,
        tolerance_meters: f64,
    ) -> impl Iterator<Item = usize> + 'a {
        self.points
            .iter()
            .enumerate()
            .filter(move |(_, point)| haversine_meters(point, target) <= tolerance_meters)
            .map(|(index, _)| index)
    }

    /// Along-path distance from the first vertex to each vertex, in meters.
    pub fn cumulative_lengths(&self) -> Vec<f64> {
        let mut travelled = 0.0;
        let mut lengths = Vec::with_capacity(self.points.len());
        for (index, point) in self.points.iter().enumerate() {
            if index > 0 {
                travelled += haversine_meters(&self.points[index - 1], point);
            }
            lengths.push(travelled);
        }
        lengths
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}
