//! The route snapshot and its invariants.
//!
//! A `RouteModel` is immutable once built. Every edit produces a complete
//! replacement snapshot, so waypoints, segments and distance can never be
//! observed out of step with each other.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;
use crate::polyline::{Coordinate, Polyline};

/// Waypoints, the segments between them, and the total distance in meters.
///
/// `segments[i]` connects `waypoints[i]` to `waypoints[i + 1]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteModel {
    waypoints: Vec<Coordinate>,
    segments: Vec<Polyline>,
    distance_meters: f64,
}

impl RouteModel {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot from externally supplied parts, e.g. a loaded route.
    ///
    /// Checks the structural invariants only: segment count and a finite,
    /// non-negative distance. Stored distance may be service-reported and is
    /// not compared against the geometry here.
    pub fn from_parts(
        waypoints: Vec<Coordinate>,
        segments: Vec<Polyline>,
        distance_meters: f64,
    ) -> Result<Self, InvariantViolation> {
        let model = Self {
            waypoints,
            segments,
            distance_meters,
        };
        model.check_structure()?;
        Ok(model)
    }

    /// Constructor for edit operations. A delta-reconciled distance may dip
    /// just below zero; it is clamped before validation.
    pub(crate) fn assemble(
        waypoints: Vec<Coordinate>,
        segments: Vec<Polyline>,
        distance_meters: f64,
    ) -> Result<Self, InvariantViolation> {
        let distance_meters = if distance_meters < 0.0 {
            0.0
        } else {
            distance_meters
        };
        Self::from_parts(waypoints, segments, distance_meters)
    }

    pub fn waypoints(&self) -> &[Coordinate] {
        &self.waypoints
    }

    pub fn segments(&self) -> &[Polyline] {
        &self.segments
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn last_waypoint(&self) -> Option<&Coordinate> {
        self.waypoints.last()
    }

    /// Total distance recomputed from segment geometry.
    pub fn recomputed_distance(&self) -> f64 {
        self.segments.par_iter().map(Polyline::length_meters).sum()
    }

    /// Whole route as one polyline, with segment joins de-duplicated.
    pub fn full_path(&self) -> Polyline {
        let mut points: Vec<Coordinate> = Vec::new();
        for segment in &self.segments {
            let mut iter = segment.points().iter().copied();
            if let (Some(last), Some(first)) = (points.last(), segment.first()) {
                if last == first {
                    iter.next();
                }
            }
            points.extend(iter);
        }
        if points.is_empty() {
            points.extend(self.waypoints.first().copied());
        }
        Polyline::new(points)
    }

    /// Copy of this snapshot with waypoint `index` moved, segments untouched.
    ///
    /// Used for drag previews only; the result is never committed.
    pub(crate) fn with_waypoint_moved(&self, index: usize, coordinate: Coordinate) -> Self {
        let mut moved = self.clone();
        if let Some(slot) = moved.waypoints.get_mut(index) {
            *slot = coordinate;
        }
        moved
    }

    fn check_structure(&self) -> Result<(), InvariantViolation> {
        let expected = self.waypoints.len().saturating_sub(1);
        if self.segments.len() != expected {
            return Err(InvariantViolation::SegmentCount {
                waypoints: self.waypoints.len(),
                segments: self.segments.len(),
            });
        }
        if !self.distance_meters.is_finite() || self.distance_meters < 0.0 {
            return Err(InvariantViolation::InvalidDistance(self.distance_meters));
        }
        Ok(())
    }

    /// Full consistency check of a committed snapshot.
    ///
    /// Segment endpoints must lie within `snap_tolerance_meters` of their
    /// waypoints, and the stored distance must match the recomputed one within
    /// `distance_tolerance_meters`.
    pub fn check_invariants(
        &self,
        snap_tolerance_meters: f64,
        distance_tolerance_meters: f64,
    ) -> Result<(), InvariantViolation> {
        self.check_structure()?;

        for (index, segment) in self.segments.iter().enumerate() {
            let connected = match (segment.first(), segment.last()) {
                (Some(first), Some(last)) => {
                    first.distance_to(&self.waypoints[index]) <= snap_tolerance_meters
                        && last.distance_to(&self.waypoints[index + 1]) <= snap_tolerance_meters
                }
                _ => false,
            };
            if !connected {
                return Err(InvariantViolation::DisconnectedSegment { segment: index });
            }
        }

        let recomputed = self.recomputed_distance();
        if (recomputed - self.distance_meters).abs() > distance_tolerance_meters {
            return Err(InvariantViolation::DistanceMismatch {
                stored: self.distance_meters,
                recomputed,
            });
        }
        Ok(())
    }
}
