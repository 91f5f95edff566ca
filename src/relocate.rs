//! Moving an existing waypoint.
//!
//! Only the segments touching the moved waypoint are re-routed:
//!
//! - first waypoint: segment 0, routed `[new, w1]`
//! - last waypoint: segment N-2, routed `[w(N-2), new]`
//! - interior waypoint i: segments i-1 and i, routed `[w(i-1), new, w(i+1)]`
//!   as one request whose polyline is split back in two at the snapped waypoint
//!
//! The total distance is reconciled with a delta instead of a full re-sum:
//! `old total - length(replaced segments) + reported distance`.

use crate::error::EditError;
use crate::haversine::haversine_meters;
use crate::model::RouteModel;
use crate::polyline::{Coordinate, Polyline};
use crate::traits::DirectionsResponse;

/// Which part of the route a relocation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The route's only waypoint; re-snapped with a self-route.
    Sole,
    First,
    Last,
    Interior,
}

/// Moves waypoint `index` to `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelocateOperation {
    pub index: usize,
    pub point: Coordinate,
}

impl RelocateOperation {
    pub fn new(index: usize, point: Coordinate) -> Self {
        Self { index, point }
    }

    pub fn position(&self, model: &RouteModel) -> Result<Position, EditError> {
        let len = model.waypoint_count();
        if self.index >= len {
            return Err(EditError::IndexOutOfRange {
                index: self.index,
                len,
            });
        }
        Ok(match (self.index, len) {
            (_, 1) => Position::Sole,
            (0, _) => Position::First,
            (i, n) if i == n - 1 => Position::Last,
            _ => Position::Interior,
        })
    }

    /// Waypoints to send to the directions service.
    pub fn request(&self, model: &RouteModel) -> Result<Vec<Coordinate>, EditError> {
        let waypoints = model.waypoints();
        let i = self.index;
        Ok(match self.position(model)? {
            Position::Sole => vec![self.point, self.point],
            Position::First => vec![self.point, waypoints[1]],
            Position::Last => vec![waypoints[i - 1], self.point],
            Position::Interior => vec![waypoints[i - 1], self.point, waypoints[i + 1]],
        })
    }

    /// Builds the snapshot that results from this relocation.
    ///
    /// `snap_tolerance_meters` bounds the coordinate match used to split an
    /// interior response when the service does not report split indices.
    pub fn apply(
        &self,
        model: &RouteModel,
        response: DirectionsResponse,
        snap_tolerance_meters: f64,
    ) -> Result<RouteModel, EditError> {
        let position = self.position(model)?;
        let i = self.index;
        let mut waypoints = model.waypoints().to_vec();
        let mut segments = model.segments().to_vec();

        let (replaced, new_segments) = match position {
            Position::Sole => {
                response.validate(2)?;
                waypoints[0] = response.snapped_waypoints[0];
                return Ok(RouteModel::assemble(waypoints, segments, 0.0)?);
            }
            Position::First => {
                response.validate(2)?;
                waypoints[0] = response.snapped_waypoints[0];
                (0..1, vec![response.polyline])
            }
            Position::Last => {
                response.validate(2)?;
                waypoints[i] = response.snapped_waypoints[1];
                (i - 1..i, vec![response.polyline])
            }
            Position::Interior => {
                response.validate(3)?;
                let snapped = response.snapped_waypoints[1];
                let split = split_index(&response, &snapped, snap_tolerance_meters)?;
                let (head, tail) = response.polyline.split_at_vertex(split).ok_or_else(|| {
                    EditError::InvalidResponse(format!("split vertex {} out of range", split))
                })?;
                waypoints[i] = snapped;
                (i - 1..i + 1, vec![head, tail])
            }
        };

        let replaced_length: f64 = segments[replaced.clone()]
            .iter()
            .map(Polyline::length_meters)
            .sum();
        let distance = model.distance_meters() - replaced_length + response.distance_meters;
        segments.splice(replaced, new_segments);

        tracing::debug!(
            index = i,
            ?position,
            replaced_length,
            reported = response.distance_meters,
            distance,
            "relocated waypoint"
        );

        Ok(RouteModel::assemble(waypoints, segments, distance)?)
    }
}

/// Vertex of the combined polyline at which the interior waypoint sits.
///
/// Prefers the index reported by the service. Otherwise, among the vertices
/// within tolerance of the snapped waypoint, takes the one whose along-path
/// distance is closest to the first leg's straight-line share of the whole
/// polyline, so a path looping past the waypoint early is not cut there.
fn split_index(
    response: &DirectionsResponse,
    snapped: &Coordinate,
    tolerance_meters: f64,
) -> Result<usize, EditError> {
    if let Some(indices) = &response.waypoint_indices {
        return Ok(indices[1]);
    }

    let ends = &response.snapped_waypoints;
    let first_leg = haversine_meters(&ends[0], snapped);
    let second_leg = haversine_meters(snapped, &ends[2]);
    let along = response.polyline.cumulative_lengths();
    let total = along.last().copied().unwrap_or(0.0);
    let expected = if first_leg + second_leg > 0.0 {
        total * first_leg / (first_leg + second_leg)
    } else {
        0.0
    };

    response
        .polyline
        .vertices_near(snapped, tolerance_meters)
        .min_by(|a, b| {
            (along[*a] - expected)
                .abs()
                .total_cmp(&(along[*b] - expected).abs())
        })
        .ok_or_else(|| {
            EditError::InvalidResponse(format!(
                "snapped waypoint ({}, {}) not found on routed polyline",
                snapped.lng, snapped.lat
            ))
        })
}
