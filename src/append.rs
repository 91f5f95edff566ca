//! Appending a trailing waypoint.

use crate::error::EditError;
use crate::model::RouteModel;
use crate::polyline::Coordinate;
use crate::traits::DirectionsResponse;

/// Adds `point` after the current last waypoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppendOperation {
    pub point: Coordinate,
}

impl AppendOperation {
    pub fn new(point: Coordinate) -> Self {
        Self { point }
    }

    /// Waypoints to send to the directions service.
    ///
    /// An empty route asks for a degenerate self-route to snap the point.
    pub fn request(&self, model: &RouteModel) -> Vec<Coordinate> {
        match model.last_waypoint() {
            Some(last) => vec![*last, self.point],
            None => vec![self.point, self.point],
        }
    }

    /// Builds the snapshot that results from this append.
    pub fn apply(
        &self,
        model: &RouteModel,
        response: DirectionsResponse,
    ) -> Result<RouteModel, EditError> {
        response.validate(2)?;

        let snapped = response.snapped_waypoints[1];
        if model.is_empty() {
            return Ok(RouteModel::assemble(vec![snapped], Vec::new(), 0.0)?);
        }

        let mut waypoints = model.waypoints().to_vec();
        waypoints.push(snapped);
        let mut segments = model.segments().to_vec();
        segments.push(response.polyline);
        let distance = model.distance_meters() + response.distance_meters;

        Ok(RouteModel::assemble(waypoints, segments, distance)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polyline::Polyline;

    fn response(snapped: Vec<Coordinate>, polyline: Vec<Coordinate>, distance: f64) -> DirectionsResponse {
        DirectionsResponse {
            snapped_waypoints: snapped,
            polyline: Polyline::new(polyline),
            distance_meters: distance,
            waypoint_indices: None,
        }
    }

    #[test]
    fn test_first_point_requests_self_route() {
        let point = Coordinate::new(7.42, 43.73);
        let op = AppendOperation::new(point);
        assert_eq!(op.request(&RouteModel::empty()), vec![point, point]);
    }

    #[test]
    fn test_first_point_uses_snapped_coordinate() {
        let raw = Coordinate::new(7.42, 43.73);
        let snapped = Coordinate::new(7.4201, 43.7301);
        let op = AppendOperation::new(raw);
        let model = op
            .apply(
                &RouteModel::empty(),
                response(vec![snapped, snapped], vec![snapped, snapped], 0.0),
            )
            .unwrap();
        assert_eq!(model.waypoints(), &[snapped]);
        assert!(model.segments().is_empty());
        assert_eq!(model.distance_meters(), 0.0);
    }

    #[test]
    fn test_append_adds_segment_and_distance() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.001, 0.0);
        let start = RouteModel::from_parts(vec![a], vec![], 0.0).unwrap();
        let op = AppendOperation::new(b);
        assert_eq!(op.request(&start), vec![a, b]);

        let model = op.apply(&start, response(vec![a, b], vec![a, b], 111.0)).unwrap();
        assert_eq!(model.waypoints(), &[a, b]);
        assert_eq!(model.segments().len(), 1);
        assert_eq!(model.distance_meters(), 111.0);
    }

    #[test]
    fn test_rejects_short_response() {
        let a = Coordinate::new(0.0, 0.0);
        let start = RouteModel::from_parts(vec![a], vec![], 0.0).unwrap();
        let err = AppendOperation::new(a)
            .apply(&start, response(vec![a], vec![a], 0.0))
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidResponse(_)));
    }
}
