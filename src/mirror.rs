//! Out-and-back mirroring.

use crate::error::EditError;
use crate::model::RouteModel;
use crate::polyline::Polyline;

/// Extends the route back to its origin along the same path.
///
/// Appends the waypoints in reverse (the turnaround point is not repeated) and
/// every segment reversed, then doubles the distance. Purely local: nothing is
/// re-routed or re-snapped.
pub fn mirror(model: &RouteModel) -> Result<RouteModel, EditError> {
    let waypoints = model.waypoints();
    if waypoints.len() < 2 {
        return Ok(model.clone());
    }

    let mut mirrored_waypoints = Vec::with_capacity(waypoints.len() * 2 - 1);
    mirrored_waypoints.extend_from_slice(waypoints);
    mirrored_waypoints.extend(waypoints[..waypoints.len() - 1].iter().rev().copied());

    let mut segments = Vec::with_capacity(model.segments().len() * 2);
    segments.extend_from_slice(model.segments());
    segments.extend(model.segments().iter().rev().map(Polyline::reversed));

    Ok(RouteModel::assemble(
        mirrored_waypoints,
        segments,
        model.distance_meters() * 2.0,
    )?)
}
