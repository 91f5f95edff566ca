//! Seams to the external collaborators of the route editor.
//!
//! The editor itself never talks to the network or the UI directly. Hosts
//! implement these for their directions backend and notification surface.

use crate::error::{DirectionsError, EditError};
use crate::loading::Notification;
use crate::polyline::{Coordinate, Polyline};

/// Result of routing through an ordered list of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    /// Requested waypoints adjusted onto the routable network, in request order.
    pub snapped_waypoints: Vec<Coordinate>,
    /// Dense geometry from the first to the last snapped waypoint.
    pub polyline: Polyline,
    /// Service-reported length of `polyline`.
    pub distance_meters: f64,
    /// Vertex index in `polyline` of each snapped waypoint, when the service knows it.
    pub waypoint_indices: Option<Vec<usize>>,
}

impl DirectionsResponse {
    /// Rejects responses that cannot belong to a request of `requested` waypoints.
    pub(crate) fn validate(&self, requested: usize) -> Result<(), EditError> {
        if self.snapped_waypoints.len() != requested {
            return Err(EditError::InvalidResponse(format!(
                "expected {} snapped waypoints, got {}",
                requested,
                self.snapped_waypoints.len()
            )));
        }
        if self.polyline.is_empty() {
            return Err(EditError::InvalidResponse("empty polyline".to_string()));
        }
        if !self.distance_meters.is_finite() || self.distance_meters < 0.0 {
            return Err(EditError::InvalidResponse(format!(
                "invalid distance {}",
                self.distance_meters
            )));
        }
        if let Some(indices) = &self.waypoint_indices {
            let in_range = indices.len() == requested
                && indices.iter().all(|&index| index < self.polyline.len())
                && indices.windows(2).all(|pair| pair[0] <= pair[1]);
            if !in_range {
                return Err(EditError::InvalidResponse(format!(
                    "waypoint indices {:?} do not fit a polyline of {} points",
                    indices,
                    self.polyline.len()
                )));
            }
        }
        Ok(())
    }
}

/// A directions service resolving waypoints into a routed polyline.
pub trait DirectionsClient {
    /// Route through `waypoints` in order.
    ///
    /// A request of two identical points is a degenerate self-route, used to
    /// snap a single coordinate.
    fn route(&self, waypoints: &[Coordinate]) -> Result<DirectionsResponse, DirectionsError>;
}

impl<T: DirectionsClient + ?Sized> DirectionsClient for &T {
    fn route(&self, waypoints: &[Coordinate]) -> Result<DirectionsResponse, DirectionsError> {
        (**self).route(waypoints)
    }
}

/// Receives user-facing notifications (failed edits).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
