//! Error taxonomy for directions calls and route edits.

use thiserror::Error;

/// Failure reported by a `DirectionsClient`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DirectionsError {
    /// The directions service could not be reached.
    #[error("network error reaching directions service: {0}")]
    Network(String),
    /// The service answered but could not produce a route.
    #[error("directions service could not route: {0}")]
    Service(String),
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() || err.is_decode() {
            DirectionsError::Service(err.to_string())
        } else {
            DirectionsError::Network(err.to_string())
        }
    }
}

/// The derived structures of a route snapshot disagree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    #[error("{segments} segments for {waypoints} waypoints")]
    SegmentCount { waypoints: usize, segments: usize },
    #[error("distance {0} is negative or not finite")]
    InvalidDistance(f64),
    #[error("stored distance {stored} differs from recomputed {recomputed}")]
    DistanceMismatch { stored: f64, recomputed: f64 },
    #[error("segment {segment} does not connect its waypoints")]
    DisconnectedSegment { segment: usize },
}

/// Failure of a route edit. The committed route is never partially updated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error("invalid directions response: {0}")]
    InvalidResponse(String),
    #[error("waypoint index {index} out of range for {len} waypoints")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("edit prepared at revision {prepared} superseded by revision {current}")]
    Superseded { prepared: u64, current: u64 },
    #[error("no waypoint drag in progress")]
    NoActiveDrag,
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

impl EditError {
    /// Whether this failure is reported to the user as a notification.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            EditError::Directions(_) | EditError::InvalidResponse(_)
        )
    }
}
