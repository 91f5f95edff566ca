//! route-editor core
//!
//! Interactive construction and editing of multi-waypoint routes. Each new
//! or moved waypoint is resolved by a directions service into a polyline and
//! a distance, and merged into an immutable route snapshot with bounded
//! undo/redo history.

pub mod error;
pub mod traits;
pub mod polyline;
pub mod haversine;
pub mod model;
pub mod profile;
pub mod osrm;
pub mod append;
pub mod relocate;
pub mod mirror;
pub mod history;
pub mod loading;
pub mod editor;

pub use editor::{EditorConfig, PendingEdit, RouteEditor};
pub use error::{DirectionsError, EditError, InvariantViolation};
pub use model::RouteModel;
pub use polyline::{Coordinate, Polyline};
pub use traits::{DirectionsClient, DirectionsResponse, NotificationSink};
