//! Real Monaco locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. Monaco is small enough that the
//! OSRM dataset prepares in seconds.

use route_editor::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lng, self.lat)
    }
}

pub const CASINO: Location = Location::new("Casino de Monte-Carlo", 43.7393, 7.4283);
pub const PRINCES_PALACE: Location = Location::new("Prince's Palace", 43.7313, 7.4200);
pub const OCEANOGRAPHIC_MUSEUM: Location = Location::new("Oceanographic Museum", 43.7307, 7.4254);
pub const PORT_HERCULE: Location = Location::new("Port Hercule", 43.7347, 7.4227);
pub const LARVOTTO_BEACH: Location = Location::new("Larvotto Beach", 43.7447, 7.4352);
pub const MONACO_STATION: Location = Location::new("Gare de Monaco", 43.7397, 7.4198);

/// A walking tour in route order.
pub const TOUR: &[Location] = &[PRINCES_PALACE, PORT_HERCULE, CASINO, LARVOTTO_BEACH];
