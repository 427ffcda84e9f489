use serde::{Deserialize, Serialize};

/// Point in a projected coordinate system, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        self.squared_distance_to(other).sqrt()
    }

    pub fn squared_distance_to(&self, other: &Coordinate) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A proposed or existing hub site. Computed, never mutated.
pub type HubLocation = Coordinate;

pub trait POI {
    fn get_coordinate(&self) -> &Coordinate;
    fn get_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(300.0, 400.0);
        assert_eq!(a.distance_to(&b), 500.0);
        assert_eq!(b.squared_distance_to(&a), 250_000.0);
    }
}
