mod asteroids;
mod health;
mod index;
mod satellites;

pub use asteroids::*;
pub use health::*;
pub use index::*;
pub use satellites::*;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    /// Observer latitude in degrees.
    pub lat: f64,
    /// Observer longitude in degrees.
    pub lng: f64,
    /// Search radius, interpreted by each integration.
    pub radius: i32,
}
