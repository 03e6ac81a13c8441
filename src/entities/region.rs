use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

/// The visible map area. New places are always dropped at its center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapRegion {
    pub center: Coordinates,
    pub span: Span,
}

impl Default for MapRegion {
    fn default() -> Self {
        Self {
            center: Coordinates {
                latitude: 50.0,
                longitude: 0.0,
            },
            span: Span {
                latitude_delta: 25.0,
                longitude_delta: 25.0,
            },
        }
    }
}
