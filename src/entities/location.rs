use geo_types::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_NAME: &str = "new location";
pub const DEFAULT_DESCRIPTION: &str = "description";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for Point<f64> {
    fn from(coordinates: Coordinates) -> Self {
        Point::new(coordinates.longitude, coordinates.latitude)
    }
}

/// A bookmarked place. Serialized as-is into the save file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: DEFAULT_NAME.into(),
            description: DEFAULT_DESCRIPTION.into(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn point(&self) -> Point<f64> {
        self.coordinates().into()
    }

    /// Exact coordinate match, used to reject duplicate places.
    pub fn is_at(&self, coordinates: Coordinates) -> bool {
        self.point() == Point::from(coordinates)
    }
}

#[test]
fn new_location_has_defaults() {
    let location = Location::new(Coordinates {
        latitude: 51.5,
        longitude: -0.12,
    });

    assert_eq!(location.name, "new location");
    assert_eq!(location.description, "description");
    assert!(location.is_at(Coordinates {
        latitude: 51.5,
        longitude: -0.12
    }));
}

#[test]
fn point_is_longitude_latitude() {
    let location = Location::new(Coordinates {
        latitude: 10.0,
        longitude: 20.0,
    });

    let point = location.point();
    assert_eq!(point.x(), 20.0);
    assert_eq!(point.y(), 10.0);
}

#[test]
fn serializes_with_file_field_names() {
    let location = Location::new(Coordinates {
        latitude: 1.0,
        longitude: 2.0,
    });

    let value = serde_json::to_value(&location).unwrap();
    assert_eq!(value["id"], location.id.to_string());
    assert_eq!(value["name"], "new location");
    assert_eq!(value["latitude"], 1.0);
    assert_eq!(value["longitude"], 2.0);
}
