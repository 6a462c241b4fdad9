use serde::{Deserialize, Serialize};

/// Listing served to the map view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    pub id: String,
    pub region_id: i64,
    pub region_name: String,
    pub city: String,
    pub state: String,
    pub metro: String,
    pub county_name: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub zipcode: String,
}

/// Inclusive latitude/longitude window described by its north-east and south-west corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub ne_lat: f64,
    pub ne_lng: f64,
    pub sw_lat: f64,
    pub sw_lng: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude <= self.ne_lat
            && latitude >= self.sw_lat
            && longitude <= self.ne_lng
            && longitude >= self.sw_lng
    }
}

/// Map viewport query. The window only applies when all four corners are supplied.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PropertyQuery {
    pub ne_lat: Option<f64>,
    pub ne_lng: Option<f64>,
    pub sw_lat: Option<f64>,
    pub sw_lng: Option<f64>,
}

impl PropertyQuery {
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match (self.ne_lat, self.ne_lng, self.sw_lat, self.sw_lng) {
            (Some(ne_lat), Some(ne_lng), Some(sw_lat), Some(sw_lng)) => Some(BoundingBox {
                ne_lat,
                ne_lng,
                sw_lat,
                sw_lng,
            }),
            _ => None,
        }
    }
}
