use serde::{Deserialize, Serialize};

/// Geographic coordinate in decimal degrees (WGS84).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Demo analysis point shown on both sites (San Francisco).
pub const DEFAULT_LOCATION: LatLng = LatLng {
    lat: 37.7749,
    lng: -122.4194,
};

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// `[lat, lng]` ordering, as tile libraries expect it.
    pub fn to_array(self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl Default for LatLng {
    fn default() -> Self {
        DEFAULT_LOCATION
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LOCATION, LatLng};

    #[test]
    fn default_location_is_valid() {
        assert!(DEFAULT_LOCATION.is_valid());
        assert_eq!(LatLng::default(), DEFAULT_LOCATION);
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn deserializes_from_object() {
        let c: LatLng = serde_json::from_str(r#"{"lat": 12.5, "lng": 77.25}"#).unwrap();
        assert_eq!(c, LatLng::new(12.5, 77.25));
        assert_eq!(c.to_array(), [12.5, 77.25]);
    }
}
