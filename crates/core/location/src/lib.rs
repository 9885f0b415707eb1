#[macro_use]
extern crate serde;

#[macro_use]
extern crate async_trait;

use std::sync::Arc;

use futures::lock::Mutex;

use cleancity_result::Result;

mod geo;
pub use geo::{encode_geohash, haversine_km};

/// A latitude / longitude pair in decimal degrees
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Address fields produced by reverse geocoding
#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct ResolvedAddress {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

impl ResolvedAddress {
    /// Human-readable line for the report form.
    ///
    /// Falls back from the full address to "city, state, country" parts
    /// and finally to raw coordinates when nothing resolved.
    pub fn display_line(&self, coords: Coordinates) -> String {
        if let Some(address) = &self.address {
            if !address.is_empty() {
                return address.clone();
            }
        }

        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect();

        if !parts.is_empty() {
            return parts.join(", ");
        }

        format!(
            "Lat: {:.4}, Long: {:.4}",
            coords.latitude, coords.longitude
        )
    }
}

/// Device location collaborator
#[async_trait]
pub trait AbstractLocation: Sync + Send {
    /// Current device coordinates, if the device can provide them
    async fn current_coordinates(&self) -> Result<Option<Coordinates>>;

    /// Reverse geocode coordinates into address fields
    async fn address_for(&self, coords: Coordinates) -> Result<Option<ResolvedAddress>>;
}

/// Reference implementation serving fixed values
#[derive(Clone, Default)]
pub struct FixedLocation {
    coordinates: Arc<Mutex<Option<Coordinates>>>,
    address: Arc<Mutex<Option<ResolvedAddress>>>,
}

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>, address: Option<ResolvedAddress>) -> Self {
        FixedLocation {
            coordinates: Arc::new(Mutex::new(coordinates)),
            address: Arc::new(Mutex::new(address)),
        }
    }

    pub async fn set_coordinates(&self, coordinates: Option<Coordinates>) {
        *self.coordinates.lock().await = coordinates;
    }

    pub async fn set_address(&self, address: Option<ResolvedAddress>) {
        *self.address.lock().await = address;
    }
}

#[async_trait]
impl AbstractLocation for FixedLocation {
    async fn current_coordinates(&self) -> Result<Option<Coordinates>> {
        Ok(*self.coordinates.lock().await)
    }

    async fn address_for(&self, _coords: Coordinates) -> Result<Option<ResolvedAddress>> {
        Ok(self.address.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_prefers_full_address() {
        let resolved = ResolvedAddress {
            address: Some("1 Linthorpe Road".to_string()),
            city: Some("Middlesbrough".to_string()),
            ..Default::default()
        };

        let coords = Coordinates {
            latitude: 54.57,
            longitude: -1.23,
        };
        assert_eq!(resolved.display_line(coords), "1 Linthorpe Road");
    }

    #[test]
    fn display_line_joins_region_parts() {
        let resolved = ResolvedAddress {
            city: Some("Middlesbrough".to_string()),
            state: Some("England".to_string()),
            country: Some("United Kingdom".to_string()),
            ..Default::default()
        };

        let coords = Coordinates {
            latitude: 54.57,
            longitude: -1.23,
        };
        assert_eq!(
            resolved.display_line(coords),
            "Middlesbrough, England, United Kingdom"
        );
    }

    #[test]
    fn display_line_falls_back_to_coordinates() {
        let coords = Coordinates {
            latitude: 54.57,
            longitude: -1.23,
        };
        assert_eq!(
            ResolvedAddress::default().display_line(coords),
            "Lat: 54.5700, Long: -1.2300"
        );
    }

    #[tokio::test]
    async fn fixed_location_serves_configured_values() {
        let provider = FixedLocation::default();
        assert_eq!(provider.current_coordinates().await.unwrap(), None);

        let coords = Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        };
        provider.set_coordinates(Some(coords)).await;
        assert_eq!(
            provider.current_coordinates().await.unwrap(),
            Some(coords)
        );
    }
}
